//! Directory tree helpers shared by registries and the materializer.
//!
//! Copies skip version-control metadata, caches and virtual environments
//! (see [`EXCLUDED_NAMES`]) at any depth.

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Entry names never copied out of a registry or template.
pub const EXCLUDED_NAMES: &[&str] = &[
    ".git",
    ".github",
    "__pycache__",
    "envs",
    ".venv",
    "pipenv_venv",
    ".ipynb_checkpoints",
    ".mypy_cache",
    ".pytest_cache",
];

/// Whether an entry with this file name is skipped by [`copy_tree`].
pub fn is_excluded(name: &OsStr) -> bool {
    name.to_str()
        .map(|n| EXCLUDED_NAMES.contains(&n))
        .unwrap_or(false)
}

/// Recursively copy `src` into `dst`, merging with existing directories.
///
/// Existing files in `dst` are overwritten. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    fs::create_dir_all(dst).with_context(|| format!("Failed to create {}", dst.display()))?;

    let mut copied = 0;
    let walker = WalkDir::new(src)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded(e.file_name()));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", src.display()))?;
        let relative = entry.path().strip_prefix(src)?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// All regular files under `root`, relative to it, in sorted order.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.path().strip_prefix(root)?.to_path_buf());
        }
    }
    Ok(files)
}

/// Replace `target` with the fully-built directory `replacement`.
///
/// The old directory is moved aside first and only deleted once the new one
/// is in place, so `target` is never left half-written.
pub fn replace_dir(replacement: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    if !target.exists() {
        return fs::rename(replacement, target)
            .with_context(|| format!("Failed to move {} into place", target.display()));
    }

    let aside = sibling(target, "old");
    if aside.exists() {
        fs::remove_dir_all(&aside)?;
    }
    fs::rename(target, &aside)
        .with_context(|| format!("Failed to move aside {}", target.display()))?;

    if let Err(e) = fs::rename(replacement, target) {
        let _ = fs::rename(&aside, target);
        return Err(e).with_context(|| format!("Failed to move {} into place", target.display()));
    }

    fs::remove_dir_all(&aside)
        .with_context(|| format!("Failed to remove {}", aside.display()))?;
    Ok(())
}

/// `<parent>/.<name>.<tag>`
fn sibling(path: &Path, tag: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}", name, tag))
}
