//! Committing a staged tree into its destination.
//!
//! Pre-existing destination files are renamed to a backup name before being
//! overwritten. The commit is all-or-nothing: if any copy fails, files created
//! so far are removed and every backup is renamed back.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GryphonError, Result};
use crate::tree;

/// A destination file that was overwritten, and where its old content went.
///
/// Both paths are relative to the destination root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub original: PathBuf,
    pub backup: PathBuf,
}

/// Files written by a successful commit, relative to the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitResult {
    pub created: Vec<PathBuf>,
    pub overwritten: Vec<BackupRecord>,
}

/// Backup path for `path`: `<stem>.<tag><.ext>`, bumped with `-2`, `-3`, ...
/// until it does not exist.
pub fn backup_path(path: &Path, tag: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut candidate = path.with_file_name(format!("{}.{}{}", stem, tag, ext));
    let mut counter = 2;
    while candidate.exists() {
        candidate = path.with_file_name(format!("{}.{}-{}{}", stem, tag, counter, ext));
        counter += 1;
    }
    candidate
}

/// Copy every file of `staging` into `destination`.
pub fn commit(staging: &Path, destination: &Path, backup_tag: &str) -> Result<CommitResult> {
    let files = tree::list_files(staging).map_err(|e| failure(staging, e))?;
    fs::create_dir_all(destination).map_err(|e| failure(destination, e))?;

    let mut tx = Transaction::new(destination);
    match tx.apply(staging, &files, backup_tag) {
        Ok(()) => Ok(tx.finish()),
        Err(err) => {
            tracing::error!("Failed to move template files into target folder: {}", err);
            tx.rollback();
            Err(err)
        }
    }
}

struct Transaction<'a> {
    destination: &'a Path,
    created: Vec<PathBuf>,
    written: Vec<PathBuf>,
    created_dirs: Vec<PathBuf>,
    backups: Vec<BackupRecord>,
}

impl<'a> Transaction<'a> {
    fn new(destination: &'a Path) -> Self {
        Self {
            destination,
            created: Vec::new(),
            written: Vec::new(),
            created_dirs: Vec::new(),
            backups: Vec::new(),
        }
    }

    fn apply(&mut self, staging: &Path, files: &[PathBuf], backup_tag: &str) -> Result<()> {
        for relative in files {
            let target = self.destination.join(relative);

            if target.is_dir() {
                return Err(GryphonError::MaterializationFailure {
                    path: target,
                    message: "a directory exists where the template has a file".to_string(),
                });
            }

            if target.exists() {
                let backup = backup_path(&target, backup_tag);
                fs::rename(&target, &backup).map_err(|e| failure(&target, e))?;
                tracing::debug!("Backed up {} to {}", target.display(), backup.display());
                self.backups.push(BackupRecord {
                    original: relative.clone(),
                    backup: self.relative(&backup),
                });
            } else {
                self.created.push(relative.clone());
            }

            if let Some(parent) = target.parent() {
                self.create_parents(parent)?;
            }
            fs::copy(staging.join(relative), &target).map_err(|e| failure(&target, e))?;
            self.written.push(target);
        }
        Ok(())
    }

    /// Create `dir` and its missing ancestors, remembering each one created.
    fn create_parents(&mut self, dir: &Path) -> Result<()> {
        let mut missing: Vec<PathBuf> = dir
            .ancestors()
            .take_while(|a| a.starts_with(self.destination) && !a.exists())
            .map(Path::to_path_buf)
            .collect();
        fs::create_dir_all(dir).map_err(|e| failure(dir, e))?;
        missing.reverse();
        self.created_dirs.extend(missing);
        Ok(())
    }

    fn rollback(&mut self) {
        for path in self.written.drain(..).rev() {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!("Could not remove {} during rollback: {}", path.display(), e);
            }
        }
        // Deepest first; a directory holding anything else is left alone.
        for dir in self.created_dirs.drain(..).rev() {
            if let Err(e) = fs::remove_dir(&dir) {
                tracing::debug!("Keeping {} after rollback: {}", dir.display(), e);
            }
        }
        for record in self.backups.drain(..).rev() {
            let backup = self.destination.join(&record.backup);
            let original = self.destination.join(&record.original);
            if let Err(e) = fs::rename(&backup, &original) {
                tracing::warn!(
                    "Could not restore {} from {}: {}",
                    original.display(),
                    backup.display(),
                    e
                );
            }
        }
    }

    fn finish(self) -> CommitResult {
        CommitResult {
            created: self.created,
            overwritten: self.backups,
        }
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.destination)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

fn failure(path: &Path, err: impl std::fmt::Display) -> GryphonError {
    GryphonError::MaterializationFailure {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
