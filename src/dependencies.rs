//! Project dependency lists.
//!
//! Templates declare dependency strings in their metadata. After a template is
//! materialized, its dependencies are merged into the project's
//! `requirements.txt` so the environment manager can install them.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Dependency file kept in the project root.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Merge `added` into `existing`, keeping first-seen order and dropping duplicates.
pub fn merge_dependencies(existing: &[String], added: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    existing
        .iter()
        .chain(added)
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .filter(|d| seen.insert(d.to_string()))
        .map(String::from)
        .collect()
}

/// Read the project's requirements, ignoring blank lines and `#` comments.
pub fn read_requirements(project_root: &Path) -> Result<Vec<String>> {
    let path = project_root.join(REQUIREMENTS_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Merge `added` into the project's requirements file and return the result.
///
/// New entries are appended, so existing lines and comments are kept. The
/// file is left untouched when nothing new is added.
pub fn append_requirements(project_root: &Path, added: &[String]) -> Result<Vec<String>> {
    let existing = merge_dependencies(&read_requirements(project_root)?, &[]);
    let merged = merge_dependencies(&existing, added);
    let new_entries = &merged[existing.len()..];

    if !new_entries.is_empty() {
        let path = project_root.join(REQUIREMENTS_FILE);
        let mut content = if path.exists() {
            fs::read_to_string(&path)?
        } else {
            String::new()
        };
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        for entry in new_entries {
            content.push_str(entry);
            content.push('\n');
        }
        fs::write(&path, content)?;
        tracing::info!(
            "Added {} dependencies to {}",
            new_entries.len(),
            REQUIREMENTS_FILE
        );
    }

    Ok(merged)
}
