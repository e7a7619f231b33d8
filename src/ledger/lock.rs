//! Advisory per-project lock.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{GryphonError, Result};

/// Name of the lock file, created beside the ledger.
pub const LOCK_FILE: &str = ".gryphon.lock";

/// Held while an operation writes into a project. Released on drop.
#[derive(Debug)]
pub struct ProjectLock {
    path: PathBuf,
}

impl ProjectLock {
    /// Take the lock for `project_root`, failing if another process holds it.
    pub fn acquire(project_root: &Path) -> Result<Self> {
        let path = project_root.join(LOCK_FILE);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(GryphonError::ProjectLocked { path });
            }
            Err(e) => return Err(e.into()),
        };
        writeln!(file, "{}", std::process::id())?;
        tracing::debug!("Acquired project lock {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("Failed to release lock {}: {}", self.path.display(), e);
        }
    }
}
