//! Materializing templates into project directories.
//!
//! [`Materializer::instantiate`] copies a template tree into a private staging
//! directory, applies variable substitution to file names and text contents,
//! then commits the staged tree into the destination. Destination files that
//! would be overwritten are first renamed to a backup name (see
//! [`commit::backup_path`]). The staging directory is removed on every exit
//! path.
//!
//! # Example
//!
//! ```no_run
//! use gryphon::materialize::{Materializer, Variables};
//! use std::path::Path;
//!
//! let mut variables = Variables::new();
//! variables.insert("project_name".to_string(), "demo".to_string());
//!
//! let report = Materializer::new()
//!     .instantiate(Path::new("/srv/templates/init/analytics/template"), &variables, Path::new("demo"))
//!     .unwrap();
//! println!("{} files created", report.created.len());
//! ```

pub mod commit;
pub mod substitute;

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GryphonError, Result};
use crate::tree;

pub use commit::{backup_path, BackupRecord, CommitResult};
pub use substitute::{Substitution, Variables, TEMPLATE_MARKER};

/// What one instantiation did to the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializationReport {
    /// Files that did not exist before, relative to the destination.
    pub created: Vec<PathBuf>,
    /// Files that were overwritten, with their backups.
    pub overwritten: Vec<BackupRecord>,
    /// Files copied without substitution because they are not UTF-8.
    pub binary: Vec<PathBuf>,
    /// The staging directory used. It no longer exists.
    pub staging_dir: PathBuf,
}

impl MaterializationReport {
    /// Total number of files written into the destination.
    pub fn file_count(&self) -> usize {
        self.created.len() + self.overwritten.len()
    }
}

/// Instantiates template trees.
#[derive(Debug, Clone)]
pub struct Materializer {
    staging_root: PathBuf,
    backup_tag: Option<String>,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Materializer {
    /// Stage under the system temp directory, tag backups with a timestamp.
    pub fn new() -> Self {
        Self {
            staging_root: std::env::temp_dir(),
            backup_tag: None,
        }
    }

    /// Use a different parent directory for staging areas.
    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = root.into();
        self
    }

    /// Tag inserted into backup names, e.g. `bak-3` gives `eda.bak-3.ipynb`.
    pub fn with_backup_tag(mut self, tag: impl Into<String>) -> Self {
        self.backup_tag = Some(tag.into());
        self
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Materialize `source` into `destination`.
    pub fn instantiate(
        &self,
        source: &Path,
        variables: &Variables,
        destination: &Path,
    ) -> Result<MaterializationReport> {
        if !source.is_dir() {
            return Err(GryphonError::MaterializationFailure {
                path: source.to_path_buf(),
                message: "template directory does not exist".to_string(),
            });
        }

        fs::create_dir_all(&self.staging_root).map_err(|e| failure(&self.staging_root, e))?;
        let staging = tempfile::Builder::new()
            .prefix(&format!("gryphon-staging-{}-", destination_digest(destination)))
            .tempdir_in(&self.staging_root)
            .map_err(|e| failure(&self.staging_root, e))?;
        tracing::debug!(
            "Staging {} in {}",
            source.display(),
            staging.path().display()
        );

        let mut report = MaterializationReport {
            staging_dir: staging.path().to_path_buf(),
            ..Default::default()
        };

        tree::copy_tree(source, staging.path()).map_err(|e| failure(source, format!("{:#}", e)))?;
        report.binary = self.substitute_staged(staging.path(), variables)?;

        let tag = self
            .backup_tag
            .clone()
            .unwrap_or_else(|| format!("bak-{}", chrono::Local::now().format("%Y%m%d%H%M%S")));
        let committed = commit::commit(staging.path(), destination, &tag)?;
        report.created = committed.created;
        report.overwritten = committed.overwritten;

        tracing::info!(
            "Materialized {} files into {} ({} backed up)",
            report.file_count(),
            destination.display(),
            report.overwritten.len()
        );

        staging.close().map_err(|e| failure(&report.staging_dir, e))?;
        Ok(report)
    }

    /// Rename and render every staged file. Returns the binary files.
    fn substitute_staged(&self, staging: &Path, variables: &Variables) -> Result<Vec<PathBuf>> {
        let substitution = Substitution::new(variables);
        let files = tree::list_files(staging).map_err(|e| failure(staging, format!("{:#}", e)))?;
        let mut binary = Vec::new();

        for relative in files {
            let input = staging.join(&relative);
            let output = staging.join(substitution.relative_path(&relative));
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent).map_err(|e| failure(parent, e))?;
            }

            let bytes = fs::read(&input).map_err(|e| failure(&input, e))?;
            match String::from_utf8(bytes) {
                Ok(text) => {
                    fs::write(&output, substitution.render(&text))
                        .map_err(|e| failure(&output, e))?;
                }
                Err(err) => {
                    tracing::debug!(
                        "{} is not UTF-8 text, copying unchanged",
                        relative.display()
                    );
                    fs::write(&output, err.as_bytes()).map_err(|e| failure(&output, e))?;
                    binary.push(
                        output
                            .strip_prefix(staging)
                            .map(Path::to_path_buf)
                            .unwrap_or_else(|_| output.clone()),
                    );
                }
            }

            if output != input {
                fs::remove_file(&input).map_err(|e| failure(&input, e))?;
                tracing::debug!("Renamed {} to {}", input.display(), output.display());
            }
        }

        Ok(binary)
    }
}

/// Short stable digest of a destination path, used in staging names.
fn destination_digest(destination: &Path) -> String {
    let digest = Sha256::digest(destination.to_string_lossy().as_bytes());
    hex::encode(&digest[..4])
}

fn failure(path: &Path, err: impl std::fmt::Display) -> GryphonError {
    GryphonError::MaterializationFailure {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
