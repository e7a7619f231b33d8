//! Registries backed by a local directory.
//!
//! The origin directory is copied into `<registry_folder>/<name>/` on first
//! use; templates are always read from that cached copy.

use std::path::{Path, PathBuf};

use crate::error::{GryphonError, Result};
use crate::registry::metadata::MetadataStore;
use crate::registry::template::{RegistryKind, TemplateIndex};
use crate::tree;

/// A registry copied from a directory on disk.
#[derive(Debug, Clone)]
pub struct LocalRegistry {
    registry_origin: PathBuf,
    registry_name: String,
    registry_folder: PathBuf,
    templates: Option<TemplateIndex>,
}

impl LocalRegistry {
    /// Create a local registry. No I/O happens until templates are requested.
    pub fn new(
        registry_origin: impl Into<PathBuf>,
        registry_name: impl Into<String>,
        registry_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry_origin: registry_origin.into(),
            registry_name: registry_name.into(),
            registry_folder: registry_folder.into(),
            templates: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.registry_name
    }

    pub fn origin(&self) -> &Path {
        &self.registry_origin
    }

    /// Directory holding the cached copy.
    pub fn cache_dir(&self) -> PathBuf {
        self.registry_folder.join(&self.registry_name)
    }

    /// Templates from the cached copy, copying the origin on first use.
    pub fn get_templates(&mut self) -> Result<&TemplateIndex> {
        if self.templates.is_none() {
            if !self.cache_dir().is_dir() {
                self.copy_origin()?;
            }
            self.templates = Some(self.load());
        }
        Ok(self.templates.get_or_insert_with(TemplateIndex::new))
    }

    /// Re-copy the origin into the cache and reload metadata.
    pub fn update_registry(&mut self) -> Result<()> {
        self.copy_origin()?;
        self.templates = Some(self.load());
        Ok(())
    }

    fn copy_origin(&self) -> Result<()> {
        if !self.registry_origin.is_dir() {
            return Err(GryphonError::SourceUnavailable {
                registry: self.registry_name.clone(),
                message: format!(
                    "registry path {} does not exist",
                    self.registry_origin.display()
                ),
            });
        }

        let cache_dir = self.cache_dir();
        tracing::info!(
            "Copying registry '{}' from {}",
            self.registry_name,
            self.registry_origin.display()
        );

        let result = std::fs::create_dir_all(&self.registry_folder)
            .map_err(anyhow::Error::from)
            .and_then(|_| {
                let work = tempfile::Builder::new()
                    .prefix(".gryphon-copy-")
                    .tempdir_in(&self.registry_folder)?;
                let fresh = work.path().join(&self.registry_name);
                tree::copy_tree(&self.registry_origin, &fresh)?;
                tree::replace_dir(&fresh, &cache_dir)
            });

        result.map_err(|e| GryphonError::SourceUnavailable {
            registry: self.registry_name.clone(),
            message: format!("{:#}", e),
        })
    }

    fn load(&self) -> TemplateIndex {
        MetadataStore::new(&self.registry_name, RegistryKind::Local)
            .load(&self.cache_dir())
            .templates
    }
}
