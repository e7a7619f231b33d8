//! Registries read straight from a template index.
//!
//! A remote index is never cached: its metadata is read from the index
//! directory and template trees are pulled from it when a template is
//! materialized. Refreshing is not supported.

use std::path::{Path, PathBuf};

use crate::error::{GryphonError, Result};
use crate::registry::metadata::MetadataStore;
use crate::registry::template::{RegistryKind, TemplateIndex};

/// A registry whose templates are fetched on demand from an index.
#[derive(Debug, Clone)]
pub struct RemoteIndexRegistry {
    registry_name: String,
    templates_path: PathBuf,
    templates: Option<TemplateIndex>,
}

impl RemoteIndexRegistry {
    pub fn new(registry_name: impl Into<String>, templates_path: impl Into<PathBuf>) -> Self {
        Self {
            registry_name: registry_name.into(),
            templates_path: templates_path.into(),
            templates: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.registry_name
    }

    /// Index directory the templates are read from.
    pub fn templates_path(&self) -> &Path {
        &self.templates_path
    }

    pub fn get_templates(&mut self) -> Result<&TemplateIndex> {
        if self.templates.is_none() {
            if !self.templates_path.is_dir() {
                return Err(GryphonError::SourceUnavailable {
                    registry: self.registry_name.clone(),
                    message: format!(
                        "template index {} does not exist",
                        self.templates_path.display()
                    ),
                });
            }
            let load = MetadataStore::new(&self.registry_name, RegistryKind::RemoteIndex)
                .load(&self.templates_path);
            self.templates = Some(load.templates);
        }
        Ok(self.templates.get_or_insert_with(TemplateIndex::new))
    }
}
