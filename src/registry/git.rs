//! Registries hosted in git repositories.

use std::path::{Path, PathBuf};

use crate::error::{GryphonError, Result};
use crate::registry::fetch::GitFetcher;
use crate::registry::metadata::MetadataStore;
use crate::registry::template::{RegistryKind, TemplateIndex};

/// A registry cloned from a git URL into `<registry_folder>/<name>/`.
#[derive(Debug, Clone)]
pub struct GitRegistry {
    registry_url: String,
    registry_folder: PathBuf,
    registry_name: String,
    fetcher: GitFetcher,
    templates: Option<TemplateIndex>,
}

impl GitRegistry {
    /// Create a git registry. No I/O happens until templates are requested.
    pub fn new(
        registry_url: impl Into<String>,
        registry_folder: impl Into<PathBuf>,
        registry_name: impl Into<String>,
    ) -> Self {
        Self {
            registry_url: registry_url.into(),
            registry_folder: registry_folder.into(),
            registry_name: registry_name.into(),
            fetcher: GitFetcher::new(),
            templates: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.registry_name
    }

    pub fn url(&self) -> &str {
        &self.registry_url
    }

    /// Directory holding the clone.
    pub fn cache_dir(&self) -> PathBuf {
        self.registry_folder.join(&self.registry_name)
    }

    /// Templates from the clone, cloning on first use.
    ///
    /// An existing clone is used as-is; call [`update_registry`](Self::update_registry)
    /// to pull.
    pub fn get_templates(&mut self) -> Result<&TemplateIndex> {
        if self.templates.is_none() {
            let cache_dir = self.cache_dir();
            if !cache_dir.is_dir() {
                tracing::info!(
                    "Cloning registry '{}' from {}",
                    self.registry_name,
                    self.registry_url
                );
                self.fetcher
                    .clone_repo(&self.registry_url, &cache_dir)
                    .map_err(|e| self.unavailable(e))?;
            }
            self.templates = Some(self.load(&cache_dir));
        }
        Ok(self.templates.get_or_insert_with(TemplateIndex::new))
    }

    /// Clone if absent, pull if present, then reload metadata.
    pub fn update_registry(&mut self) -> Result<()> {
        let cache_dir = self.cache_dir();
        let result = self
            .fetcher
            .fetch(&self.registry_url, &cache_dir)
            .map_err(|e| self.unavailable(e))?;

        tracing::info!(
            "Registry '{}' at commit {}",
            self.registry_name,
            &result.commit_sha[..result.commit_sha.len().min(12)]
        );
        self.templates = Some(self.load(&result.local_path));
        Ok(())
    }

    fn load(&self, dir: &Path) -> TemplateIndex {
        MetadataStore::new(&self.registry_name, RegistryKind::Git)
            .load(dir)
            .templates
    }

    fn unavailable(&self, e: anyhow::Error) -> GryphonError {
        GryphonError::SourceUnavailable {
            registry: self.registry_name.clone(),
            message: format!("{:#}", e),
        }
    }
}
