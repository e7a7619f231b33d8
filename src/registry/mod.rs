//! Template registries for Gryphon.
//!
//! A registry is one named source of templates:
//! - [`LocalRegistry`] - a directory copied into the registry cache
//! - [`GitRegistry`] - a git repository cloned into the registry cache
//! - [`RemoteIndexRegistry`] - an index read in place, never cached
//!
//! [`RegistryCollection`] merges the configured registries into one
//! `{kind -> {name -> descriptor}}` view.
//!
//! # Example
//!
//! ```no_run
//! use gryphon::config::{GryphonConfig, RegistryGroup};
//! use gryphon::registry::{RegistryCollection, TemplateKind};
//! use std::path::Path;
//!
//! let config = GryphonConfig {
//!     local_registry: RegistryGroup::new().with("r1", "/srv/templates"),
//!     ..Default::default()
//! };
//! let mut registries = RegistryCollection::from_config(&config, Path::new("/tmp/cache")).unwrap();
//! let templates = registries.get_templates().unwrap();
//! for name in templates.names(TemplateKind::Init) {
//!     println!("{}", name);
//! }
//! ```

pub mod collection;
pub mod fetch;
pub mod git;
pub mod local;
pub mod metadata;
pub mod remote_index;
pub mod template;

use std::path::PathBuf;

use crate::error::Result;

pub use collection::RegistryCollection;
pub use fetch::{GitFetchResult, GitFetcher};
pub use git::GitRegistry;
pub use local::LocalRegistry;
pub use metadata::{MetadataLoad, MetadataStore, MetadataWarning};
pub use remote_index::RemoteIndexRegistry;
pub use template::{
    ExtraArgument, RegistryKind, TemplateDescriptor, TemplateIndex, TemplateKind,
};

/// Outcome of refreshing a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The cache was refreshed from the origin.
    Updated,
    /// This kind of registry cannot be refreshed.
    Unsupported,
}

/// One configured template source.
#[derive(Debug, Clone)]
pub enum Registry {
    Local(LocalRegistry),
    Git(GitRegistry),
    RemoteIndex(RemoteIndexRegistry),
}

impl Registry {
    pub fn name(&self) -> &str {
        match self {
            Self::Local(r) => r.name(),
            Self::Git(r) => r.name(),
            Self::RemoteIndex(r) => r.name(),
        }
    }

    pub fn kind(&self) -> RegistryKind {
        match self {
            Self::Local(_) => RegistryKind::Local,
            Self::Git(_) => RegistryKind::Git,
            Self::RemoteIndex(_) => RegistryKind::RemoteIndex,
        }
    }

    /// Where templates are read from on disk.
    pub fn location(&self) -> PathBuf {
        match self {
            Self::Local(r) => r.cache_dir(),
            Self::Git(r) => r.cache_dir(),
            Self::RemoteIndex(r) => r.templates_path().to_path_buf(),
        }
    }

    /// Current templates, materializing the cache on first use.
    pub fn get_templates(&mut self) -> Result<&TemplateIndex> {
        match self {
            Self::Local(r) => r.get_templates(),
            Self::Git(r) => r.get_templates(),
            Self::RemoteIndex(r) => r.get_templates(),
        }
    }

    /// Refresh the cache from the origin.
    ///
    /// Remote indexes report [`UpdateOutcome::Unsupported`] instead of failing.
    pub fn update_registry(&mut self) -> Result<UpdateOutcome> {
        match self {
            Self::Local(r) => r.update_registry().map(|_| UpdateOutcome::Updated),
            Self::Git(r) => r.update_registry().map(|_| UpdateOutcome::Updated),
            Self::RemoteIndex(r) => {
                tracing::debug!("Registry '{}' is a remote index, nothing to update", r.name());
                Ok(UpdateOutcome::Unsupported)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn remote_index_update_is_unsupported() {
        let temp = TempDir::new().unwrap();
        let mut registry = Registry::RemoteIndex(RemoteIndexRegistry::new("idx", temp.path()));

        assert_eq!(registry.update_registry().unwrap(), UpdateOutcome::Unsupported);
        assert_eq!(registry.kind(), RegistryKind::RemoteIndex);
    }

    #[test]
    fn local_update_reports_updated() {
        let temp = TempDir::new().unwrap();
        let origin = temp.path().join("origin");
        std::fs::create_dir_all(&origin).unwrap();
        std::fs::write(origin.join("metadata.json"), "{}").unwrap();

        let mut registry =
            Registry::Local(LocalRegistry::new(&origin, "r1", temp.path().join("cache")));

        assert_eq!(registry.update_registry().unwrap(), UpdateOutcome::Updated);
        assert_eq!(registry.location(), temp.path().join("cache").join("r1"));
        assert!(registry.location().join("metadata.json").exists());
    }
}
