//! Merging configured registries into one namespace.
//!
//! Registries are processed git group first, then local, then remote
//! indexes, each in declaration order. When two registries define the same
//! `(kind, name)`, the one processed last wins.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::config::{GryphonConfig, RegistryEntry};
use crate::error::{GryphonError, Result};
use crate::registry::{
    GitRegistry, LocalRegistry, Registry, RemoteIndexRegistry, TemplateDescriptor, TemplateIndex,
    TemplateKind, UpdateOutcome,
};

/// The configured registries, in processing order.
#[derive(Debug, Clone)]
pub struct RegistryCollection {
    registries: Vec<Registry>,
    destination_root: PathBuf,
}

impl RegistryCollection {
    /// Build the collection described by `config`, caching under `destination_root`.
    ///
    /// Fails with [`GryphonError::InvalidRegistryName`] if a name is not a
    /// single path component, and with [`GryphonError::ConfigurationConflict`]
    /// if two registries share a name. No filesystem or network access
    /// happens here.
    pub fn from_config(config: &GryphonConfig, destination_root: &Path) -> Result<Self> {
        let groups = [
            &config.git_registry,
            &config.local_registry,
            &config.remote_index,
        ];

        let mut seen = HashSet::new();
        for entry in groups.iter().flat_map(|g| g.entries()) {
            if !is_valid_name(&entry.name) {
                return Err(GryphonError::InvalidRegistryName {
                    name: entry.name.clone(),
                });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(GryphonError::ConfigurationConflict {
                    name: entry.name.clone(),
                });
            }
        }

        let mut registries = Vec::new();
        for entry in usable(config.git_registry.entries()) {
            registries.push(Registry::Git(GitRegistry::new(
                &entry.origin,
                destination_root,
                &entry.name,
            )));
        }
        for entry in usable(config.local_registry.entries()) {
            registries.push(Registry::Local(LocalRegistry::new(
                &entry.origin,
                &entry.name,
                destination_root,
            )));
        }
        for entry in usable(config.remote_index.entries()) {
            registries.push(Registry::RemoteIndex(RemoteIndexRegistry::new(
                &entry.name,
                &entry.origin,
            )));
        }

        Ok(Self {
            registries,
            destination_root: destination_root.to_path_buf(),
        })
    }

    /// Root directory registry caches live under.
    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Registries in processing order.
    pub fn registries(&self) -> &[Registry] {
        &self.registries
    }

    pub fn registries_mut(&mut self) -> &mut [Registry] {
        &mut self.registries
    }

    /// Look up a registry by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Registry> {
        self.registries.iter_mut().find(|r| r.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.registries.iter().map(|r| r.name()).collect()
    }

    /// Merged templates of every registry.
    pub fn get_templates(&mut self) -> Result<TemplateIndex> {
        let mut merged = TemplateIndex::new();
        for registry in &mut self.registries {
            merged.merge(registry.get_templates()?.clone());
        }
        Ok(merged)
    }

    /// Find one template in the merged view.
    pub fn find(&mut self, kind: TemplateKind, name: &str) -> Result<TemplateDescriptor> {
        self.get_templates()?
            .get(kind, name)
            .cloned()
            .ok_or_else(|| GryphonError::UnknownTemplate {
                kind: kind.to_string(),
                name: name.to_string(),
            })
    }

    /// Refresh every registry. A failing registry does not stop the others;
    /// each gets its own result.
    pub fn update_all(&mut self) -> Vec<(String, Result<UpdateOutcome>)> {
        self.registries
            .iter_mut()
            .map(|registry| {
                let outcome = registry.update_registry();
                if let Err(e) = &outcome {
                    tracing::warn!("{}", e);
                }
                (registry.name().to_string(), outcome)
            })
            .collect()
    }
}

/// Names become directories under the cache root, so they must be exactly
/// one normal path component.
fn is_valid_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    !name.contains(['/', '\\'])
        && matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
}

/// Entries with an empty origin are placeholders and are skipped.
fn usable(entries: &[RegistryEntry]) -> impl Iterator<Item = &RegistryEntry> {
    entries.iter().filter(|entry| {
        let blank = entry.origin.trim().is_empty();
        if blank {
            tracing::warn!("Registry '{}' has no origin configured, skipping", entry.name);
        }
        !blank
    })
}
