//! Configuration schema definitions for Gryphon.
//!
//! This module contains the struct definitions that map to
//! the `gryphon_config.json` file format.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Root configuration structure for `gryphon_config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GryphonConfig {
    /// Git-hosted registries: name -> repository URL
    pub git_registry: RegistryGroup,

    /// Local directory registries: name -> path
    pub local_registry: RegistryGroup,

    /// Remote index registries: name -> index directory
    #[serde(skip_serializing_if = "RegistryGroup::is_empty")]
    pub remote_index: RegistryGroup,

    /// Environment manager used by the installer collaborator
    pub environment_management: EnvironmentManager,
}

/// Environment manager selector.
///
/// Gryphon itself never invokes the manager; the value is handed to
/// whatever installs the dependency list produced by a scaffold operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentManager {
    #[default]
    Venv,
    Conda,
    Pipenv,
}

impl EnvironmentManager {
    /// Command that installs a project's `requirements.txt` with this manager.
    pub fn install_command(&self) -> &'static str {
        match self {
            Self::Venv => "pip install -r requirements.txt",
            Self::Conda => "conda install --file requirements.txt",
            Self::Pipenv => "pipenv install -r requirements.txt",
        }
    }
}

/// A single configured registry: its name and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Registry name, used as the cache directory name.
    pub name: String,
    /// Git URL or filesystem path, depending on the group.
    pub origin: String,
}

/// An ordered group of registries as declared in the config file.
///
/// Unlike a map, the group keeps declaration order and keeps duplicate
/// names, so the registry collection can reject them explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryGroup {
    entries: Vec<RegistryEntry>,
}

impl RegistryGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, builder style.
    pub fn with(mut self, name: impl Into<String>, origin: impl Into<String>) -> Self {
        self.push(name, origin);
        self
    }

    /// Append an entry.
    pub fn push(&mut self, name: impl Into<String>, origin: impl Into<String>) {
        self.entries.push(RegistryEntry {
            name: name.into(),
            origin: origin.into(),
        });
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for RegistryGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.origin)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RegistryGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GroupVisitor;

        impl<'de> Visitor<'de> for GroupVisitor {
            type Value = RegistryGroup;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of registry name to origin")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(RegistryGroup::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut group = RegistryGroup::default();
                while let Some((name, origin)) = map.next_entry::<String, String>()? {
                    group.push(name, origin);
                }
                Ok(group)
            }
        }

        deserializer.deserialize_any(GroupVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_command_matches_manager() {
        assert!(EnvironmentManager::Venv.install_command().starts_with("pip "));
        assert!(EnvironmentManager::Conda.install_command().starts_with("conda "));
        assert!(EnvironmentManager::Pipenv.install_command().starts_with("pipenv "));
    }

    #[test]
    fn empty_config_has_defaults() {
        let config: GryphonConfig = serde_json::from_str("{}").unwrap();
        assert!(config.git_registry.is_empty());
        assert!(config.local_registry.is_empty());
        assert!(config.remote_index.is_empty());
        assert_eq!(config.environment_management, EnvironmentManager::Venv);
    }

    #[test]
    fn parses_registry_groups_in_order() {
        let json = r#"{
            "git_registry": {"open-source": "https://github.com/org/templates.git"},
            "local_registry": {"zeta": "/srv/zeta", "alpha": "/srv/alpha"},
            "environment_management": "conda"
        }"#;
        let config: GryphonConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.git_registry.len(), 1);
        let names: Vec<&str> = config
            .local_registry
            .entries()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(config.environment_management, EnvironmentManager::Conda);
    }

    #[test]
    fn keeps_duplicate_names() {
        let json = r#"{"local_registry": {"dup": "/a", "dup": "/b"}}"#;
        let config: GryphonConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.local_registry.len(), 2);
        assert_eq!(config.local_registry.entries()[1].origin, "/b");
    }

    #[test]
    fn parses_yaml_config() {
        let yaml = r#"
git_registry:
  open-source: https://github.com/org/templates.git
local_registry:
  default_registry: ./registry
environment_management: pipenv
"#;
        let config: GryphonConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.local_registry.entries()[0].origin, "./registry");
        assert_eq!(config.environment_management, EnvironmentManager::Pipenv);
    }

    #[test]
    fn null_group_is_empty() {
        let config: GryphonConfig = serde_json::from_str(r#"{"git_registry": null}"#).unwrap();
        assert!(config.git_registry.is_empty());
    }

    #[test]
    fn serializes_groups_as_mappings() {
        let config = GryphonConfig {
            local_registry: RegistryGroup::new().with("r1", "/srv/r1"),
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["local_registry"]["r1"], "/srv/r1");
        assert_eq!(json["environment_management"], "venv");
        assert!(json.get("remote_index").is_none());
    }
}
