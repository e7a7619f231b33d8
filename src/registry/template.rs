//! Template descriptors and the `{kind -> {name -> descriptor}}` index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// What a template is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Scaffolds a brand new project.
    Init,
    /// Adds files to an existing project.
    Generate,
}

impl TemplateKind {
    /// All kinds, in metadata order.
    pub const ALL: [TemplateKind; 2] = [TemplateKind::Init, TemplateKind::Generate];

    /// Directory and metadata key for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Generate => "generate",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "init" => Ok(Self::Init),
            "generate" => Ok(Self::Generate),
            other => Err(format!("unknown template kind '{}'", other)),
        }
    }
}

/// Which kind of registry a template came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryKind {
    Local,
    Git,
    RemoteIndex,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Local => "local",
            Self::Git => "git",
            Self::RemoteIndex => "remote-index",
        };
        f.write_str(s)
    }
}

/// An extra argument a template accepts, as declared in `metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraArgument {
    pub name: String,
    #[serde(default)]
    pub help: String,
}

/// A template loaded from a registry's metadata.
///
/// Identity is `(kind, name)`. Descriptors are rebuilt on every refresh and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDescriptor {
    pub kind: TemplateKind,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    /// Dependency strings, in declaration order.
    pub dependencies: Vec<String>,
    pub extra_arguments: Vec<ExtraArgument>,
    pub registry_type: RegistryKind,
    pub registry_name: String,
    /// The `template/` subtree to materialize.
    pub path: PathBuf,
}

impl TemplateDescriptor {
    /// Human label: `display_name (registry)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_name, self.registry_name)
    }
}

/// Templates indexed by kind, then name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateIndex {
    kinds: BTreeMap<TemplateKind, BTreeMap<String, TemplateDescriptor>>,
}

impl TemplateIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, returning the one it replaced.
    pub fn insert(&mut self, template: TemplateDescriptor) -> Option<TemplateDescriptor> {
        self.kinds
            .entry(template.kind)
            .or_default()
            .insert(template.name.clone(), template)
    }

    /// Merge another index into this one. Entries from `other` win.
    pub fn merge(&mut self, other: TemplateIndex) {
        for template in other.into_iter() {
            if let Some(shadowed) = self.insert(template) {
                tracing::debug!(
                    "Template {}/{} from '{}' is shadowed by a later registry",
                    shadowed.kind,
                    shadowed.name,
                    shadowed.registry_name
                );
            }
        }
    }

    /// Get a template by kind and name.
    pub fn get(&self, kind: TemplateKind, name: &str) -> Option<&TemplateDescriptor> {
        self.kinds.get(&kind).and_then(|m| m.get(name))
    }

    /// All templates of one kind.
    pub fn kind(&self, kind: TemplateKind) -> Option<&BTreeMap<String, TemplateDescriptor>> {
        self.kinds.get(&kind)
    }

    /// Sorted template names of one kind.
    pub fn names(&self, kind: TemplateKind) -> Vec<&str> {
        self.kinds
            .get(&kind)
            .map(|m| m.keys().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Check if a template exists.
    pub fn contains(&self, kind: TemplateKind, name: &str) -> bool {
        self.get(kind, name).is_some()
    }

    /// Total number of templates across kinds.
    pub fn len(&self) -> usize {
        self.kinds.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all templates, `init` first.
    pub fn iter(&self) -> impl Iterator<Item = &TemplateDescriptor> {
        self.kinds.values().flat_map(|m| m.values())
    }
}

impl IntoIterator for TemplateIndex {
    type Item = TemplateDescriptor;
    type IntoIter = std::vec::IntoIter<TemplateDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.kinds
            .into_values()
            .flat_map(|m| m.into_values())
            .collect::<Vec<_>>()
            .into_iter()
    }
}
