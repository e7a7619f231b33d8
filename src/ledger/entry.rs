//! Ledger entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::materialize::BackupRecord;
use crate::registry::{RegistryKind, TemplateDescriptor, TemplateKind};

/// Action that produced a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Init,
    Generate,
}

impl Action {
    /// Template kind this action materializes.
    pub fn template_kind(&self) -> TemplateKind {
        match self {
            Self::Init => TemplateKind::Init,
            Self::Generate => TemplateKind::Generate,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_kind().as_str())
    }
}

/// Which template an entry applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateIdentity {
    pub kind: TemplateKind,
    pub name: String,
    pub registry_name: String,
    pub registry_type: RegistryKind,
}

impl From<&TemplateDescriptor> for TemplateIdentity {
    fn from(template: &TemplateDescriptor) -> Self {
        Self {
            kind: template.kind,
            name: template.name.clone(),
            registry_name: template.registry_name.clone(),
            registry_type: template.registry_type,
        }
    }
}

/// One line of the ledger file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Monotonic per-project sequence number, starting at 1.
    pub sequence: u64,

    pub timestamp: DateTime<Utc>,

    pub action: Action,

    pub template: TemplateIdentity,

    /// Variables applied during substitution.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Dependencies the template contributed.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Files that did not exist before, relative to the project root.
    #[serde(default)]
    pub created: Vec<PathBuf>,

    /// Files that were overwritten and their backups.
    #[serde(default)]
    pub overwritten: Vec<BackupRecord>,
}

/// Helper for building a ledger entry during an operation.
pub struct LedgerEntryBuilder {
    sequence: u64,
    timestamp: DateTime<Utc>,
    action: Action,
    template: TemplateIdentity,
    variables: BTreeMap<String, String>,
    dependencies: Vec<String>,
}

impl LedgerEntryBuilder {
    /// Start an entry for `action` applying `template`.
    pub fn start(sequence: u64, action: Action, template: TemplateIdentity) -> Self {
        Self {
            sequence,
            timestamp: Utc::now(),
            action,
            template,
            variables: BTreeMap::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Record the variables applied.
    pub fn variables(mut self, variables: &BTreeMap<String, String>) -> Self {
        self.variables = variables.clone();
        self
    }

    /// Record the template's dependencies.
    pub fn dependencies(mut self, dependencies: &[String]) -> Self {
        self.dependencies = dependencies.to_vec();
        self
    }

    /// Finish with the files the operation wrote.
    pub fn finish(self, created: Vec<PathBuf>, overwritten: Vec<BackupRecord>) -> LedgerEntry {
        LedgerEntry {
            sequence: self.sequence,
            timestamp: self.timestamp,
            action: self.action,
            template: self.template,
            variables: self.variables,
            dependencies: self.dependencies,
            created,
            overwritten,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> TemplateIdentity {
        TemplateIdentity {
            kind: TemplateKind::Generate,
            name: "eda".to_string(),
            registry_name: "default_registry".to_string(),
            registry_type: RegistryKind::Git,
        }
    }

    #[test]
    fn builder_fills_entry() {
        let mut variables = BTreeMap::new();
        variables.insert("project_name".to_string(), "demo".to_string());

        let entry = LedgerEntryBuilder::start(4, Action::Generate, identity())
            .variables(&variables)
            .dependencies(&["pandas".to_string()])
            .finish(
                vec![PathBuf::from("notebooks/eda.ipynb")],
                vec![BackupRecord {
                    original: PathBuf::from("README.md"),
                    backup: PathBuf::from("README.bak-4.md"),
                }],
            );

        assert_eq!(entry.sequence, 4);
        assert_eq!(entry.action, Action::Generate);
        assert_eq!(entry.variables["project_name"], "demo");
        assert_eq!(entry.dependencies, vec!["pandas"]);
        assert_eq!(entry.created.len(), 1);
        assert_eq!(entry.overwritten[0].backup, PathBuf::from("README.bak-4.md"));
    }

    #[test]
    fn entry_serializes_as_one_json_line() {
        let entry = LedgerEntryBuilder::start(1, Action::Init, identity()).finish(vec![], vec![]);
        let line = serde_json::to_string(&entry).unwrap();

        assert!(!line.contains('\n'));
        assert!(line.contains(r#""action":"init""#));
        assert!(line.contains(r#""registry_type":"git""#));
    }

    #[test]
    fn old_entries_without_optional_fields_parse() {
        let line = r#"{"sequence":1,"timestamp":"2024-01-02T03:04:05Z","action":"generate",
            "template":{"kind":"generate","name":"eda","registry_name":"r","registry_type":"local"}}"#;
        let entry: LedgerEntry = serde_json::from_str(line).unwrap();

        assert!(entry.created.is_empty());
        assert!(entry.variables.is_empty());
    }

    #[test]
    fn action_displays_lowercase() {
        assert_eq!(Action::Init.to_string(), "init");
        assert_eq!(Action::Generate.template_kind(), TemplateKind::Generate);
    }
}
