//! Per-project operation ledger.
//!
//! Every `init` and `generate` appends one JSON line to `.gryphon_history`
//! in the project root, listing the files it created and the files it
//! overwrote together with their backups. Entries are never rewritten.

pub mod entry;
pub mod lock;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::materialize::BackupRecord;

pub use entry::{Action, LedgerEntry, LedgerEntryBuilder, TemplateIdentity};
pub use lock::{ProjectLock, LOCK_FILE};

/// The ledger of one project.
#[derive(Debug, Clone)]
pub struct Ledger {
    project_root: PathBuf,
}

impl Ledger {
    /// Name of the ledger file inside the project root.
    pub const FILE_NAME: &'static str = ".gryphon_history";

    pub fn for_project(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn path(&self) -> PathBuf {
        self.project_root.join(Self::FILE_NAME)
    }

    /// Whether the project has a ledger yet.
    pub fn exists(&self) -> bool {
        self.path().is_file()
    }

    /// All entries, oldest first. A missing ledger reads as empty.
    ///
    /// Lines that do not parse are skipped with a warning.
    pub fn read(&self) -> Result<Vec<LedgerEntry>> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let mut entries = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LedgerEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    "Skipping malformed ledger line {} in {}: {}",
                    number + 1,
                    path.display(),
                    e
                ),
            }
        }
        Ok(entries)
    }

    /// Sequence number the next entry will get.
    pub fn next_sequence(&self) -> Result<u64> {
        let last = self.read()?.iter().map(|e| e.sequence).max().unwrap_or(0);
        Ok(last + 1)
    }

    /// Record an operation with no variables or dependencies.
    pub fn record(
        &self,
        action: Action,
        template: TemplateIdentity,
        created: Vec<PathBuf>,
        overwritten: Vec<BackupRecord>,
    ) -> Result<LedgerEntry> {
        let entry = LedgerEntryBuilder::start(self.next_sequence()?, action, template)
            .finish(created, overwritten);
        self.append(&entry)?;
        Ok(entry)
    }

    /// Append a finished entry, creating the ledger if needed.
    pub fn append(&self, entry: &LedgerEntry) -> Result<()> {
        fs::create_dir_all(&self.project_root)?;
        let line = serde_json::to_string(entry).map_err(anyhow::Error::from)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())?;
        writeln!(file, "{}", line)?;

        tracing::debug!(
            "Recorded {} #{} in {}",
            entry.action,
            entry.sequence,
            self.path().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{RegistryKind, TemplateKind};
    use tempfile::TempDir;

    fn identity(name: &str) -> TemplateIdentity {
        TemplateIdentity {
            kind: TemplateKind::Init,
            name: name.to_string(),
            registry_name: "r1".to_string(),
            registry_type: RegistryKind::Local,
        }
    }

    #[test]
    fn missing_ledger_reads_empty() {
        let temp = TempDir::new().unwrap();
        let ledger = Ledger::for_project(temp.path());

        assert!(!ledger.exists());
        assert!(ledger.read().unwrap().is_empty());
        assert_eq!(ledger.next_sequence().unwrap(), 1);
    }

    #[test]
    fn record_appends_in_order() {
        let temp = TempDir::new().unwrap();
        let ledger = Ledger::for_project(temp.path());

        ledger
            .record(
                Action::Init,
                identity("analytics"),
                vec![PathBuf::from("README.md")],
                vec![],
            )
            .unwrap();
        let second = ledger
            .record(
                Action::Generate,
                identity("eda"),
                vec![],
                vec![BackupRecord {
                    original: PathBuf::from("README.md"),
                    backup: PathBuf::from("README.bak-2.md"),
                }],
            )
            .unwrap();

        assert_eq!(second.sequence, 2);
        let entries = ledger.read().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].template.name, "analytics");
        assert_eq!(entries[0].created, vec![PathBuf::from("README.md")]);
        assert_eq!(entries[1], second);
        assert_eq!(ledger.next_sequence().unwrap(), 3);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let temp = TempDir::new().unwrap();
        let ledger = Ledger::for_project(temp.path());
        ledger
            .record(Action::Init, identity("analytics"), vec![], vec![])
            .unwrap();
        let mut content = fs::read_to_string(ledger.path()).unwrap();
        content.push_str("not json\n\n");
        fs::write(ledger.path(), content).unwrap();

        assert_eq!(ledger.read().unwrap().len(), 1);
    }

    #[test]
    fn append_creates_project_root() {
        let temp = TempDir::new().unwrap();
        let ledger = Ledger::for_project(temp.path().join("new"));

        ledger
            .record(Action::Init, identity("analytics"), vec![], vec![])
            .unwrap();

        assert!(ledger.exists());
    }
}
