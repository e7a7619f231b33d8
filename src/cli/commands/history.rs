//! History command implementation.
//!
//! The `gryphon history` command shows the operations recorded in a
//! project's ledger.

use crate::cli::args::HistoryArgs;
use crate::error::{GryphonError, Result};
use crate::ledger::{Ledger, LedgerEntry};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The history command implementation.
pub struct HistoryCommand {
    context: CommandContext,
    args: HistoryArgs,
}

impl HistoryCommand {
    pub fn new(context: CommandContext, args: HistoryArgs) -> Self {
        Self { context, args }
    }

    /// Format a single entry line.
    fn format_entry_line(entry: &LedgerEntry) -> String {
        format!(
            "#{} {} {} {}/{} from '{}' ({} created, {} overwritten)",
            entry.sequence,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.action,
            entry.template.kind,
            entry.template.name,
            entry.template.registry_name,
            entry.created.len(),
            entry.overwritten.len()
        )
    }

    fn show_entry_detail(ui: &mut dyn UserInterface, entry: &LedgerEntry) {
        for path in &entry.created {
            ui.message(&format!("    + {}", path.display()));
        }
        for record in &entry.overwritten {
            ui.message(&format!(
                "    ~ {} -> {}",
                record.original.display(),
                record.backup.display()
            ));
        }
        if !entry.variables.is_empty() {
            let vars: Vec<String> = entry
                .variables
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            ui.message(&format!("    Variables: {}", vars.join(", ")));
        }
    }
}

impl Command for HistoryCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let project = match &self.args.project {
            Some(path) => self.context.resolve(path),
            None => self.context.working_dir.clone(),
        };
        let ledger = Ledger::for_project(&project);
        if !ledger.exists() {
            return Err(GryphonError::NotAProject { path: project });
        }

        let entries = ledger.read()?;
        if entries.is_empty() {
            ui.message("No operations recorded for this project.");
            return Ok(CommandResult::success());
        }

        ui.show_header("Project History");
        for entry in &entries {
            ui.message(&Self::format_entry_line(entry));
            if self.args.detail {
                Self::show_entry_detail(ui, entry);
            }
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Action, TemplateIdentity};
    use crate::materialize::BackupRecord;
    use crate::registry::{RegistryKind, TemplateKind};
    use crate::ui::MockUI;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn seeded_project(root: &std::path::Path) {
        let ledger = Ledger::for_project(root);
        ledger
            .record(
                Action::Generate,
                TemplateIdentity {
                    kind: TemplateKind::Generate,
                    name: "eda".to_string(),
                    registry_name: "r1".to_string(),
                    registry_type: RegistryKind::Git,
                },
                vec![PathBuf::from("notebooks/eda.ipynb")],
                vec![BackupRecord {
                    original: PathBuf::from("README.md"),
                    backup: PathBuf::from("README.bak-1.md"),
                }],
            )
            .unwrap();
    }

    #[test]
    fn lists_entries() {
        let temp = TempDir::new().unwrap();
        seeded_project(temp.path());
        let mut ui = MockUI::new();

        HistoryCommand::new(CommandContext::new(temp.path()), HistoryArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(ui.headers(), ["Project History".to_string()]);
        assert!(ui.messages()[0].starts_with("#1 "));
        assert!(ui.messages()[0].contains("generate generate/eda from 'r1' (1 created, 1 overwritten)"));
        assert_eq!(ui.messages().len(), 1);
    }

    #[test]
    fn detail_lists_files() {
        let temp = TempDir::new().unwrap();
        seeded_project(temp.path());
        let mut ui = MockUI::new();

        HistoryCommand::new(
            CommandContext::new(temp.path()),
            HistoryArgs {
                project: None,
                detail: true,
            },
        )
        .execute(&mut ui)
        .unwrap();

        assert!(ui.has_output("+ notebooks/eda.ipynb"));
        assert!(ui.has_output("~ README.md -> README.bak-1.md"));
    }

    #[test]
    fn missing_ledger_is_not_a_project() {
        let temp = TempDir::new().unwrap();
        let result = HistoryCommand::new(CommandContext::new(temp.path()), HistoryArgs::default())
            .execute(&mut MockUI::new());
        assert!(matches!(result, Err(GryphonError::NotAProject { .. })));
    }
}
