//! Shared helpers for commands that materialize templates.

use crate::config::EnvironmentManager;
use crate::materialize::Variables;
use crate::registry::{ExtraArgument, TemplateDescriptor};
use crate::scaffold::ScaffoldOutcome;
use crate::ui::UserInterface;

/// Collect `--var` pairs. Later pairs override earlier ones.
pub fn variables_from_args(pairs: &[(String, String)]) -> Variables {
    pairs.iter().cloned().collect()
}

/// Extra arguments the template declares that were not supplied.
pub fn missing_arguments<'a>(
    template: &'a TemplateDescriptor,
    variables: &Variables,
) -> Vec<&'a ExtraArgument> {
    template
        .extra_arguments
        .iter()
        .filter(|arg| !variables.contains_key(&arg.name))
        .collect()
}

/// Warn about declared arguments that were left out.
pub fn warn_missing_arguments(
    ui: &mut dyn UserInterface,
    template: &TemplateDescriptor,
    variables: &Variables,
) {
    for arg in missing_arguments(template, variables) {
        let help = if arg.help.is_empty() {
            String::new()
        } else {
            format!(" ({})", arg.help)
        };
        ui.warning(&format!(
            "Template '{}' uses --var {}=...{} which was not given",
            template.name, arg.name, help
        ));
    }
}

/// Print what a scaffold operation did.
pub fn show_outcome(
    ui: &mut dyn UserInterface,
    outcome: &ScaffoldOutcome,
    environment: EnvironmentManager,
) {
    for path in &outcome.report.created {
        ui.message(&format!("  + {}", path.display()));
    }
    for record in &outcome.report.overwritten {
        ui.message(&format!(
            "  ~ {} (previous version kept as {})",
            record.original.display(),
            record.backup.display()
        ));
    }
    for path in &outcome.report.binary {
        ui.message(&format!("  {} copied without substitution", path.display()));
    }
    if !outcome.entry.dependencies.is_empty() {
        ui.message(&format!(
            "Dependencies: {} (install with `{}`)",
            outcome.entry.dependencies.join(", "),
            environment.install_command()
        ));
    }
}
