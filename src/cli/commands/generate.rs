//! Generate command implementation.
//!
//! The `gryphon generate` command adds a `generate` template to an existing
//! project.

use crate::cli::args::GenerateArgs;
use crate::error::Result;
use crate::registry::{RegistryCollection, TemplateKind};
use crate::scaffold::Scaffolder;
use crate::ui::UserInterface;

use super::display::{show_outcome, variables_from_args, warn_missing_arguments};
use super::dispatcher::{Command, CommandContext, CommandResult};

/// The generate command implementation.
pub struct GenerateCommand {
    context: CommandContext,
    args: GenerateArgs,
}

impl GenerateCommand {
    pub fn new(context: CommandContext, args: GenerateArgs) -> Self {
        Self { context, args }
    }
}

impl Command for GenerateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.context.load_config()?;
        let mut registries = RegistryCollection::from_config(&config, &self.context.registry_root())?;
        let template = registries.find(TemplateKind::Generate, &self.args.template)?;

        let variables = variables_from_args(&self.args.vars);
        warn_missing_arguments(ui, &template, &variables);

        let project = match &self.args.project {
            Some(path) => self.context.resolve(path),
            None => self.context.working_dir.clone(),
        };
        let outcome = Scaffolder::new().generate(&template, &variables, &project)?;

        show_outcome(ui, &outcome, config.environment_management);
        if !outcome.report.overwritten.is_empty() {
            ui.warning(&format!(
                "{} existing files were overwritten; backups are tagged bak-{}",
                outcome.report.overwritten.len(),
                outcome.entry.sequence
            ));
        }
        ui.success(&format!(
            "Added '{}' to {}",
            template.label(),
            project.display()
        ));
        Ok(CommandResult::success())
    }
}
