//! Init command implementation.
//!
//! The `gryphon init` command creates a new project from an `init` template.

use crate::cli::args::InitArgs;
use crate::error::Result;
use crate::registry::{RegistryCollection, TemplateKind};
use crate::scaffold::Scaffolder;
use crate::ui::UserInterface;

use super::display::{show_outcome, variables_from_args, warn_missing_arguments};
use super::dispatcher::{Command, CommandContext, CommandResult};

/// The init command implementation.
pub struct InitCommand {
    context: CommandContext,
    args: InitArgs,
}

impl InitCommand {
    pub fn new(context: CommandContext, args: InitArgs) -> Self {
        Self { context, args }
    }
}

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.context.load_config()?;
        let mut registries = RegistryCollection::from_config(&config, &self.context.registry_root())?;
        let template = registries.find(TemplateKind::Init, &self.args.template)?;

        let variables = variables_from_args(&self.args.vars);
        warn_missing_arguments(ui, &template, &variables);

        let location = self.context.resolve(&self.args.location);
        let outcome = Scaffolder::new().init(&template, &variables, &location)?;

        show_outcome(ui, &outcome, config.environment_management);
        ui.success(&format!(
            "Created project at {} from '{}'",
            location.display(),
            template.label()
        ));
        Ok(CommandResult::success())
    }
}
