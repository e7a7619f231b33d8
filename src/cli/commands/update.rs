//! Update command implementation.
//!
//! The `gryphon update` command refreshes registry caches from their origins.

use crate::cli::args::UpdateArgs;
use crate::error::Result;
use crate::registry::{Registry, UpdateOutcome};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The update command implementation.
pub struct UpdateCommand {
    context: CommandContext,
    args: UpdateArgs,
}

impl UpdateCommand {
    pub fn new(context: CommandContext, args: UpdateArgs) -> Self {
        Self { context, args }
    }

    fn update_one(registry: &mut Registry, ui: &mut dyn UserInterface) -> Result<()> {
        match registry.update_registry()? {
            UpdateOutcome::Updated => ui.success(&format!(
                "Updated {} registry '{}'",
                registry.kind(),
                registry.name()
            )),
            UpdateOutcome::Unsupported => ui.warning(&format!(
                "Registry '{}' is a {} registry; updating is not supported",
                registry.name(),
                registry.kind()
            )),
        }
        Ok(())
    }
}

impl Command for UpdateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut registries = self.context.registries()?;

        if let Some(name) = &self.args.name {
            let Some(registry) = registries.get_mut(name) else {
                ui.error(&format!("Unknown registry '{}'", name));
                return Ok(CommandResult::failure(1));
            };
            Self::update_one(registry, ui)?;
            return Ok(CommandResult::success());
        }

        if registries.registries().is_empty() {
            ui.warning("No registries configured.");
            return Ok(CommandResult::success());
        }

        let mut failed = 0;
        for registry in registries.registries_mut() {
            if let Err(e) = Self::update_one(registry, ui) {
                ui.error(&e.to_string());
                failed += 1;
            }
        }

        if failed > 0 {
            ui.warning(&format!("{} registries could not be updated", failed));
            return Ok(CommandResult::failure(1));
        }
        Ok(CommandResult::success())
    }
}
