//! Templates command implementation.
//!
//! The `gryphon templates` command lists the merged templates of every
//! configured registry.

use crate::cli::args::TemplatesArgs;
use crate::error::Result;
use crate::registry::{TemplateDescriptor, TemplateKind};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The templates command implementation.
pub struct TemplatesCommand {
    context: CommandContext,
    args: TemplatesArgs,
}

impl TemplatesCommand {
    pub fn new(context: CommandContext, args: TemplatesArgs) -> Self {
        Self { context, args }
    }

    fn format_line(template: &TemplateDescriptor) -> String {
        let mut line = format!("  {} - {}", template.name, template.label());
        if let Some(description) = &template.description {
            line.push_str(&format!(": {}", description));
        }
        line
    }
}

impl Command for TemplatesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut registries = self.context.registries()?;
        let templates = registries.get_templates()?;

        if templates.is_empty() {
            ui.warning("No templates found. Check the registries in your configuration.");
            return Ok(CommandResult::success());
        }

        let kinds: Vec<TemplateKind> = match self.args.kind {
            Some(kind) => vec![kind],
            None => TemplateKind::ALL.to_vec(),
        };

        for kind in kinds {
            let Some(entries) = templates.kind(kind) else {
                continue;
            };
            ui.show_header(&format!("{} templates", kind));
            for template in entries.values() {
                ui.message(&Self::format_line(template));
            }
        }

        Ok(CommandResult::success())
    }
}
