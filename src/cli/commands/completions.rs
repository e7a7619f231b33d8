//! Shell completions generation.
//!
//! The `gryphon completions` command generates shell completion scripts.

use crate::cli::args::{Cli, CompletionsArgs};
use crate::ui::UserInterface;
use clap::CommandFactory;

use super::dispatcher::{Command, CommandResult};

/// The completions command implementation.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }

    /// Write the completion script for the configured shell.
    pub fn write_to(&self, out: &mut dyn std::io::Write) {
        let mut cmd = Cli::command();
        clap_complete::generate(self.args.shell, &mut cmd, "gryphon", out);
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        self.write_to(&mut std::io::stdout());
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap_complete::Shell;

    fn generate(shell: Shell) -> String {
        let mut buf = Vec::new();
        CompletionsCommand::new(CompletionsArgs { shell }).write_to(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn generates_bash_completions() {
        let output = generate(Shell::Bash);
        assert!(output.contains("gryphon"));
        assert!(output.contains("complete"));
        assert!(output.contains("generate"));
    }

    #[test]
    fn generates_zsh_completions() {
        assert!(generate(Shell::Zsh).contains("gryphon"));
    }

    #[test]
    fn generates_fish_completions() {
        assert!(generate(Shell::Fish).contains("gryphon"));
    }
}
