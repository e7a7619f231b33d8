//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for the settings every command shares
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::{self, GryphonConfig};
use crate::error::Result;
use crate::registry::RegistryCollection;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Directory relative paths are resolved against.
    pub working_dir: PathBuf,
    /// Explicit config file, if given.
    pub config_path: Option<PathBuf>,
    /// Registry cache root, if overridden.
    pub registry_root: Option<PathBuf>,
}

impl CommandContext {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            config_path: None,
            registry_root: None,
        }
    }

    /// Load the configuration. A missing default config is an empty one.
    pub fn load_config(&self) -> Result<GryphonConfig> {
        match &self.config_path {
            Some(path) => config::load_config(&self.resolve(path)),
            None => config::load_default_config(),
        }
    }

    pub fn registry_root(&self) -> PathBuf {
        self.registry_root
            .as_ref()
            .map(|p| self.resolve(p))
            .unwrap_or_else(config::default_registry_root)
    }

    /// Build the registry collection described by the configuration.
    pub fn registries(&self) -> Result<RegistryCollection> {
        let config = self.load_config()?;
        RegistryCollection::from_config(&config, &self.registry_root())
    }

    /// Resolve `path` against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Build the dispatcher for parsed arguments run from `working_dir`.
    pub fn from_cli(cli: &Cli, working_dir: PathBuf) -> Self {
        let mut context = CommandContext::new(working_dir);
        context.config_path = cli.config.clone();
        context.registry_root = cli.registry_root.clone();
        Self::new(context)
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let context = self.context.clone();
        match &cli.command {
            Commands::Templates(args) => {
                super::templates::TemplatesCommand::new(context, args.clone()).execute(ui)
            }
            Commands::Update(args) => {
                super::update::UpdateCommand::new(context, args.clone()).execute(ui)
            }
            Commands::Init(args) => {
                super::init::InitCommand::new(context, args.clone()).execute(ui)
            }
            Commands::Generate(args) => {
                super::generate::GenerateCommand::new(context, args.clone()).execute(ui)
            }
            Commands::History(args) => {
                super::history::HistoryCommand::new(context, args.clone()).execute(ui)
            }
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
        }
    }
}
