//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::registry::TemplateKind;

/// Gryphon - scaffold analytics projects from template registries.
#[derive(Debug, Parser)]
#[command(name = "gryphon")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (defaults to ~/.gryphon/gryphon_config.json)
    #[arg(short, long, global = true, env = "GRYPHON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory registry caches are kept in (defaults to ~/.gryphon/registry)
    #[arg(long, global = true, env = "GRYPHON_REGISTRY_ROOT")]
    pub registry_root: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List templates from every configured registry
    Templates(TemplatesArgs),

    /// Refresh registry caches from their origins
    Update(UpdateArgs),

    /// Create a new project from an init template
    Init(InitArgs),

    /// Add a generate template to an existing project
    Generate(GenerateArgs),

    /// Show the operations recorded for a project
    History(HistoryArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `templates` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TemplatesArgs {
    /// Only list templates of this kind
    #[arg(short, long, value_parser = parse_kind)]
    pub kind: Option<TemplateKind>,
}

/// Arguments for the `update` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct UpdateArgs {
    /// Only refresh this registry
    pub name: Option<String>,
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InitArgs {
    /// Name of the init template
    pub template: String,

    /// Directory to create the project in
    pub location: PathBuf,

    /// Template variable (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_variable)]
    pub vars: Vec<(String, String)>,
}

/// Arguments for the `generate` command.
#[derive(Debug, Clone, clap::Args)]
pub struct GenerateArgs {
    /// Name of the generate template
    pub template: String,

    /// Project root (defaults to the current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Template variable (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_variable)]
    pub vars: Vec<(String, String)>,
}

/// Arguments for the `history` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct HistoryArgs {
    /// Project root (defaults to the current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Show files created and backed up by each operation
    #[arg(long)]
    pub detail: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

fn parse_kind(s: &str) -> Result<TemplateKind, String> {
    s.parse()
}

/// Parse `key=value`. The value may itself contain `=`.
pub fn parse_variable(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
