//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Every command receives a
//! [`CommandContext`] carrying the global flags.

pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod generate;
pub mod history;
pub mod init;
pub mod templates;
pub mod update;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};
