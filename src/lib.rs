//! Gryphon - scaffold analytics projects from template registries.
//!
//! Gryphon reads templates from local directories and git repositories,
//! merges them into one catalogue and materializes a chosen template into a
//! project: variables are substituted, files that would be overwritten are
//! backed up, and every operation is recorded in a per-project ledger.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and parsing
//! - [`dependencies`] - Merging template dependencies into `requirements.txt`
//! - [`error`] - Error types and result aliases
//! - [`ledger`] - Per-project operation ledger and lock
//! - [`materialize`] - Staging, substitution and committing template trees
//! - [`registry`] - Template registries and the merged catalogue
//! - [`scaffold`] - `init` and `generate` project operations
//! - [`tree`] - Directory copy helpers
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use gryphon::materialize::{Substitution, Variables};
//!
//! let mut variables = Variables::new();
//! variables.insert("project_name".to_string(), "demo".to_string());
//!
//! let substitution = Substitution::new(&variables);
//! assert_eq!(substitution.render("# {{project_name}}"), "# demo");
//! assert_eq!(substitution.file_name("project_name_eda.ipynb.handlebars"), "demo_eda.ipynb");
//! ```
//!
//! For registry and project round trips, see the integration tests.

pub mod cli;
pub mod config;
pub mod dependencies;
pub mod error;
pub mod ledger;
pub mod materialize;
pub mod registry;
pub mod scaffold;
pub mod tree;
pub mod ui;

pub use error::{GryphonError, Result};
