//! Error types for Gryphon operations.
//!
//! This module defines [`GryphonError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Structural problems (duplicate registry names, unreachable sources,
//!   failed copies) are `GryphonError` variants and propagate to the CLI
//! - Recoverable conditions (malformed `metadata.json`, binary template files)
//!   never become errors; they are logged and reported as data
//! - Use `anyhow::Error` (via `GryphonError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Gryphon operations.
#[derive(Debug, Error)]
pub enum GryphonError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Two configured registries share a name.
    #[error("Duplicate registry name '{name}' in configuration")]
    ConfigurationConflict { name: String },

    /// A registry name that cannot be used as a cache directory name.
    #[error("Invalid registry name '{name}': must be a single, non-empty path component")]
    InvalidRegistryName { name: String },

    /// A registry origin could not be reached or copied.
    #[error("Registry '{registry}' is unavailable: {message}")]
    SourceUnavailable { registry: String, message: String },

    /// Referenced template does not exist.
    #[error("Unknown {kind} template: {name}")]
    UnknownTemplate { kind: String, name: String },

    /// Copying a template into its destination failed.
    #[error("Failed to materialize template at {path}: {message}")]
    MaterializationFailure { path: PathBuf, message: String },

    /// The target directory has no Gryphon ledger.
    #[error("{path} is not a Gryphon project (run `gryphon init` first)")]
    NotAProject { path: PathBuf },

    /// Another invocation holds the project lock.
    #[error("Project is locked by another Gryphon process: {path}")]
    ProjectLocked { path: PathBuf },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Gryphon operations.
pub type Result<T> = std::result::Result<T, GryphonError>;
