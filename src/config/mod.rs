//! Configuration loading and parsing for Gryphon.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! The configuration is an explicit value: callers load it once and pass it
//! to [`crate::registry::RegistryCollection::from_config`].
//!
//! # Example
//!
//! ```
//! use gryphon::config::{parse_config, EnvironmentManager};
//! use std::path::Path;
//!
//! let config = parse_config(
//!     r#"{"local_registry": {"default_registry": "/srv/templates"}}"#,
//!     Path::new("gryphon_config.json"),
//! )
//! .unwrap();
//! assert_eq!(config.local_registry.len(), 1);
//! assert_eq!(config.environment_management, EnvironmentManager::Venv);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    default_config_path, default_registry_root, gryphon_home, load_config, load_default_config,
    parse_config,
};
pub use schema::{EnvironmentManager, GryphonConfig, RegistryEntry, RegistryGroup};
