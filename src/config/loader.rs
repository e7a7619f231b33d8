//! Configuration file discovery and loading.
//!
//! The config file is JSON (`gryphon_config.json`) by default; `.yml` and
//! `.yaml` files are parsed as YAML.

use crate::config::schema::GryphonConfig;
use crate::error::{GryphonError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Gryphon's home directory: `~/.gryphon`.
pub fn gryphon_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gryphon")
}

/// Default location of the user config: `~/.gryphon/gryphon_config.json`.
pub fn default_config_path() -> PathBuf {
    gryphon_home().join("gryphon_config.json")
}

/// Default root for registry caches: `~/.gryphon/registry`.
pub fn default_registry_root() -> PathBuf {
    gryphon_home().join("registry")
}

/// Load configuration from an explicit path.
///
/// Fails with [`GryphonError::ConfigNotFound`] if the file does not exist.
pub fn load_config(path: &Path) -> Result<GryphonConfig> {
    if !path.exists() {
        return Err(GryphonError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Load the user config, falling back to defaults when no file exists yet.
pub fn load_default_config() -> Result<GryphonConfig> {
    let path = default_config_path();
    if path.exists() {
        load_config(&path)
    } else {
        tracing::debug!("No config at {}, using defaults", path.display());
        Ok(GryphonConfig::default())
    }
}

/// Parse configuration content, picking the format from the file extension.
pub fn parse_config(content: &str, path: &Path) -> Result<GryphonConfig> {
    let is_yaml = path
        .extension()
        .map(|e| e == "yml" || e == "yaml")
        .unwrap_or(false);

    let parsed = if is_yaml {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| GryphonError::ConfigParseError {
        path: path.to_path_buf(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentManager;
    use tempfile::TempDir;

    #[test]
    fn load_missing_config_fails() {
        let temp = TempDir::new().unwrap();
        let result = load_config(&temp.path().join("gryphon_config.json"));
        assert!(matches!(result, Err(GryphonError::ConfigNotFound { .. })));
    }

    #[test]
    fn load_json_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gryphon_config.json");
        fs::write(
            &path,
            r#"{"local_registry": {"r1": "/srv/r1"}, "environment_management": "pipenv"}"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.local_registry.entries()[0].name, "r1");
        assert_eq!(config.environment_management, EnvironmentManager::Pipenv);
    }

    #[test]
    fn load_yaml_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gryphon.yml");
        fs::write(&path, "git_registry:\n  open: https://example.com/t.git\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.git_registry.entries()[0].origin, "https://example.com/t.git");
    }

    #[test]
    fn malformed_config_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gryphon_config.json");
        fs::write(&path, "{ not json").unwrap();

        match load_config(&path) {
            Err(GryphonError::ConfigParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn default_paths_live_under_gryphon_home() {
        assert!(default_config_path().ends_with(".gryphon/gryphon_config.json"));
        assert!(default_registry_root().ends_with(".gryphon/registry"));
    }
}
