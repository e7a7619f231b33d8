//! Registry metadata loading.
//!
//! A registry directory describes its templates in `metadata.json`:
//!
//! ```json
//! {
//!   "init": {
//!     "analytics": {
//!       "display_name": "Analytics project",
//!       "description": "Notebooks, src and tests skeleton",
//!       "dependencies": ["pandas", "matplotlib"],
//!       "extra_arguments": [{"name": "author", "help": "Project author"}]
//!     }
//!   },
//!   "generate": {}
//! }
//! ```
//!
//! Each template's files live under `<dir>/<kind>/<name>/template/`. When the
//! root file is absent, per-template `<dir>/<kind>/<name>/metadata.json`
//! files (same object, without the kind/name nesting) are used instead.
//!
//! Loading never fails: a missing or malformed file contributes no templates
//! and produces a [`MetadataWarning`].

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::template::{
    ExtraArgument, RegistryKind, TemplateDescriptor, TemplateIndex, TemplateKind,
};

/// Name of the metadata file.
pub const METADATA_FILE: &str = "metadata.json";

/// Name of the directory holding a template's files.
pub const TEMPLATE_DIR: &str = "template";

#[derive(Debug, Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    extra_arguments: Vec<ExtraArgument>,
}

type RawMetadata = BTreeMap<String, BTreeMap<String, RawDescriptor>>;

/// A recoverable problem found while loading metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataWarning {
    /// No metadata file was found in the directory.
    Missing { directory: PathBuf },
    /// A metadata file exists but could not be parsed.
    Malformed { path: PathBuf, message: String },
}

impl fmt::Display for MetadataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { directory } => write!(
                f,
                "Registry directory {} does not contain a metadata.json file.",
                directory.display()
            ),
            Self::Malformed { path, message } => write!(
                f,
                "Registry file {} has a malformed json on metadata.json file: {}",
                path.display(),
                message
            ),
        }
    }
}

/// Result of loading one directory.
#[derive(Debug, Clone, Default)]
pub struct MetadataLoad {
    pub templates: TemplateIndex,
    pub warnings: Vec<MetadataWarning>,
}

/// Reads `metadata.json` for one registry.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    registry_name: String,
    registry_type: RegistryKind,
}

impl MetadataStore {
    /// Create a store that tags descriptors with their registry.
    pub fn new(registry_name: impl Into<String>, registry_type: RegistryKind) -> Self {
        Self {
            registry_name: registry_name.into(),
            registry_type,
        }
    }

    /// Load all templates described in `directory`.
    pub fn load(&self, directory: &Path) -> MetadataLoad {
        let mut load = MetadataLoad::default();
        let root_file = directory.join(METADATA_FILE);

        if root_file.is_file() {
            match read_json::<RawMetadata>(&root_file) {
                Ok(raw) => self.collect_root(directory, raw, &mut load.templates),
                Err(message) => load.warnings.push(MetadataWarning::Malformed {
                    path: root_file,
                    message,
                }),
            }
        } else if !self.collect_per_template(directory, &mut load) {
            load.warnings.push(MetadataWarning::Missing {
                directory: directory.to_path_buf(),
            });
        }

        for warning in &load.warnings {
            tracing::warn!("{}", warning);
        }
        tracing::debug!(
            "Loaded {} templates from registry '{}' at {}",
            load.templates.len(),
            self.registry_name,
            directory.display()
        );

        load
    }

    fn collect_root(&self, directory: &Path, raw: RawMetadata, templates: &mut TemplateIndex) {
        for (kind_key, entries) in raw {
            let kind = match kind_key.parse::<TemplateKind>() {
                Ok(kind) => kind,
                Err(_) => {
                    tracing::debug!("Ignoring unknown template kind '{}'", kind_key);
                    continue;
                }
            };
            for (name, raw) in entries {
                templates.insert(self.descriptor(directory, kind, name, raw));
            }
        }
    }

    /// Scan `<dir>/<kind>/<name>/metadata.json`. Returns whether any file was found.
    fn collect_per_template(&self, directory: &Path, load: &mut MetadataLoad) -> bool {
        let mut found = false;

        for kind in TemplateKind::ALL {
            let kind_dir = directory.join(kind.as_str());
            let Ok(entries) = fs::read_dir(&kind_dir) else {
                continue;
            };

            let mut names: Vec<String> = entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().join(METADATA_FILE).is_file())
                .filter_map(|e| e.file_name().to_str().map(String::from))
                .collect();
            names.sort();

            for name in names {
                found = true;
                let file = kind_dir.join(&name).join(METADATA_FILE);
                match read_json::<RawDescriptor>(&file) {
                    Ok(raw) => {
                        load.templates
                            .insert(self.descriptor(directory, kind, name, raw));
                    }
                    Err(message) => load.warnings.push(MetadataWarning::Malformed {
                        path: file,
                        message,
                    }),
                }
            }
        }

        found
    }

    fn descriptor(
        &self,
        directory: &Path,
        kind: TemplateKind,
        name: String,
        raw: RawDescriptor,
    ) -> TemplateDescriptor {
        TemplateDescriptor {
            kind,
            path: directory.join(kind.as_str()).join(&name).join(TEMPLATE_DIR),
            display_name: raw.display_name.unwrap_or_else(|| name.clone()),
            description: raw.description,
            dependencies: raw.dependencies,
            extra_arguments: raw.extra_arguments,
            registry_type: self.registry_type,
            registry_name: self.registry_name.clone(),
            name,
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> std::result::Result<T, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const OK_METADATA: &str = r#"{
        "init": {
            "sample_init": {
                "display_name": "Sample init",
                "description": "A sample project",
                "dependencies": ["pandas", "numpy"],
                "extra_arguments": [{"name": "author", "help": "Who wrote it"}]
            }
        },
        "generate": {
            "sample_generate": {"display_name": "Sample generate", "dependencies": []}
        }
    }"#;

    fn store() -> MetadataStore {
        MetadataStore::new("test", RegistryKind::Local)
    }

    #[test]
    fn loads_root_metadata() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(METADATA_FILE), OK_METADATA).unwrap();

        let load = store().load(temp.path());

        assert!(load.warnings.is_empty());
        assert!(load.templates.contains(TemplateKind::Init, "sample_init"));
        assert!(load
            .templates
            .contains(TemplateKind::Generate, "sample_generate"));

        let init = load
            .templates
            .get(TemplateKind::Init, "sample_init")
            .unwrap();
        assert_eq!(init.dependencies, vec!["pandas", "numpy"]);
        assert_eq!(init.extra_arguments[0].name, "author");
        assert_eq!(
            init.path,
            temp.path().join("init").join("sample_init").join("template")
        );
        assert_eq!(init.registry_name, "test");
    }

    #[test]
    fn missing_metadata_warns_once() {
        let temp = TempDir::new().unwrap();

        let load = store().load(temp.path());

        assert!(load.templates.is_empty());
        assert_eq!(load.warnings.len(), 1);
        assert!(matches!(load.warnings[0], MetadataWarning::Missing { .. }));
        let message = load.warnings[0].to_string();
        assert!(message.contains("does not contain a metadata.json file"));
        assert!(message.contains(&temp.path().display().to_string()));
    }

    #[test]
    fn malformed_metadata_warns_once() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(METADATA_FILE), "{ \"init\": [").unwrap();

        let load = store().load(temp.path());

        assert!(load.templates.is_empty());
        assert_eq!(load.warnings.len(), 1);
        assert!(matches!(load.warnings[0], MetadataWarning::Malformed { .. }));
        assert!(load.warnings[0]
            .to_string()
            .contains("has a malformed json on metadata.json file"));
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(METADATA_FILE),
            r#"{"init": {"x": {"dependencies": 3}}}"#,
        )
        .unwrap();

        let load = store().load(temp.path());
        assert!(load.templates.is_empty());
        assert!(matches!(load.warnings[0], MetadataWarning::Malformed { .. }));
    }

    #[test]
    fn display_name_defaults_to_name() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(METADATA_FILE), r#"{"generate": {"eda": {}}}"#).unwrap();

        let load = store().load(temp.path());
        let eda = load.templates.get(TemplateKind::Generate, "eda").unwrap();
        assert_eq!(eda.display_name, "eda");
        assert!(eda.description.is_none());
    }

    #[test]
    fn unknown_kinds_are_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(METADATA_FILE),
            r#"{"add": {"x": {}}, "init": {"y": {}}}"#,
        )
        .unwrap();

        let load = store().load(temp.path());
        assert!(load.warnings.is_empty());
        assert_eq!(load.templates.len(), 1);
    }

    #[test]
    fn loads_per_template_metadata() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("init").join("sample_init");
        fs::create_dir_all(dir.join("template")).unwrap();
        fs::write(
            dir.join(METADATA_FILE),
            r#"{"display_name": "Sample", "dependencies": ["scipy"]}"#,
        )
        .unwrap();

        let load = store().load(temp.path());

        assert!(load.warnings.is_empty());
        let sample = load
            .templates
            .get(TemplateKind::Init, "sample_init")
            .unwrap();
        assert_eq!(sample.display_name, "Sample");
        assert_eq!(sample.path, dir.join("template"));
    }

    #[test]
    fn malformed_per_template_file_skips_only_that_template() {
        let temp = TempDir::new().unwrap();
        for (name, body) in [("good", "{}"), ("bad", "nope")] {
            let dir = temp.path().join("generate").join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(METADATA_FILE), body).unwrap();
        }

        let load = store().load(temp.path());

        assert!(load.templates.contains(TemplateKind::Generate, "good"));
        assert!(!load.templates.contains(TemplateKind::Generate, "bad"));
        assert_eq!(load.warnings.len(), 1);
    }
}
