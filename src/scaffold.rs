//! Project-level `init` and `generate` operations.
//!
//! Both materialize a template into a project under the project lock, append
//! a ledger entry and then merge the template's dependencies into
//! `requirements.txt`. Backups taken while overwriting are tagged `bak-<sequence>` with the
//! sequence number of that ledger entry.

use std::fs;
use std::path::{Path, PathBuf};

use crate::dependencies;
use crate::error::{GryphonError, Result};
use crate::ledger::{Action, Ledger, LedgerEntry, LedgerEntryBuilder, ProjectLock};
use crate::materialize::{MaterializationReport, Materializer, Variables};
use crate::registry::TemplateDescriptor;

/// Variable `init` fills from the project directory name when not given.
pub const PROJECT_NAME_VARIABLE: &str = "project_name";

/// Result of an `init` or `generate`.
#[derive(Debug, Clone)]
pub struct ScaffoldOutcome {
    pub entry: LedgerEntry,
    pub report: MaterializationReport,
    /// The project's full dependency list after merging.
    pub dependencies: Vec<String>,
}

/// Runs `init` and `generate` against project directories.
#[derive(Debug, Clone)]
pub struct Scaffolder {
    staging_root: PathBuf,
}

impl Default for Scaffolder {
    fn default() -> Self {
        Self::new()
    }
}

impl Scaffolder {
    pub fn new() -> Self {
        Self {
            staging_root: std::env::temp_dir(),
        }
    }

    /// Parent directory for staging areas.
    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = root.into();
        self
    }

    /// Create a project at `project_root` from an `init` template.
    pub fn init(
        &self,
        template: &TemplateDescriptor,
        variables: &Variables,
        project_root: &Path,
    ) -> Result<ScaffoldOutcome> {
        fs::create_dir_all(project_root)?;

        let mut variables = variables.clone();
        if !variables.contains_key(PROJECT_NAME_VARIABLE) {
            if let Some(name) = project_root.file_name() {
                variables.insert(
                    PROJECT_NAME_VARIABLE.to_string(),
                    name.to_string_lossy().into_owned(),
                );
            }
        }

        self.run(Action::Init, template, &variables, project_root)
    }

    /// Add a `generate` template to an existing project.
    pub fn generate(
        &self,
        template: &TemplateDescriptor,
        variables: &Variables,
        project_root: &Path,
    ) -> Result<ScaffoldOutcome> {
        if !Ledger::for_project(project_root).exists() {
            return Err(GryphonError::NotAProject {
                path: project_root.to_path_buf(),
            });
        }
        self.run(Action::Generate, template, variables, project_root)
    }

    fn run(
        &self,
        action: Action,
        template: &TemplateDescriptor,
        variables: &Variables,
        project_root: &Path,
    ) -> Result<ScaffoldOutcome> {
        if template.kind != action.template_kind() {
            return Err(GryphonError::UnknownTemplate {
                kind: action.template_kind().to_string(),
                name: template.name.clone(),
            });
        }

        let _lock = ProjectLock::acquire(project_root)?;
        let ledger = Ledger::for_project(project_root);
        let builder = LedgerEntryBuilder::start(ledger.next_sequence()?, action, template.into())
            .variables(variables)
            .dependencies(&template.dependencies);

        tracing::info!(
            "Running {} with template '{}' from '{}'",
            action,
            template.name,
            template.registry_name
        );

        let report = Materializer::new()
            .with_staging_root(&self.staging_root)
            .with_backup_tag(format!("bak-{}", builder.sequence()))
            .instantiate(&template.path, variables, project_root)?;

        // Recorded before requirements.txt is touched: the files are already written.
        let entry = builder.finish(report.created.clone(), report.overwritten.clone());
        ledger.append(&entry)?;

        let dependencies = dependencies::append_requirements(project_root, &template.dependencies)?;

        Ok(ScaffoldOutcome {
            entry,
            report,
            dependencies,
        })
    }
}
