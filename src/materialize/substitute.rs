//! Variable substitution in template file names and contents.
//!
//! Contents: every `{{key}}` token whose key is in the variable map is
//! replaced by its value in a single pass, so values are never re-scanned.
//! Unknown tokens are left verbatim.
//!
//! Paths: the `.handlebars` marker extension is stripped from file names,
//! then both `{{key}}` and the bare `key` are replaced in every path
//! component, matching case-insensitively.

use regex::{Captures, Regex, RegexBuilder};
use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

/// Variable name -> value.
pub type Variables = BTreeMap<String, String>;

/// Extension marking files that go through the rename pipeline.
pub const TEMPLATE_MARKER: &str = ".handlebars";

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]*)\}\}").unwrap());

/// Compiled substitution rules for one materialization.
#[derive(Debug, Clone)]
pub struct Substitution {
    variables: Variables,
    name_pattern: Option<Regex>,
    lowercase: HashMap<String, String>,
}

impl Substitution {
    pub fn new(variables: &Variables) -> Self {
        let mut keys: Vec<&String> = variables.keys().filter(|k| !k.is_empty()).collect();
        // Longest first so `project_name` wins over `project`.
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let name_pattern = if keys.is_empty() {
            None
        } else {
            let alternation = keys
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            RegexBuilder::new(&format!(r"\{{\{{(?:{0})\}}\}}|(?:{0})", alternation))
                .case_insensitive(true)
                .build()
                .ok()
        };

        let lowercase = variables
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect();

        Self {
            variables: variables.clone(),
            name_pattern,
            lowercase,
        }
    }

    /// Output file name for a template file name.
    pub fn file_name(&self, name: &str) -> String {
        self.rename(name.strip_suffix(TEMPLATE_MARKER).unwrap_or(name))
    }

    /// Output path for a file at `relative` inside a template tree.
    ///
    /// Directory components are renamed like file names, without marker
    /// stripping, so `project_name/__init__.py` becomes `demo/__init__.py`.
    pub fn relative_path(&self, relative: &Path) -> PathBuf {
        let mut components = relative.components().peekable();
        let mut output = PathBuf::new();
        while let Some(component) = components.next() {
            match component {
                Component::Normal(part) => {
                    let part = part.to_string_lossy();
                    if components.peek().is_some() {
                        output.push(self.rename(&part));
                    } else {
                        output.push(self.file_name(&part));
                    }
                }
                other => output.push(other),
            }
        }
        output
    }

    fn rename(&self, name: &str) -> String {
        let Some(pattern) = &self.name_pattern else {
            return name.to_string();
        };

        pattern
            .replace_all(name, |caps: &Captures<'_>| {
                let matched = &caps[0];
                let key = matched
                    .strip_prefix("{{")
                    .and_then(|m| m.strip_suffix("}}"))
                    .unwrap_or(matched);
                self.lowercase
                    .get(&key.to_lowercase())
                    .cloned()
                    .unwrap_or_else(|| matched.to_string())
            })
            .into_owned()
    }

    /// Replace `{{key}}` tokens in text.
    pub fn render(&self, text: &str) -> String {
        if self.variables.is_empty() {
            return text.to_string();
        }

        TOKEN_PATTERN
            .replace_all(text, |caps: &Captures<'_>| match self.variables.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn renders_known_tokens() {
        let sub = Substitution::new(&vars(&[("project_name", "demo")]));
        assert_eq!(
            sub.render("# {{project_name}}\nimport {{project_name}}\n"),
            "# demo\nimport demo\n"
        );
    }

    #[test]
    fn leaves_unknown_tokens_verbatim() {
        let sub = Substitution::new(&vars(&[("project_name", "demo")]));
        assert_eq!(sub.render("{{author}} wrote {{project_name}}"), "{{author}} wrote demo");
    }

    #[test]
    fn token_match_is_exact() {
        let sub = Substitution::new(&vars(&[("project_name", "demo")]));
        assert_eq!(sub.render("{{ project_name }}"), "{{ project_name }}");
        assert_eq!(sub.render("{{Project_Name}}"), "{{Project_Name}}");
    }

    #[test]
    fn values_are_not_rescanned() {
        let sub = Substitution::new(&vars(&[("a", "{{b}}"), ("b", "x")]));
        assert_eq!(sub.render("{{a}} {{b}}"), "{{b}} x");
    }

    #[test]
    fn empty_mapping_is_identity() {
        let sub = Substitution::new(&Variables::new());
        assert_eq!(sub.render("{{project_name}}"), "{{project_name}}");
        assert_eq!(sub.file_name("eda.ipynb.handlebars"), "eda.ipynb");
    }

    #[test]
    fn strips_marker_extension() {
        let sub = Substitution::new(&vars(&[("x", "y")]));
        assert_eq!(sub.file_name("README.md.handlebars"), "README.md");
        assert_eq!(sub.file_name("notes.handlebars.txt"), "notes.handlebars.txt");
    }

    #[test]
    fn renames_bare_key_case_insensitively() {
        let sub = Substitution::new(&vars(&[("project_name", "demo")]));
        assert_eq!(sub.file_name("project_name_eda.ipynb"), "demo_eda.ipynb");
        assert_eq!(sub.file_name("PROJECT_NAME.py.handlebars"), "demo.py");
    }

    #[test]
    fn renames_token_in_file_name() {
        let sub = Substitution::new(&vars(&[("project_name", "demo")]));
        assert_eq!(sub.file_name("{{Project_Name}}.md"), "demo.md");
    }

    #[test]
    fn longest_key_wins_in_file_names() {
        let sub = Substitution::new(&vars(&[("project", "p"), ("project_name", "demo")]));
        assert_eq!(sub.file_name("project_name.py"), "demo.py");
        assert_eq!(sub.file_name("project.py"), "p.py");
    }

    #[test]
    fn renames_directories_in_relative_paths() {
        let sub = Substitution::new(&vars(&[("project_name", "demo")]));
        assert_eq!(
            sub.relative_path(Path::new("src/project_name/__init__.py.handlebars")),
            PathBuf::from("src/demo/__init__.py")
        );
        assert_eq!(
            sub.relative_path(Path::new("{{project_name}}/project_name_eda.ipynb")),
            PathBuf::from("demo/demo_eda.ipynb")
        );
    }

    #[test]
    fn marker_is_only_stripped_from_file_names() {
        let sub = Substitution::new(&Variables::new());
        assert_eq!(
            sub.relative_path(Path::new("docs.handlebars/index.md.handlebars")),
            PathBuf::from("docs.handlebars/index.md")
        );
    }

    #[test]
    fn replacement_values_are_literal() {
        let sub = Substitution::new(&vars(&[("name", "$1cost")]));
        assert_eq!(sub.file_name("name.txt"), "$1cost.txt");
        assert_eq!(sub.render("{{name}}"), "$1cost");
    }
}
