//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures every call for
//! later assertion.

use super::{OutputMode, UserInterface};

/// Captures all UI interactions.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Whether any captured line of any kind contains `needle`.
    pub fn has_output(&self, needle: &str) -> bool {
        self.messages
            .iter()
            .chain(&self.successes)
            .chain(&self.warnings)
            .chain(&self.errors)
            .chain(&self.headers)
            .any(|line| line.contains(needle))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_by_kind() {
        let mut ui = MockUI::new();
        ui.message("plain");
        ui.warning("careful");
        ui.error("broken");

        assert_eq!(ui.messages(), ["plain".to_string()]);
        assert_eq!(ui.warnings(), ["careful".to_string()]);
        assert_eq!(ui.errors(), ["broken".to_string()]);
        assert!(ui.has_output("care"));
        assert!(!ui.has_output("missing"));
    }
}
