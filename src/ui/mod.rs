//! Terminal output for the CLI.
//!
//! Commands talk to a [`UserInterface`] instead of printing directly, so
//! tests can capture their output with [`MockUI`].
//!
//! # Example
//!
//! ```
//! use gryphon::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.success("Template materialized");
//! assert_eq!(ui.successes(), ["Template materialized".to_string()]);
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, GryphonTheme};

/// Sink for user-facing output.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a plain message.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Always shown.
    fn error(&mut self, msg: &str);

    /// Show a section header.
    fn show_header(&mut self, title: &str);
}
