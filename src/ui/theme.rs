//! Visual theme and styling.

use console::Style;

/// Gryphon's visual theme.
#[derive(Debug, Clone)]
pub struct GryphonTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for headers (cyan bold).
    pub header: Style,
}

impl Default for GryphonTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl GryphonTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            header: Style::new().bold().cyan(),
        }
    }

    /// Create a theme without colors (for non-TTY or `NO_COLOR`).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            header: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(title))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_formats_icons() {
        let theme = GryphonTheme::plain();
        assert_eq!(theme.format_success("Done"), "✓ Done");
        assert_eq!(theme.format_warning("Careful"), "⚠ Careful");
        assert_eq!(theme.format_error("Failed"), "✗ Failed");
        assert_eq!(theme.format_header("Templates"), "Templates");
    }
}
