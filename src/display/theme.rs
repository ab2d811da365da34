//! Color handling for text output.

use console::style;

/// Styling shared by every command that prints text.
pub struct Theme;

impl Theme {
    /// Colors are off when `NO_COLOR` is set or stdout is not a terminal.
    pub fn should_disable_colors() -> bool {
        std::env::var_os("NO_COLOR").is_some() || !console::colors_enabled()
    }

    pub fn header(text: &str) -> String {
        if Self::should_disable_colors() {
            text.to_string()
        } else {
            style(text).cyan().bold().to_string()
        }
    }

    /// Symbol and document names.
    pub fn name(text: &str) -> String {
        if Self::should_disable_colors() {
            text.to_string()
        } else {
            style(text).green().bold().to_string()
        }
    }

    pub fn dim(text: &str) -> String {
        if Self::should_disable_colors() {
            text.to_string()
        } else {
            style(text).dim().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_when_colors_disabled() {
        console::set_colors_enabled(false);
        assert_eq!(Theme::header("Commands:"), "Commands:");
        assert_eq!(Theme::name("pkg.Thing"), "pkg.Thing");
        assert_eq!(Theme::dim("api#pkg.Thing"), "api#pkg.Thing");
    }
}
