//! Station color scheme.
//!
//! Result banners need to be readable from across a workbench, so the
//! comparison outcome gets a full background color. Everything degrades to
//! plain text with `--no-color` or `NO_COLOR`.

use crate::model::Severity;
use crate::state::{ComparisonResult, Mode};
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Explicit setting, ignoring the environment.
    pub fn with_colors(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== StationStyles =====

/// Styles for every element of the station screen.
#[derive(Debug, Clone, Copy)]
pub struct StationStyles {
    colors: bool,
}

impl StationStyles {
    /// Styles that are plain when `config` disables colors.
    pub fn with_color_config(config: ColorConfig) -> Self {
        Self {
            colors: config.colors_enabled(),
        }
    }

    fn colored(&self, style: Style) -> Style {
        if self.colors {
            style
        } else {
            Style::default()
        }
    }

    /// Header bar, tinted by mode.
    pub fn header(&self, mode: Mode) -> Style {
        let bg = match mode {
            Mode::CaptureReference => Color::Cyan,
            Mode::Compare => Color::Magenta,
        };
        self.colored(Style::default().fg(Color::Black).bg(bg))
            .add_modifier(Modifier::BOLD)
    }

    /// Comparison banner. Without colors, emphasis still distinguishes a result
    /// from the idle prompt.
    pub fn result(&self, result: ComparisonResult) -> Style {
        match result {
            ComparisonResult::Match => self
                .colored(Style::default().fg(Color::Black).bg(Color::Green))
                .add_modifier(Modifier::BOLD),
            ComparisonResult::NoMatch => self
                .colored(Style::default().fg(Color::White).bg(Color::Red))
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ComparisonResult::None => self.dim(),
        }
    }

    /// Notice title style.
    pub fn severity(&self, severity: Severity) -> Style {
        match severity {
            Severity::Info => self.colored(Style::default().fg(Color::Cyan)),
            Severity::Success => self.colored(Style::default().fg(Color::Green)),
            Severity::Error => self
                .colored(Style::default().fg(Color::Red))
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Record field labels.
    pub fn label(&self) -> Style {
        self.colored(Style::default().fg(Color::Yellow))
    }

    /// The scanned code itself.
    pub fn code(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Secondary text: hints, placeholders, footer.
    pub fn dim(&self) -> Style {
        self.colored(Style::default().fg(Color::DarkGray))
    }
}

impl Default for StationStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // ===== ColorConfig Tests =====

    #[test]
    #[serial(no_color_env)]
    fn color_config_respects_no_color_flag() {
        std::env::remove_var("NO_COLOR");
        let config = ColorConfig::from_env_and_args(true);
        assert!(
            !config.colors_enabled(),
            "--no-color flag should disable colors"
        );
    }

    #[test]
    #[serial(no_color_env)]
    fn color_config_respects_no_color_env_var() {
        std::env::set_var("NO_COLOR", "1");
        let config = ColorConfig::from_env_and_args(false);
        assert!(
            !config.colors_enabled(),
            "NO_COLOR env var should disable colors"
        );
        std::env::remove_var("NO_COLOR");
    }

    #[test]
    #[serial(no_color_env)]
    fn color_config_enables_colors_by_default() {
        std::env::remove_var("NO_COLOR");
        let config = ColorConfig::from_env_and_args(false);
        assert!(config.colors_enabled(), "Colors should be enabled by default");
    }

    #[test]
    #[serial(no_color_env)]
    fn color_config_no_color_env_any_value_disables() {
        // NO_COLOR can be any value (even empty string)
        std::env::set_var("NO_COLOR", "");
        let config = ColorConfig::from_env_and_args(false);
        assert!(
            !config.colors_enabled(),
            "NO_COLOR with empty string should disable colors"
        );
        std::env::remove_var("NO_COLOR");
    }

    // ===== StationStyles Tests =====

    #[test]
    fn match_and_no_match_banners_differ() {
        let styles = StationStyles::with_color_config(ColorConfig::with_colors(true));
        assert_ne!(
            styles.result(ComparisonResult::Match),
            styles.result(ComparisonResult::NoMatch)
        );
        assert_eq!(styles.result(ComparisonResult::Match).bg, Some(Color::Green));
        assert_eq!(styles.result(ComparisonResult::NoMatch).bg, Some(Color::Red));
    }

    #[test]
    fn no_color_drops_colors_but_keeps_emphasis() {
        let styles = StationStyles::with_color_config(ColorConfig::with_colors(false));

        let no_match = styles.result(ComparisonResult::NoMatch);
        assert_eq!(no_match.bg, None);
        assert_eq!(no_match.fg, None);
        assert!(no_match.add_modifier.contains(Modifier::REVERSED));

        assert_eq!(styles.severity(Severity::Success), Style::default());
        assert_eq!(styles.label(), Style::default());
    }

    #[test]
    fn severities_have_distinct_colors() {
        let styles = StationStyles::with_color_config(ColorConfig::with_colors(true));
        assert_eq!(styles.severity(Severity::Info).fg, Some(Color::Cyan));
        assert_eq!(styles.severity(Severity::Success).fg, Some(Color::Green));
        assert_eq!(styles.severity(Severity::Error).fg, Some(Color::Red));
    }

    #[test]
    fn header_tint_follows_mode() {
        let styles = StationStyles::with_color_config(ColorConfig::with_colors(true));
        assert_eq!(styles.header(Mode::CaptureReference).bg, Some(Color::Cyan));
        assert_eq!(styles.header(Mode::Compare).bg, Some(Color::Magenta));
    }
}
