//! UI Theme Module - Consistent color palette and style helpers
//!
//! Provides a centralized theme system for the llmtop TUI with:
//! - Palette tokens (not hard-coded colors)
//! - StyleKit helpers for common states
//! - VS Code-esque dark theme defaults

use ratatui::style::{Color, Modifier, Style};

use llmtop_core::model::LogLevel;
use llmtop_core::notify::Severity;

/// Color palette tokens for the theme
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct Palette {
    /// Main background color
    pub bg: Color,
    /// Panel border color
    pub panel_border: Color,
    /// Primary text color
    pub text: Color,
    /// Dimmed text (secondary info)
    pub text_dim: Color,
    /// Muted text (tertiary info, disabled)
    pub text_muted: Color,
    /// Accent color (highlights, focus)
    pub accent: Color,
    /// Success state (healthy gauges, fresh data)
    pub success: Color,
    /// Warning state (elevated gauges, stale data)
    pub warn: Color,
    /// Error state (failing sources, error log lines)
    pub error: Color,
    /// Info state (informational)
    pub info: Color,
    /// Selection background
    pub selection_bg: Color,
    /// Selection foreground
    pub selection_fg: Color,
    /// Key hint text
    pub key_hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

#[allow(dead_code)]
impl Palette {
    /// VS Code-esque dark theme
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            panel_border: Color::Rgb(60, 60, 60),
            text: Color::Rgb(212, 212, 212),
            text_dim: Color::Rgb(150, 150, 150),
            text_muted: Color::Rgb(100, 100, 100),
            accent: Color::Rgb(79, 193, 255), // Light blue
            success: Color::Rgb(78, 201, 176),     // Teal green
            warn: Color::Rgb(220, 180, 100),       // Amber
            error: Color::Rgb(244, 135, 113),      // Coral red
            info: Color::Rgb(156, 220, 254),       // Light cyan
            selection_bg: Color::Rgb(38, 79, 120), // Dark blue
            selection_fg: Color::White,
            key_hint: Color::Rgb(206, 145, 120), // Soft orange
        }
    }

    /// High contrast theme variant
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            panel_border: Color::White,
            text: Color::White,
            text_dim: Color::Rgb(200, 200, 200),
            text_muted: Color::Rgb(150, 150, 150),
            accent: Color::Cyan,
            success: Color::Green,
            warn: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            selection_bg: Color::Blue,
            selection_fg: Color::White,
            key_hint: Color::Yellow,
        }
    }
}

/// Theme configuration
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct Theme {
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: Palette::dark(),
        }
    }
}

#[allow(dead_code)]
impl Theme {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    // ========== StyleKit Helper Functions ==========

    /// Style for a usage gauge by its percentage
    pub fn usage_style(&self, pct: f32) -> Style {
        let color = if pct < 50.0 {
            self.palette.success
        } else if pct < 80.0 {
            self.palette.warn
        } else {
            self.palette.error
        };
        Style::default().fg(color)
    }

    /// Style for a log line by its severity level
    pub fn level_style(&self, level: LogLevel) -> Style {
        let color = match level {
            LogLevel::Error => self.palette.error,
            LogLevel::Warning => self.palette.warn,
            LogLevel::Debug => self.palette.text_muted,
            LogLevel::Info => self.palette.text,
        };
        Style::default().fg(color)
    }

    /// Style for notification severity
    pub fn severity_style(&self, severity: Severity) -> Style {
        let color = match severity {
            Severity::Error => self.palette.error,
            Severity::Warning => self.palette.warn,
            Severity::Info => self.palette.info,
        };
        Style::default().fg(color)
    }

    /// Icon for notification severity
    pub fn severity_icon(&self, severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "✗",
            Severity::Warning => "!",
            Severity::Info => "•",
        }
    }

    /// Style for key hints in footer
    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.palette.key_hint)
    }

    /// Style for subtle borders
    pub fn subtle_border_style(&self) -> Style {
        Style::default().fg(self.palette.panel_border)
    }

    /// Style for focused borders
    pub fn focused_border_style(&self) -> Style {
        Style::default().fg(self.palette.accent)
    }

    /// Style for selected items
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.palette.selection_bg)
            .fg(self.palette.selection_fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for primary text
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.palette.text)
    }

    /// Style for dimmed text
    pub fn text_dim_style(&self) -> Style {
        Style::default().fg(self.palette.text_dim)
    }

    /// Style for muted text
    pub fn text_muted_style(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    /// Style for accent text
    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.palette.accent)
    }

    /// Style for bold accent text
    pub fn accent_bold_style(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for success text
    pub fn success_style(&self) -> Style {
        Style::default().fg(self.palette.success)
    }

    /// Style for warning text
    pub fn warn_style(&self) -> Style {
        Style::default().fg(self.palette.warn)
    }

    /// Style for error text
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.palette.error)
    }

    /// Style for title text
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.palette.text)
            .add_modifier(Modifier::BOLD)
    }
}

/// Global theme instance - can be made configurable later
static DEFAULT_THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

/// Get the default theme
pub fn theme() -> &'static Theme {
    DEFAULT_THEME.get_or_init(Theme::default)
}

/// Convenience re-exports for common use cases
#[allow(dead_code)]
pub mod styles {
    use super::*;

    pub fn usage(pct: f32) -> Style {
        theme().usage_style(pct)
    }

    pub fn level(level: LogLevel) -> Style {
        theme().level_style(level)
    }

    pub fn severity(severity: Severity) -> Style {
        theme().severity_style(severity)
    }

    pub fn severity_icon(severity: Severity) -> &'static str {
        theme().severity_icon(severity)
    }

    pub fn key_hint() -> Style {
        theme().key_hint_style()
    }

    pub fn border_subtle() -> Style {
        theme().subtle_border_style()
    }

    pub fn border_focused() -> Style {
        theme().focused_border_style()
    }

    pub fn selection() -> Style {
        theme().selection_style()
    }

    pub fn text() -> Style {
        theme().text_style()
    }

    pub fn text_dim() -> Style {
        theme().text_dim_style()
    }

    pub fn text_muted() -> Style {
        theme().text_muted_style()
    }

    pub fn accent() -> Style {
        theme().accent_style()
    }

    pub fn accent_bold() -> Style {
        theme().accent_bold_style()
    }

    pub fn success() -> Style {
        theme().success_style()
    }

    pub fn warn() -> Style {
        theme().warn_style()
    }

    pub fn error() -> Style {
        theme().error_style()
    }

    pub fn title() -> Style {
        theme().title_style()
    }
}
