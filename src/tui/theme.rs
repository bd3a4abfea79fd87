// Theme system for the TUI
//
// Two palettes, selected by name from config. Level colours are shared by
// both so a level reads the same in the table, the chart and the filter bar.

use crate::api::LogLevel;
use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    /// Parse a theme name from config. Unknown names fall back to dark.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" => ThemeKind::Light,
            "dark" => ThemeKind::Dark,
            other => {
                tracing::warn!("Unknown theme '{}', using dark", other);
                ThemeKind::Dark
            }
        }
    }

    /// The other theme
    pub fn toggle(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "Dark",
            ThemeKind::Light => "Light",
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
        }
    }
}

/// Colours for every UI element
#[derive(Debug, Clone)]
pub struct Theme {
    pub kind: ThemeKind,
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub border_type: BorderType,
    pub highlight: Color,
    pub selection: Color,
    pub selection_fg: Color,
    pub error: Color,
    pub success: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            kind: ThemeKind::Dark,
            background: Color::Rgb(15, 23, 42),
            foreground: Color::Rgb(226, 232, 240),
            muted: Color::Rgb(100, 116, 139),
            title: Color::Rgb(96, 165, 250),
            border: Color::Rgb(51, 65, 85),
            border_type: BorderType::Rounded,
            highlight: Color::Rgb(59, 130, 246),
            selection: Color::Rgb(30, 58, 138),
            selection_fg: Color::White,
            error: Color::Rgb(248, 113, 113),
            success: Color::Rgb(34, 197, 94),
        }
    }

    pub fn light() -> Self {
        Self {
            kind: ThemeKind::Light,
            background: Color::Rgb(248, 250, 252),
            foreground: Color::Rgb(15, 23, 42),
            muted: Color::Rgb(100, 116, 139),
            title: Color::Rgb(37, 99, 235),
            border: Color::Rgb(203, 213, 225),
            border_type: BorderType::Rounded,
            highlight: Color::Rgb(37, 99, 235),
            selection: Color::Rgb(191, 219, 254),
            selection_fg: Color::Rgb(15, 23, 42),
            error: Color::Rgb(220, 38, 38),
            success: Color::Rgb(22, 163, 74),
        }
    }

    /// Colour for a record level
    pub fn level_color(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Info => Color::Rgb(59, 130, 246),
            LogLevel::Warning => Color::Rgb(245, 158, 11),
            LogLevel::Error => Color::Rgb(239, 68, 68),
            LogLevel::Critical => Color::Rgb(139, 92, 246),
            LogLevel::Debug | LogLevel::Unknown => Color::Rgb(34, 197, 94),
        }
    }

    /// Colour for a stats bucket, keyed by its level label
    pub fn bucket_color(&self, name: &str) -> Color {
        let level = match name.to_uppercase().as_str() {
            "INFO" => LogLevel::Info,
            "WARNING" => LogLevel::Warning,
            "ERROR" => LogLevel::Error,
            "CRITICAL" => LogLevel::Critical,
            "DEBUG" => LogLevel::Debug,
            _ => LogLevel::Unknown,
        };
        self.level_color(level)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
