use crate::modal::DialogKind;
use ratatui::style::{Color, Modifier, Style};

/// Application theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary colors
    pub primary: Color,
    pub accent: Color,

    /// Text colors
    pub text: Color,
    pub text_dim: Color,
    pub text_bright: Color,

    /// Background colors
    pub background: Color,
    pub background_alt: Color,
    pub backdrop: Color,

    /// Border colors
    pub border: Color,
    pub border_focused: Color,

    /// Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(37, 99, 235),     // Blue-600
            accent: Color::Rgb(217, 119, 6),      // Amber-600

            text: Color::Rgb(248, 250, 252),      // Slate-50
            text_dim: Color::Rgb(148, 163, 184),  // Slate-400
            text_bright: Color::Rgb(255, 255, 255),

            background: Color::Rgb(15, 23, 42),   // Slate-900
            background_alt: Color::Rgb(30, 41, 59), // Slate-800
            backdrop: Color::Rgb(2, 6, 23),       // Slate-950

            border: Color::Rgb(71, 85, 105),      // Slate-600
            border_focused: Color::Rgb(37, 99, 235),

            success: Color::Rgb(34, 197, 94),     // Green-500
            warning: Color::Rgb(245, 158, 11),    // Amber-500
            error: Color::Rgb(239, 68, 68),       // Red-500
            info: Color::Rgb(59, 130, 246),       // Blue-500

            selection: Color::Rgb(30, 58, 138),   // Blue-900
        }
    }

    /// Accent color of a dialog kind. Confirms share the warning palette.
    pub fn kind_color(&self, kind: DialogKind) -> Color {
        match kind {
            DialogKind::Success => self.success,
            DialogKind::Error => self.error,
            DialogKind::Warning | DialogKind::Confirm => self.warning,
            DialogKind::Info => self.info,
        }
    }

    /// Base style for normal elements
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style laid over the page behind a modal dialog
    pub fn backdrop_style(&self) -> Style {
        Style::default()
            .bg(self.backdrop)
            .fg(self.text_dim)
            .add_modifier(Modifier::DIM)
    }

    pub fn panel_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background_alt)
    }

    pub fn button_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .bg(self.primary)
                .fg(self.text_bright)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(self.background_alt).fg(self.text)
        }
    }

    /// Style for selected items
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.text_bright)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background_alt)
    }

    pub fn help_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }
}
