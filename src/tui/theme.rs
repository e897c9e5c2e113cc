//! Theme system for TUI colors and styles
//!
//! Status colors match the CLI output (commands/mod.rs). Tenant colors come
//! from the selected organization and override the header and highlights.

use iocraft::prelude::Color;

use crate::types::{Rgb, TenantTheme, TicketStatus};

/// Theme configuration for TUI components
#[derive(Debug, Clone)]
pub struct Theme {
    // Status colors (consistent with existing CLI)
    pub status_open: Color,
    pub status_in_progress: Color,
    pub status_closed: Color,

    // UI colors
    pub border: Color,
    pub border_focused: Color,
    pub background: Color,
    pub text: Color,
    pub text_dimmed: Color,
    pub highlight: Color,
    pub highlight_text: Color,
    pub error: Color,
    pub id_color: Color,
}

const DIMMED: Color = Color::Rgb {
    r: 120,
    g: 120,
    b: 120,
};

impl Default for Theme {
    fn default() -> Self {
        Self {
            status_open: Color::Yellow,
            status_in_progress: Color::Cyan,
            status_closed: DIMMED,

            border: DIMMED,
            border_focused: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            text_dimmed: DIMMED,
            highlight: Color::Blue,
            highlight_text: Color::White,
            error: Color::Red,
            id_color: Color::Cyan,
        }
    }
}

impl Theme {
    /// Get the color for a ticket status
    pub fn status_color(&self, status: TicketStatus) -> Color {
        match status {
            TicketStatus::Open => self.status_open,
            TicketStatus::InProgress => self.status_in_progress,
            TicketStatus::Closed => self.status_closed,
        }
    }
}

/// Global theme instance
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

/// Get a reference to the global theme
pub fn theme() -> &'static Theme {
    &THEME
}

pub fn rgb_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Terminal colors for one tenant
#[derive(Debug, Clone, Copy)]
pub struct TenantPalette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
}

impl From<TenantTheme> for TenantPalette {
    fn from(theme: TenantTheme) -> Self {
        Self {
            primary: rgb_color(theme.primary),
            secondary: rgb_color(theme.secondary),
            accent: rgb_color(theme.accent),
        }
    }
}

impl Default for TenantPalette {
    fn default() -> Self {
        TenantTheme::default().into()
    }
}
