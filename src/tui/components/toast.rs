//! Toast notifications
//!
//! Transient messages shown above the footer. Each toast carries a sequence
//! number so a delayed expiry only removes the toast it was scheduled for.

use iocraft::prelude::*;

/// Severity level for toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
    Success,
}

/// A toast notification message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub seq: u64,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel, seq: u64) -> Self {
        Self {
            message: message.into(),
            level,
            seq,
        }
    }

    /// Get the color associated with this toast's level
    pub fn color(&self) -> Color {
        match self.level {
            ToastLevel::Info => Color::Cyan,
            ToastLevel::Error => Color::Red,
            ToastLevel::Success => Color::Green,
        }
    }
}

/// Render a toast notification as an optional element
pub fn render_toast(toast: Option<&Toast>) -> Option<AnyElement<'static>> {
    toast.map(|t| {
        element! {
            View(
                width: 100pct,
                height: 3,
                flex_shrink: 0.0,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                background_color: Color::Black,
                border_edges: Edges::Top,
                border_style: BorderStyle::Single,
                border_color: t.color(),
            ) {
                Text(content: t.message.clone(), color: t.color())
            }
        }
        .into_any()
    })
}
