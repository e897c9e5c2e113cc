//! App header bar component
//!
//! Displays the title, the active tenant and an optional ticket count. The bar
//! takes the tenant's primary color when one is selected.

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Props for the Header component
#[derive(Default, Props)]
pub struct HeaderProps {
    /// Title (defaults to "Helpdesk")
    pub title: Option<String>,

    /// Subtitle, usually the screen or tenant name
    pub subtitle: Option<String>,

    /// Ticket count
    pub ticket_count: Option<usize>,

    /// Signed-in user shown on the right
    pub user: Option<String>,

    /// Bar color, defaults to the theme highlight
    pub background: Option<Color>,
}

/// App header bar showing title and ticket count
#[component]
pub fn Header(props: &HeaderProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    let title = props.title.clone().unwrap_or_else(|| "Helpdesk".to_string());
    let left_text = match &props.subtitle {
        Some(sub) => format!("{} - {}", title, sub),
        None => title,
    };

    element! {
        View(
            width: 100pct,
            height: 1,
            flex_direction: FlexDirection::Row,
            flex_shrink: 0.0,
            justify_content: JustifyContent::SpaceBetween,
            padding_left: 1,
            padding_right: 1,
            background_color: props.background.unwrap_or(theme.highlight),
        ) {
            Text(
                content: left_text,
                color: theme.text,
                weight: Weight::Bold,
            )
            View(flex_direction: FlexDirection::Row, gap: 2) {
                #(props.ticket_count.map(|count| element! {
                    Text(
                        content: format!("{} tickets", count),
                        color: theme.text,
                    )
                }))
                #(props.user.clone().map(|user| element! {
                    Text(content: user, color: theme.text)
                }))
            }
        }
    }
}
