//! Scrollable ticket list component
//!
//! Displays the tenant's tickets with selection highlighting and scrolling.

use iocraft::prelude::*;

use crate::tui::theme::theme;
use crate::types::{Ticket, TicketStatus};

/// Props for the TicketList component
#[derive(Default, Props)]
pub struct TicketListProps {
    pub tickets: Vec<Ticket>,
    /// Index of the currently selected ticket
    pub selected_index: usize,
    /// Current scroll offset (first visible ticket index)
    pub scroll_offset: usize,
    pub has_focus: bool,
    /// Number of visible rows, passed down because scroll state lives in the model
    pub visible_height: usize,
    /// Whether a request is in flight with nothing to show yet
    pub loading: bool,
    /// Selection highlight, usually the tenant accent color
    pub highlight: Option<Color>,
}

fn status_badge(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::Open => "open",
        TicketStatus::InProgress => "wip ",
        TicketStatus::Closed => "done",
    }
}

/// Scrollable ticket list with selection
#[component]
pub fn TicketList(props: &TicketListProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let border_color = if props.has_focus {
        theme.border_focused
    } else {
        theme.border
    };

    if props.tickets.is_empty() {
        let message = if props.loading {
            "Loading tickets..."
        } else {
            "No tickets found"
        };
        return element! {
            View(
                width: 100pct,
                height: 100pct,
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Round,
                border_color: border_color,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
            ) {
                Text(content: message, color: theme.text_dimmed)
            }
        };
    }

    let total = props.tickets.len();
    let start = props.scroll_offset.min(total.saturating_sub(1));
    let end = (start + props.visible_height.max(1)).min(total);
    let highlight = props.highlight.unwrap_or(theme.highlight);

    element! {
        View(
            width: 100pct,
            height: 100pct,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: border_color,
        ) {
            #(props.tickets[start..end].iter().enumerate().map(|(i, ticket)| {
                let is_selected = start + i == props.selected_index;
                let text_color = if is_selected { theme.highlight_text } else { theme.text };
                element! {
                    View(
                        height: 1,
                        width: 100pct,
                        flex_direction: FlexDirection::Row,
                        padding_left: 1,
                        padding_right: 1,
                        background_color: if is_selected { Some(highlight) } else { None },
                    ) {
                        View(width: 2, flex_shrink: 0.0) {
                            Text(content: if is_selected { ">" } else { " " }, color: text_color)
                        }
                        View(width: 10, flex_shrink: 0.0) {
                            Text(
                                content: ticket.ticket_no.clone(),
                                color: if is_selected { theme.highlight_text } else { theme.id_color },
                            )
                        }
                        View(width: 7, flex_shrink: 0.0) {
                            Text(
                                content: format!("[{}]", status_badge(ticket.status)),
                                color: if is_selected { theme.highlight_text } else { theme.status_color(ticket.status) },
                            )
                        }
                        View(flex_grow: 1.0, overflow: Overflow::Hidden) {
                            Text(
                                content: format!(" {}  {}", ticket.name_of_client, ticket.mobile_no),
                                color: text_color,
                                wrap: TextWrap::NoWrap,
                            )
                        }
                    }
                }
            }))
            #((end < total).then(|| element! {
                View(height: 1, padding_left: 1) {
                    Text(
                        content: format!("  {} more below", total - end),
                        color: theme.text_dimmed,
                    )
                }
            }))
        }
    }
}
