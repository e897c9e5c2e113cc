//! Ticket detail pane component

use iocraft::prelude::*;

use crate::tui::theme::theme;
use crate::types::Ticket;

const DETAIL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

#[derive(Default, Props)]
pub struct TicketDetailProps {
    /// The ticket to display (None shows empty state)
    pub ticket: Option<Ticket>,
}

fn field_row(label: &'static str, value: String, color: Color) -> AnyElement<'static> {
    let theme = theme();
    element! {
        View(flex_direction: FlexDirection::Row, height: 1) {
            View(width: 14, flex_shrink: 0.0) {
                Text(content: label, color: theme.text_dimmed)
            }
            Text(content: value, color: color, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}

#[component]
pub fn TicketDetail(props: &TicketDetailProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    let Some(ticket) = props.ticket.clone() else {
        return element! {
            View(
                width: 100pct,
                height: 100pct,
                border_style: BorderStyle::Round,
                border_color: theme.border,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
            ) {
                Text(content: "No ticket selected", color: theme.text_dimmed)
            }
        };
    };

    let dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    let rows = vec![
        field_row("Status", ticket.status.label().to_string(), theme.status_color(ticket.status)),
        field_row("Issue type", ticket.issue_type.to_string(), theme.text),
        field_row("Client", ticket.name_of_client.clone(), theme.text),
        field_row("File no", ticket.client_file_no.clone(), theme.text),
        field_row("Mobile no", ticket.mobile_no.clone(), theme.text),
        field_row(
            "Created",
            ticket.created_on.strftime(DETAIL_DATE_FORMAT).to_string(),
            theme.text,
        ),
        field_row("Opened by", dash(ticket.opened_by.clone()), theme.text),
        field_row("Assignee", dash(ticket.assignee.clone()), theme.text),
    ];

    element! {
        View(
            width: 100pct,
            height: 100pct,
            border_style: BorderStyle::Round,
            border_color: theme.border,
            flex_direction: FlexDirection::Column,
            overflow: Overflow::Hidden,
        ) {
            View(
                width: 100pct,
                padding_left: 1,
                padding_right: 1,
                border_edges: Edges::Bottom,
                border_style: BorderStyle::Single,
                border_color: theme.border,
            ) {
                Text(content: ticket.ticket_no.clone(), color: theme.id_color, weight: Weight::Bold)
            }
            View(flex_direction: FlexDirection::Column, padding_left: 1, padding_right: 1) {
                #(rows)
            }
            View(
                flex_grow: 1.0,
                padding: 1,
                border_edges: Edges::Top,
                border_style: BorderStyle::Single,
                border_color: theme.border,
            ) {
                Text(content: ticket.description.clone(), color: theme.text)
            }
        }
    }
}
