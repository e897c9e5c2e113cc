//! Tenant dashboard: search bar, ticket list and detail pane

use iocraft::prelude::*;

use crate::tui::app::model::DashboardState;
use crate::tui::components::{TicketDetail, TicketList};
use crate::tui::components::text_field::display_value;
use crate::tui::theme::{TenantPalette, theme};

fn status_filter_label(dash: &DashboardState) -> String {
    match dash.status {
        Some(status) => format!("Status: {}", status.label()),
        None => "Status: All".to_string(),
    }
}

pub fn render_dashboard(dash: &DashboardState, list_height: usize) -> AnyElement<'static> {
    let theme = theme();
    let palette = TenantPalette::from(dash.theme);
    let list_focused = !dash.search_focused && !dash.modal.is_open();

    let search_text = if dash.search.is_empty() && !dash.search_focused {
        "/ to search by mobile, file no, client or ticket no".to_string()
    } else {
        display_value(&dash.search, false, dash.search_focused)
    };

    element! {
        View(flex_grow: 1.0, width: 100pct, flex_direction: FlexDirection::Column) {
            View(
                width: 100pct,
                height: 1,
                flex_shrink: 0.0,
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                padding_left: 1,
                padding_right: 1,
            ) {
                View(flex_direction: FlexDirection::Row, overflow: Overflow::Hidden) {
                    Text(
                        content: "Search: ",
                        color: if dash.search_focused { palette.accent } else { theme.text_dimmed },
                        weight: Weight::Bold,
                    )
                    Text(
                        content: search_text,
                        color: if dash.search.is_empty() { theme.text_dimmed } else { theme.text },
                        wrap: TextWrap::NoWrap,
                    )
                }
                View(flex_direction: FlexDirection::Row, gap: 2, flex_shrink: 0.0) {
                    #(dash.loading.then(|| element! {
                        Text(content: "loading...", color: theme.text_dimmed)
                    }))
                    Text(content: status_filter_label(dash), color: palette.accent)
                }
            }
            View(flex_grow: 1.0, width: 100pct, flex_direction: FlexDirection::Row) {
                View(width: 55pct, height: 100pct) {
                    TicketList(
                        tickets: dash.tickets.clone(),
                        selected_index: dash.selected,
                        scroll_offset: dash.scroll_offset,
                        has_focus: list_focused,
                        visible_height: list_height,
                        loading: dash.loading,
                        highlight: Some(palette.accent),
                    )
                }
                View(width: 45pct, height: 100pct) {
                    TicketDetail(ticket: dash.selected_ticket().cloned())
                }
            }
        }
    }
    .into_any()
}
