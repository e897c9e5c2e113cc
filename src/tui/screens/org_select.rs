//! Organization picker

use iocraft::prelude::*;

use crate::tui::app::model::OrgSelectState;
use crate::tui::components::TextField;
use crate::tui::theme::{rgb_color, theme};

pub fn render_org_select(state: &OrgSelectState, list_height: usize) -> AnyElement<'static> {
    let theme = theme();
    let visible = state.visible();
    let total = visible.len();
    let height = list_height.max(1);
    let start = state.selected.saturating_sub(height.saturating_sub(1));
    let rows: Vec<AnyElement<'static>> = visible
        .into_iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, item)| {
            let org = item.organization;
            let is_selected = i == state.selected;
            let swatch = rgb_color(org.theme().primary);
            element! {
                View(
                    height: 1,
                    width: 100pct,
                    flex_direction: FlexDirection::Row,
                    padding_left: 1,
                    background_color: if is_selected { Some(theme.highlight) } else { None },
                ) {
                    View(width: 2, flex_shrink: 0.0) {
                        Text(content: if is_selected { ">" } else { " " }, color: theme.highlight_text)
                    }
                    View(width: 2, flex_shrink: 0.0) {
                        Text(content: "■", color: swatch)
                    }
                    View(flex_grow: 1.0, overflow: Overflow::Hidden) {
                        Text(
                            content: org.name,
                            color: if is_selected { theme.highlight_text } else { theme.text },
                            wrap: TextWrap::NoWrap,
                        )
                    }
                    View(flex_shrink: 0.0, padding_right: 1) {
                        Text(content: format!("/{}", org.slug), color: theme.text_dimmed)
                    }
                }
            }
            .into_any()
        })
        .collect();

    let status_line = if state.loading {
        Some("Loading organizations...".to_string())
    } else if state.selecting {
        Some("Opening dashboard...".to_string())
    } else if total == 0 && state.banner.is_none() {
        Some("No organizations found".to_string())
    } else {
        None
    };

    element! {
        View(
            flex_grow: 1.0,
            width: 100pct,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
        ) {
            View(
                width: 64,
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Round,
                border_color: theme.border_focused,
                padding_left: 1,
                padding_right: 1,
            ) {
                Text(content: "Select an organization", color: theme.text, weight: Weight::Bold)
                TextField(
                    label: "Filter",
                    value: state.filter.clone(),
                    has_focus: true,
                )
                #(state.banner.clone().map(|banner| element! {
                    Text(content: banner, color: theme.error)
                }))
                #(status_line.map(|line| element! {
                    Text(content: line, color: theme.text_dimmed)
                }))
                View(flex_direction: FlexDirection::Column, width: 100pct) {
                    #(rows)
                }
            }
        }
    }
    .into_any()
}
