//! Key hint bar along the bottom edge

use iocraft::prelude::*;

use super::shortcuts::Shortcut;
use crate::tui::theme::theme;

#[derive(Default, Props)]
pub struct FooterProps {
    pub shortcuts: Vec<Shortcut>,
}

/// Renders `[key] label` pairs, wrapping onto a second row on narrow terminals.
#[component]
pub fn Footer(props: &FooterProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let hints = props.shortcuts.iter().map(|hint| {
        element! {
            View(flex_direction: FlexDirection::Row, flex_shrink: 0.0) {
                Text(content: format!("[{}]", hint.key), color: theme.highlight, weight: Weight::Bold)
                Text(content: format!(" {}", hint.label), color: theme.text)
            }
        }
    });

    element! {
        View(
            width: 100pct,
            min_height: 1,
            flex_shrink: 0.0,
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::Wrap,
            column_gap: 2,
            padding_left: 1,
            padding_right: 1,
            background_color: theme.border,
        ) {
            #(hints)
        }
    }
}
