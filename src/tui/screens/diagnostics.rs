//! Diagnostics screen

use iocraft::prelude::*;

use crate::diagnostics::CheckStatus;
use crate::tui::app::model::DiagnosticsState;
use crate::tui::theme::theme;

fn status_color(status: CheckStatus) -> Color {
    match status {
        CheckStatus::Ok => Color::Green,
        CheckStatus::Warn => Color::Yellow,
        CheckStatus::Fail => Color::Red,
    }
}

pub fn render_diagnostics(state: &DiagnosticsState) -> AnyElement<'static> {
    let theme = theme();
    let checks = state
        .report
        .as_ref()
        .map(|r| r.checks.clone())
        .unwrap_or_default();

    element! {
        View(
            flex_grow: 1.0,
            width: 100pct,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: theme.border,
            padding_left: 1,
            padding_right: 1,
        ) {
            Text(content: "Diagnostics", color: theme.text, weight: Weight::Bold)
            #(state.loading.then(|| element! {
                Text(content: "Running checks...", color: theme.text_dimmed)
            }))
            #(checks.into_iter().map(|check| element! {
                View(flex_direction: FlexDirection::Row, height: 1) {
                    View(width: 3, flex_shrink: 0.0) {
                        Text(content: check.status.symbol(), color: status_color(check.status))
                    }
                    View(width: 16, flex_shrink: 0.0) {
                        Text(content: check.name, color: theme.text_dimmed)
                    }
                    Text(content: check.detail, color: theme.text, wrap: TextWrap::NoWrap)
                }
            }))
        }
    }
    .into_any()
}
