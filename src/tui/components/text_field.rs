//! Labeled single-line field.
//!
//! Input is owned by the app model, so the field only renders a value with a
//! cursor marker when focused.

use iocraft::prelude::*;

use crate::tui::theme::theme;

const CURSOR: &str = "▏";

#[derive(Default, Props)]
pub struct TextFieldProps {
    pub label: String,
    pub value: String,
    pub has_focus: bool,
    /// Render the value as bullets
    pub masked: bool,
    /// Inline validation message below the field
    pub error: Option<String>,
    /// Shown dimmed when the value is empty and the field is not focused
    pub placeholder: Option<String>,
}

/// What a field displays for `value`, before styling.
pub fn display_value(value: &str, masked: bool, has_focus: bool) -> String {
    let mut shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    if has_focus {
        shown.push_str(CURSOR);
    }
    shown
}

#[component]
pub fn TextField(props: &TextFieldProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let border_color = if props.error.is_some() {
        theme.error
    } else if props.has_focus {
        theme.border_focused
    } else {
        theme.border
    };

    let (content, color) = match (&props.placeholder, props.value.is_empty() && !props.has_focus) {
        (Some(placeholder), true) => (placeholder.clone(), theme.text_dimmed),
        _ => (
            display_value(&props.value, props.masked, props.has_focus),
            theme.text,
        ),
    };

    element! {
        View(flex_direction: FlexDirection::Column, width: 100pct, flex_shrink: 0.0) {
            Text(
                content: props.label.clone(),
                color: if props.has_focus { theme.border_focused } else { theme.text_dimmed },
                weight: Weight::Bold,
            )
            View(
                width: 100pct,
                height: 3,
                border_style: BorderStyle::Round,
                border_color: border_color,
                padding_left: 1,
                padding_right: 1,
            ) {
                Text(content: content, color: color, wrap: TextWrap::NoWrap)
            }
            #(props.error.clone().map(|message| element! {
                Text(content: message, color: theme.error)
            }))
        }
    }
}
