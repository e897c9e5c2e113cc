//! New ticket modal

use iocraft::prelude::*;

use crate::create::{FormField, ModalForm};
use crate::tui::components::{ModalOverlay, TextField};
use crate::tui::theme::theme;
use crate::types::IssueType;

fn issue_type_selector(modal: &ModalForm) -> AnyElement<'static> {
    let theme = theme();
    let has_focus = modal.focus == FormField::IssueType;
    let error = modal.field_error(FormField::IssueType).map(str::to_string);

    element! {
        View(flex_direction: FlexDirection::Column, width: 100pct, flex_shrink: 0.0) {
            Text(
                content: FormField::IssueType.label(),
                color: if has_focus { theme.border_focused } else { theme.text_dimmed },
                weight: Weight::Bold,
            )
            View(
                flex_direction: FlexDirection::Row,
                gap: 1,
                height: 3,
                width: 100pct,
                border_style: BorderStyle::Round,
                border_color: if error.is_some() {
                    theme.error
                } else if has_focus {
                    theme.border_focused
                } else {
                    theme.border
                },
                padding_left: 1,
            ) {
                #(IssueType::ALL.iter().map(|option| {
                    let chosen = modal.form.issue_type == Some(*option);
                    element! {
                        View(
                            padding_left: 1,
                            padding_right: 1,
                            background_color: if chosen { Some(theme.highlight) } else { None },
                        ) {
                            Text(
                                content: option.to_string(),
                                color: if chosen { theme.highlight_text } else { theme.text_dimmed },
                            )
                        }
                    }
                }))
            }
            #(error.map(|message| element! {
                Text(content: message, color: theme.error)
            }))
        }
    }
    .into_any()
}

pub fn render_create_modal(modal: &ModalForm, submitting: bool, organization: &str) -> AnyElement<'static> {
    let theme = theme();

    let fields: Vec<AnyElement<'static>> = FormField::ALL
        .into_iter()
        .map(|field| match modal.form.text(field) {
            Some(value) => element! {
                TextField(
                    label: field.label(),
                    value: value.to_string(),
                    has_focus: !submitting && modal.focus == field,
                    error: modal.field_error(field).map(str::to_string),
                )
            }
            .into_any(),
            None => issue_type_selector(modal),
        })
        .collect();

    element! {
        ModalOverlay(show_backdrop: true) {
            View(
                width: 70,
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Double,
                border_color: theme.border_focused,
                background_color: theme.background,
                padding_left: 2,
                padding_right: 2,
                padding_top: 1,
                padding_bottom: 1,
            ) {
                Text(
                    content: format!("New ticket for {}", organization),
                    color: theme.text,
                    weight: Weight::Bold,
                )
                #(fields)
                #(modal.error.clone().map(|message| element! {
                    Text(content: message, color: theme.error)
                }))
                #(submitting.then(|| element! {
                    Text(content: "Submitting...", color: theme.text_dimmed)
                }))
            }
        }
    }
    .into_any()
}
