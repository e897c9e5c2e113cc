//! Sign-in form

use iocraft::prelude::*;

use crate::tui::app::model::{LoginField, LoginState};
use crate::tui::components::TextField;
use crate::tui::theme::theme;

pub fn render_login(login: &LoginState) -> AnyElement<'static> {
    let theme = theme();
    // The field masks whatever it is given, so only the length leaves the model
    let password_shadow = "*".repeat(login.password.len());

    element! {
        View(
            flex_grow: 1.0,
            width: 100pct,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
        ) {
            View(
                width: 52,
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Round,
                border_color: theme.border_focused,
                padding_left: 2,
                padding_right: 2,
                padding_top: 1,
                padding_bottom: 1,
                gap: 1,
            ) {
                Text(content: "Sign in to continue", color: theme.text, weight: Weight::Bold)
                TextField(
                    label: "Email",
                    value: login.email.clone(),
                    has_focus: login.focus == LoginField::Email,
                    placeholder: Some("you@example.com".to_string()),
                )
                TextField(
                    label: "Password",
                    value: password_shadow,
                    has_focus: login.focus == LoginField::Password,
                    masked: true,
                )
                #(login.error.clone().map(|message| element! {
                    Text(content: message, color: theme.error)
                }))
                #(login.submitting.then(|| element! {
                    Text(content: "Signing in...", color: theme.text_dimmed)
                }))
            }
        }
    }
    .into_any()
}
