//! Session commands.
//!
//! - `auth login`: Sign in and persist the session
//! - `auth logout`: Sign out and clear the selected organization
//! - `auth whoami`: Show the signed-in user

use std::io::{self, BufRead};

use owo_colors::OwoColorize;
use secrecy::SecretString;
use serde_json::json;

use super::{CommandOutput, open_context};
use crate::cli::OutputOptions;
use crate::error::{HelpdeskError, Result};

fn read_password_line() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(HelpdeskError::Auth(
            "password required: pass --password, set HELPDESK_PASSWORD or pipe it on stdin"
                .to_string(),
        ));
    }
    Ok(password)
}

pub async fn cmd_login(email: &str, password: Option<String>, output: OutputOptions) -> Result<()> {
    let ctx = open_context()?;
    let password = match password {
        Some(p) => p,
        None => read_password_line()?,
    };
    let user = ctx.sign_in(email, SecretString::from(password)).await?;

    if !ctx.sessions().is_persistent() {
        tracing::warn!("session.persist is off; the session ends with this process");
    }

    CommandOutput::new(json!({
        "email": user.email,
        "id": user.id,
        "persisted": ctx.sessions().is_persistent(),
    }))
    .with_text(format!("Signed in as {}", user.email.green()))
    .print(output)
}

pub async fn cmd_logout(output: OutputOptions) -> Result<()> {
    let ctx = open_context()?;
    let was_signed_in = ctx.user().is_some();
    ctx.sign_out().await?;

    let text = if was_signed_in {
        "Signed out".to_string()
    } else {
        "Not signed in".dimmed().to_string()
    };
    CommandOutput::new(json!({ "signed_out": was_signed_in }))
        .with_text(text)
        .print(output)
}

pub fn cmd_whoami(output: OutputOptions) -> Result<()> {
    let ctx = open_context()?;
    let user = ctx.require_user()?;
    CommandOutput::new(json!({ "email": user.email, "id": user.id }))
        .with_text(user.email)
        .print(output)
}
