mod auth;
mod config;
mod diagnostics;
mod orgs;
mod tickets;
mod ui;

pub use auth::{cmd_login, cmd_logout, cmd_whoami};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use diagnostics::cmd_diagnostics;
pub use orgs::{cmd_orgs_current, cmd_orgs_ls, cmd_orgs_switch, cmd_orgs_use};
pub use tickets::{TicketCreateOptions, cmd_tickets_create, cmd_tickets_ls};
pub use ui::cmd_ui;

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::cli::OutputOptions;
use crate::config::Config;
use crate::context::AppContext;
use crate::error::Result;
use crate::types::{Ticket, TicketStatus};

/// A command result with a JSON form and an optional human form.
///
/// Without text, human output falls back to pretty-printed JSON.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        if output.json || self.text.is_none() {
            println!("{}", serde_json::to_string_pretty(&self.json)?);
        } else if let Some(text) = self.text {
            println!("{text}");
        }
        Ok(())
    }
}

/// Load config and build the context every backend-facing command uses.
pub(crate) fn open_context() -> Result<AppContext> {
    let config = Config::load()?;
    AppContext::from_config(config)
}

pub(crate) fn colored_status(status: TicketStatus) -> String {
    match status {
        TicketStatus::Open => status.label().yellow().to_string(),
        TicketStatus::InProgress => status.label().cyan().to_string(),
        TicketStatus::Closed => status.label().dimmed().to_string(),
    }
}

/// Single-line summary used after creating a ticket
pub(crate) fn format_ticket_line(ticket: &Ticket) -> String {
    format!(
        "{} [{}] {} - {}",
        ticket.ticket_no.cyan(),
        colored_status(ticket.status),
        ticket.name_of_client,
        ticket.description
    )
}
