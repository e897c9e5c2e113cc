//! Ticket commands scoped to the selected organization.
//!
//! - `tickets ls`: List with optional search text and status filter
//! - `tickets create`: Create a ticket through the backend procedure

use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, colored_status, format_ticket_line, open_context};
use crate::cli::OutputOptions;
use crate::create::{TicketForm, submit_ticket};
use crate::error::Result;
use crate::search::{TicketQuery, parse_status_filter};
use crate::types::{IssueType, Ticket};

const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "Ticket")]
    ticket_no: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "File No")]
    file_no: String,
    #[tabled(rename = "Mobile")]
    mobile: String,
    #[tabled(rename = "Type")]
    issue_type: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        Self {
            ticket_no: ticket.ticket_no.clone(),
            created: ticket.created_on.strftime(CREATED_FORMAT).to_string(),
            client: ticket.name_of_client.clone(),
            file_no: ticket.client_file_no.clone(),
            mobile: ticket.mobile_no.clone(),
            issue_type: ticket.issue_type.to_string(),
            status: colored_status(ticket.status),
        }
    }
}

pub async fn cmd_tickets_ls(
    search: Option<&str>,
    status: Option<&str>,
    output: OutputOptions,
) -> Result<()> {
    let ctx = open_context()?;
    ctx.require_user()?;
    let org = ctx.require_selection()?;

    let status = status.map(parse_status_filter).transpose()?.flatten();
    let query = TicketQuery::new(&org.id)
        .with_text(search.unwrap_or_default())
        .with_status(status);
    let tickets = ctx.tickets().list_tickets(&query).await?;

    if tickets.is_empty() {
        return CommandOutput::new(json!([]))
            .with_text(format!("No tickets found in {}", org.name).dimmed().to_string())
            .print(output);
    }

    let rows: Vec<TicketRow> = tickets.iter().map(TicketRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    let text = format!(
        "{} {}\n{}",
        org.name.bold(),
        format!("({} tickets)", tickets.len()).dimmed(),
        table
    );

    CommandOutput::new(serde_json::to_value(&tickets)?)
        .with_text(text)
        .print(output)
}

/// Options for creating a ticket
pub struct TicketCreateOptions {
    pub client_file_no: String,
    pub mobile_no: String,
    pub name_of_client: String,
    pub issue_type: IssueType,
    pub description: String,
}

pub async fn cmd_tickets_create(opts: TicketCreateOptions, output: OutputOptions) -> Result<()> {
    let ctx = open_context()?;
    let user = ctx.require_user()?;
    let org = ctx.require_selection()?;

    let form = TicketForm {
        client_file_no: opts.client_file_no,
        mobile_no: opts.mobile_no,
        name_of_client: opts.name_of_client,
        issue_type: Some(opts.issue_type),
        description: opts.description,
    };
    let ticket = submit_ticket(&form, &org, Some(&user), ctx.tickets()).await?;

    CommandOutput::new(serde_json::to_value(&ticket)?)
        .with_text(format!(
            "{}\n{}",
            crate::create::CREATED_MESSAGE.green(),
            format_ticket_line(&ticket)
        ))
        .print(output)
}
