use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, open_context};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::types::Organization;

#[derive(Tabled)]
struct OrgRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Primary")]
    primary: String,
}

/// List organizations, marking the selected one
pub async fn cmd_orgs_ls(output: OutputOptions) -> Result<()> {
    let ctx = open_context()?;
    ctx.require_user()?;
    let orgs = ctx.directory().list_organizations().await?;
    let selected = ctx.selection().load()?.map(|o| o.id);

    if orgs.is_empty() {
        return CommandOutput::new(json!([]))
            .with_text("No organizations found".dimmed().to_string())
            .print(output);
    }

    let rows: Vec<OrgRow> = orgs
        .iter()
        .map(|org| OrgRow {
            marker: if selected.as_deref() == Some(org.id.as_str()) {
                "*"
            } else {
                ""
            },
            slug: org.slug.clone(),
            name: org.name.clone(),
            primary: org.theme().primary.to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());

    CommandOutput::new(serde_json::to_value(&orgs)?)
        .with_text(table.to_string())
        .print(output)
}

pub async fn cmd_orgs_use(slug: &str, output: OutputOptions) -> Result<()> {
    let ctx = open_context()?;
    ctx.require_user()?;
    let org = ctx.select_by_slug(slug).await?;
    CommandOutput::new(org_json(&org))
        .with_text(format!(
            "Selected {} ({})",
            org.name.green(),
            org.path().dimmed()
        ))
        .print(output)
}

/// Clear the selection, returning to organization choice
pub fn cmd_orgs_switch(output: OutputOptions) -> Result<()> {
    let ctx = open_context()?;
    let location = ctx.change_organization()?;
    CommandOutput::new(json!({ "selected": null, "location": location }))
        .with_text("Organization selection cleared. Choose one with `helpdesk orgs use <slug>`")
        .print(output)
}

pub fn cmd_orgs_current(output: OutputOptions) -> Result<()> {
    let ctx = open_context()?;
    let org = ctx.require_selection()?;
    CommandOutput::new(org_json(&org))
        .with_text(format!("{} ({})", org.name, org.slug.cyan()))
        .print(output)
}

fn org_json(org: &Organization) -> serde_json::Value {
    json!({
        "id": org.id,
        "name": org.name,
        "slug": org.slug,
        "path": org.path(),
    })
}
