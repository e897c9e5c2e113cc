use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::str::FromStr;

use crate::commands::{
    TicketCreateOptions, cmd_config_get, cmd_config_set, cmd_config_show, cmd_diagnostics,
    cmd_login, cmd_logout, cmd_orgs_current, cmd_orgs_ls, cmd_orgs_switch, cmd_orgs_use,
    cmd_tickets_create, cmd_tickets_ls, cmd_ui, cmd_whoami,
};
use crate::types::{IssueType, VALID_ISSUE_TYPES};

#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(about = "Multi-tenant help-desk ticketing in the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output mode shared by every command
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

impl OutputOptions {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, sign out and show the current user
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// List and select organizations
    #[command(visible_alias = "org")]
    Orgs {
        #[command(subcommand)]
        action: OrgsAction,
    },

    /// List, search and create tickets in the selected organization
    #[command(visible_alias = "t")]
    Tickets {
        #[command(subcommand)]
        action: TicketsAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Report configuration, session, selection and backend reachability
    #[command(visible_alias = "doctor")]
    Diagnostics {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the interactive terminal UI
    Ui {
        /// Initial location, e.g. "/", "/diagnostics" or "/<slug>"
        #[arg(long, default_value = "/")]
        path: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    Login {
        /// Account email
        email: String,

        /// Password (read from stdin when neither this nor the env var is set)
        #[arg(long, env = "HELPDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out and forget the selected organization
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum OrgsAction {
    /// List organizations
    #[command(visible_alias = "list")]
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Select an organization by slug
    Use {
        /// Organization slug
        #[arg(value_parser = parse_slug)]
        slug: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear the selection so another organization can be chosen
    Switch {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the selected organization
    Current {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum TicketsAction {
    /// List tickets, newest first
    #[command(visible_alias = "list")]
    Ls {
        /// Match mobile no, client file no, client name or ticket no
        #[arg(short, long)]
        search: Option<String>,

        /// Status filter: open, in_progress, closed or all
        #[arg(long)]
        status: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a ticket
    #[command(visible_alias = "new")]
    Create {
        /// Client file number
        #[arg(long)]
        client_file_no: String,

        /// Client mobile number
        #[arg(long)]
        mobile_no: String,

        /// Client name
        #[arg(long)]
        name: String,

        /// Issue type: Technical, Billing, Account, Other
        #[arg(short = 't', long = "type", value_parser = parse_issue_type)]
        issue_type: IssueType,

        /// Description of the issue
        #[arg(short, long)]
        description: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Print the anon key instead of masking it
        #[arg(long)]
        reveal: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get a single value
    Get {
        /// Key in dot notation, e.g. backend.url
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a value
    Set {
        /// Key in dot notation, e.g. backend.url
        key: String,

        /// New value
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> crate::error::Result<()> {
        match self {
            Commands::Auth { action } => match action {
                AuthAction::Login {
                    email,
                    password,
                    json,
                } => cmd_login(&email, password, OutputOptions::new(json)).await,
                AuthAction::Logout { json } => cmd_logout(OutputOptions::new(json)).await,
                AuthAction::Whoami { json } => cmd_whoami(OutputOptions::new(json)),
            },

            Commands::Orgs { action } => match action {
                OrgsAction::Ls { json } => cmd_orgs_ls(OutputOptions::new(json)).await,
                OrgsAction::Use { slug, json } => {
                    cmd_orgs_use(&slug, OutputOptions::new(json)).await
                }
                OrgsAction::Switch { json } => cmd_orgs_switch(OutputOptions::new(json)),
                OrgsAction::Current { json } => cmd_orgs_current(OutputOptions::new(json)),
            },

            Commands::Tickets { action } => match action {
                TicketsAction::Ls {
                    search,
                    status,
                    json,
                } => {
                    cmd_tickets_ls(
                        search.as_deref(),
                        status.as_deref(),
                        OutputOptions::new(json),
                    )
                    .await
                }
                TicketsAction::Create {
                    client_file_no,
                    mobile_no,
                    name,
                    issue_type,
                    description,
                    json,
                } => {
                    let opts = TicketCreateOptions {
                        client_file_no,
                        mobile_no,
                        name_of_client: name,
                        issue_type,
                        description,
                    };
                    cmd_tickets_create(opts, OutputOptions::new(json)).await
                }
            },

            Commands::Config { action } => match action {
                ConfigAction::Show { reveal, json } => {
                    cmd_config_show(reveal, OutputOptions::new(json))
                }
                ConfigAction::Get { key, json } => cmd_config_get(&key, OutputOptions::new(json)),
                ConfigAction::Set { key, value, json } => {
                    cmd_config_set(&key, &value, OutputOptions::new(json))
                }
            },

            Commands::Diagnostics { json } => cmd_diagnostics(OutputOptions::new(json)).await,

            Commands::Ui { path } => cmd_ui(&path).await,

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn parse_issue_type(s: &str) -> Result<IssueType, String> {
    IssueType::from_str(s).map_err(|_| {
        format!(
            "Invalid issue type. Must be one of: {}",
            VALID_ISSUE_TYPES.join(", ")
        )
    })
}

fn parse_slug(s: &str) -> Result<String, String> {
    let slug = s.trim().trim_start_matches('/');
    if slug.is_empty() {
        return Err("slug cannot be empty".to_string());
    }
    if crate::tenant::RESERVED_SLUGS.contains(&slug) {
        return Err(format!("'{slug}' is a reserved path, not an organization"));
    }
    if !crate::tenant::is_valid_slug(slug) {
        return Err(format!(
            "invalid slug '{slug}': use letters, digits, hyphens or underscores"
        ));
    }
    Ok(slug.to_string())
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "helpdesk", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_issue_type_is_case_insensitive() {
        assert_eq!(parse_issue_type("billing").unwrap(), IssueType::Billing);
        let err = parse_issue_type("hardware").unwrap_err();
        assert!(err.contains("Technical, Billing, Account, Other"));
    }

    #[test]
    fn test_parse_slug() {
        assert_eq!(parse_slug("/acme").unwrap(), "acme");
        assert!(parse_slug("").is_err());
        assert!(parse_slug("Not A Slug").is_err());
    }

    #[test]
    fn test_tickets_create_requires_all_fields() {
        let result = Cli::try_parse_from(["helpdesk", "tickets", "create", "--name", "Jane"]);
        assert!(result.is_err());
    }
}
