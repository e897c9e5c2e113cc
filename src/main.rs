use clap::Parser;
use owo_colors::OwoColorize;
use std::process::ExitCode;

use helpdesk::cli::Cli;
use helpdesk::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match cli.command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("{}", format!("Error: {e}").red());
            ExitCode::FAILURE
        }
    }
}
