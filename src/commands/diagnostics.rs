use owo_colors::OwoColorize;

use super::{CommandOutput, open_context};
use crate::cli::OutputOptions;
use crate::diagnostics::{CheckStatus, DiagnosticsReport};
use crate::error::{HelpdeskError, Result};

/// Print the diagnostics report; exits non-zero when a check fails.
///
/// Follows the same auth policy as the `/diagnostics` route.
pub async fn cmd_diagnostics(output: OutputOptions) -> Result<()> {
    let ctx = open_context()?;
    if !ctx.policy().diagnostics_bypass_auth {
        ctx.require_user()?;
    }
    let report = DiagnosticsReport::collect(&ctx).await;

    let mut text = format!("{}\n\n", "Diagnostics:".cyan().bold());
    for check in &report.checks {
        let symbol = match check.status {
            CheckStatus::Ok => check.status.symbol().green().to_string(),
            CheckStatus::Warn => check.status.symbol().yellow().to_string(),
            CheckStatus::Fail => check.status.symbol().red().to_string(),
        };
        text.push_str(&format!("  {symbol} {:<14} {}\n", check.name, check.detail));
    }

    let healthy = report.is_healthy();
    CommandOutput::new(serde_json::to_value(&report)?)
        .with_text(text.trim_end().to_string())
        .print(output)?;

    if healthy {
        Ok(())
    } else {
        Err(HelpdeskError::Other("one or more checks failed".to_string()))
    }
}
