//! Tracing subscriber setup.
//!
//! Logs go to `helpdesk.log` in the helpdesk home because the TUI owns the
//! terminal. Initialization failures are swallowed: a missing log file must
//! never stop the program.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::paths::log_path;

pub const LOG_ENV: &str = "HELPDESK_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

static LOG_INIT: OnceLock<()> = OnceLock::new();

/// Filter from `HELPDESK_LOG`, then `RUST_LOG`, then `warn`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

pub fn init_logging() {
    LOG_INIT.get_or_init(|| {
        // Without a subscriber tracing macros are no-ops
        let _ = init_file_logging(&log_path());
    });
}

fn init_file_logging(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(std::sync::Mutex::new(file));
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init();
    Ok(())
}
