//! Terminal UI for the help desk
//!
//! The app routes between the login form, the organization picker, the
//! tenant dashboard and diagnostics using the same resolver as the CLI.

pub mod app;
pub mod components;
pub mod screens;
pub mod search;
pub mod theme;

use std::sync::Arc;

use iocraft::prelude::*;

use crate::context::AppContext;
use crate::error::{HelpdeskError, Result};

pub use app::{HelpdeskApp, HelpdeskAppProps};
pub use theme::Theme;

/// Run the full-screen app starting at `path` until the user quits.
pub async fn run_app(ctx: Arc<AppContext>, path: &str) -> Result<()> {
    tracing::info!(path, "starting interactive ui");
    element!(HelpdeskApp(context: Some(ctx), initial_path: path.to_string()))
        .fullscreen()
        .await
        .map_err(|e| HelpdeskError::Other(format!("TUI error: {}", e)))
}
