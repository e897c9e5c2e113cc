use std::sync::Arc;

use super::open_context;
use crate::error::Result;
use crate::tui::run_app;

/// Launch the interactive UI at `path`
pub async fn cmd_ui(path: &str) -> Result<()> {
    let ctx = Arc::new(open_context()?);
    run_app(ctx, path).await
}
