//! Configuration commands.
//!
//! - `config show`: Display the configuration file's contents
//! - `config get`: Print one value
//! - `config set`: Validate and store one value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{CONFIG_KEYS, Config};
use crate::error::Result;
use crate::paths::config_path;

fn display_value(value: &str) -> String {
    if value.is_empty() {
        "not set".dimmed().to_string()
    } else {
        value.to_string()
    }
}

pub fn cmd_config_show(reveal: bool, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;

    let mut values = serde_json::Map::new();
    let mut text = format!("{}\n\n", "Configuration:".cyan().bold());
    for key in CONFIG_KEYS {
        let value = match (*key, reveal) {
            ("backend.anon_key", true) => config.backend.anon_key.clone().unwrap_or_default(),
            _ => config.get(key)?,
        };
        text.push_str(&format!("  {}: {}\n", key.cyan(), display_value(&value)));
        values.insert((*key).to_string(), json!(value));
    }
    text.push('\n');
    text.push_str(&format!("Config file: {}", config_path().display()).dimmed().to_string());

    CommandOutput::new(json!({
        "values": values,
        "config_file": config_path().to_string_lossy(),
    }))
    .with_text(text)
    .print(output)
}

pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;
    CommandOutput::new(json!({ "key": key, "value": value }))
        .with_text(value)
        .print(output)
}

pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    tracing::info!(%key, "updated configuration");

    // Echo what was stored, masked the same way `get` masks it
    let stored = config.get(key)?;
    CommandOutput::new(json!({ "key": key, "value": stored }))
        .with_text(format!("Set {} = {}", key.cyan(), stored))
        .print(output)
}
