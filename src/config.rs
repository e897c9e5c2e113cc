//! Top-level application configuration.
//!
//! Configuration is stored in `config.yaml` under the helpdesk home and includes:
//! - Backend kind, base URL and public API key
//! - Session persistence
//! - Search debounce
//! - Diagnostics access policy

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{HelpdeskError, Result};
use crate::paths::config_path;

/// Keys accepted by `config get` / `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "backend.kind",
    "backend.url",
    "backend.anon_key",
    "backend.request_timeout_secs",
    "session.persist",
    "search.debounce_ms",
    "diagnostics.bypass_auth",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Which backend implementation serves directory, ticket and auth calls
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// PostgREST + auth endpoints over HTTP
    #[default]
    Rest,
    /// Seeded in-process backend snapshotted to disk
    Local,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Rest => write!(f, "rest"),
            BackendKind::Local => write!(f, "local"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" => Ok(BackendKind::Rest),
            "local" => Ok(BackendKind::Local),
            other => Err(HelpdeskError::InvalidValue {
                field: "backend.kind",
                message: format!("'{other}' (expected rest or local)"),
            }),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: None,
            anon_key: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("kind", &self.kind)
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Keep the signed-in session across process restarts (default: true)
    #[serde(default = "default_true")]
    pub persist: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { persist: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Delay before a ticket search is issued, in milliseconds (0 disables)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    250
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsConfig {
    /// Allow the diagnostics view without signing in (default: true)
    #[serde(default = "default_true")]
    pub bypass_auth: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { bypass_auth: true }
    }
}

fn default_true() -> bool {
    true
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(HelpdeskError::InvalidValue {
            field,
            message: format!("'{other}' is not a boolean"),
        }),
    }
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| HelpdeskError::InvalidValue {
            field,
            message: format!("'{value}': {e}"),
        })
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            HelpdeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                HelpdeskError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            HelpdeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // The file may hold the anon key
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Backend kind, honoring `HELPDESK_BACKEND`
    pub fn backend_kind(&self) -> Result<BackendKind> {
        match non_empty_env("HELPDESK_BACKEND") {
            Some(kind) => kind.parse(),
            None => Ok(self.backend.kind),
        }
    }

    /// Backend base URL, honoring `HELPDESK_BACKEND_URL`
    pub fn backend_url(&self) -> Result<Url> {
        let raw = non_empty_env("HELPDESK_BACKEND_URL")
            .or_else(|| self.backend.url.clone())
            .ok_or_else(|| {
                HelpdeskError::Config(
                    "backend URL not configured. Set HELPDESK_BACKEND_URL or run: helpdesk config set backend.url <url>".to_string(),
                )
            })?;

        let url = Url::parse(&raw).map_err(|e| HelpdeskError::InvalidValue {
            field: "backend.url",
            message: format!("'{raw}': {e}"),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HelpdeskError::InvalidValue {
                field: "backend.url",
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(url)
    }

    /// Public API key, honoring `HELPDESK_ANON_KEY`
    pub fn anon_key(&self) -> Option<SecretString> {
        non_empty_env("HELPDESK_ANON_KEY")
            .or_else(|| self.backend.anon_key.clone())
            .map(SecretString::from)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// Read a single value by dotted key. The anon key is never returned in clear.
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "backend.kind" => self.backend.kind.to_string(),
            "backend.url" => self.backend.url.clone().unwrap_or_default(),
            "backend.anon_key" => self
                .backend
                .anon_key
                .as_deref()
                .map(mask_secret)
                .unwrap_or_default(),
            "backend.request_timeout_secs" => self.backend.request_timeout_secs.to_string(),
            "session.persist" => self.session.persist.to_string(),
            "search.debounce_ms" => self.search.debounce_ms.to_string(),
            "diagnostics.bypass_auth" => self.diagnostics.bypass_auth.to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a single value by dotted key, validating it first.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "backend.kind" => self.backend.kind = value.parse()?,
            "backend.url" => {
                let url = Url::parse(value.trim()).map_err(|e| HelpdeskError::InvalidValue {
                    field: "backend.url",
                    message: format!("'{value}': {e}"),
                })?;
                self.backend.url = Some(url.to_string());
            }
            "backend.anon_key" => {
                let key = value.trim();
                self.backend.anon_key = (!key.is_empty()).then(|| key.to_string());
            }
            "backend.request_timeout_secs" => {
                let secs = parse_u64("backend.request_timeout_secs", value)?;
                if secs == 0 {
                    return Err(HelpdeskError::InvalidValue {
                        field: "backend.request_timeout_secs",
                        message: "must be greater than zero".to_string(),
                    });
                }
                self.backend.request_timeout_secs = secs;
            }
            "session.persist" => self.session.persist = parse_bool("session.persist", value)?,
            "search.debounce_ms" => {
                self.search.debounce_ms = parse_u64("search.debounce_ms", value)?
            }
            "diagnostics.bypass_auth" => {
                self.diagnostics.bypass_auth = parse_bool("diagnostics.bypass_auth", value)?
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> HelpdeskError {
    HelpdeskError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
pub fn mask_secret(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 8 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}
