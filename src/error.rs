use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelpdeskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("no organization selected")]
    NoTenantSelected,

    #[error("organization '{0}' not found")]
    OrganizationNotFound(String),

    #[error("invalid {field}: {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited by backend, retry after {0}s")]
    RateLimited(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Other(String),
}

impl HelpdeskError {
    /// Whether the failed operation may succeed if attempted again.
    pub fn is_transient(&self) -> bool {
        match self {
            HelpdeskError::Api { status, .. } => *status >= 500,
            HelpdeskError::RateLimited(_) => true,
            HelpdeskError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Message suitable for a toast or inline form error.
    ///
    /// Backend errors carry the server-provided text without the status prefix.
    pub fn user_message(&self) -> String {
        match self {
            HelpdeskError::Api { message, .. } => message.clone(),
            HelpdeskError::Auth(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HelpdeskError>;
