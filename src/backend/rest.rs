//! PostgREST + auth server backend.
//!
//! # Security Note - Logging
//!
//! The anon key and the session access token are sent on every request. They
//! are wrapped in `RedactedHeader` and the resulting header values are marked
//! sensitive, so neither shows up if request logging is turned on:
//!
//! ```bash
//! # Do NOT enable reqwest logging in production
//! # HELPDESK_LOG=reqwest=debug  <-- AVOID IN PRODUCTION
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::postgrest::{
    QueryParams, organization_by_slug_params, organizations_params, ticket_list_params,
};
use super::retry::{RetryPolicy, execute_with_retry};
use super::{AuthBackend, CreateTicketRequest, OrganizationDirectory, TicketBackend};
use crate::config::Config;
use crate::error::{HelpdeskError, Result};
use crate::search::TicketQuery;
use crate::session::{Session, SessionStore};
use crate::types::{Organization, Ticket, User};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    fn bearer(token: &str) -> Self {
        Self::new(&format!("Bearer {token}"))
    }

    fn as_header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.value)
            .map_err(|_| HelpdeskError::Auth("credential contains invalid characters".to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Error body shapes returned by PostgREST and the auth server
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Turn a non-success response into a typed error.
async fn error_from_response(response: Response) -> HelpdeskError {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(60);
        return HelpdeskError::RateLimited(retry_after);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        });
    HelpdeskError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Token grant response from the auth server
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| Timestamp::from_second(secs).ok())
            .or_else(|| {
                self.expires_in.and_then(|secs| {
                    Timestamp::now()
                        .checked_add(jiff::SignedDuration::from_secs(secs))
                        .ok()
                })
            });
        Session::new(
            User {
                id: self.user.id,
                email: self.user.email.unwrap_or_else(|| fallback_email.to_string()),
            },
            SecretString::from(self.access_token),
            self.refresh_token.map(SecretString::from),
            expires_at,
        )
    }
}

pub struct RestBackend {
    client: Client,
    base: Url,
    anon_key: SecretString,
    sessions: Arc<SessionStore>,
    retry: RetryPolicy,
}

impl RestBackend {
    /// Create a backend from configuration.
    ///
    /// Uses the configured request timeout and a 10s connect timeout.
    pub fn from_config(config: &Config, sessions: Arc<SessionStore>) -> Result<Self> {
        let base = config.backend_url()?;
        let anon_key = config.anon_key().ok_or_else(|| {
            HelpdeskError::Auth(
                "anon key not configured. Set HELPDESK_ANON_KEY or run: helpdesk config set backend.anon_key <key>".to_string(),
            )
        })?;
        Self::new(base, anon_key, config.request_timeout(), sessions)
    }

    pub fn new(
        mut base: Url,
        anon_key: SecretString,
        timeout: Duration,
        sessions: Arc<SessionStore>,
    ) -> Result<Self> {
        // Url::join replaces the last segment unless the base ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base,
            anon_key,
            sessions,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| HelpdeskError::Config(format!("invalid endpoint '{path}': {e}")))
    }

    /// `apikey` plus a bearer token: the session's access token when signed
    /// in, otherwise the anon key.
    fn auth_headers(&self, session: Option<&Session>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let api_key = RedactedHeader::new(self.anon_key.expose_secret());
        headers.insert("apikey", api_key.as_header_value()?);

        let token = match session {
            Some(session) => session.access_token().expose_secret(),
            None => self.anon_key.expose_secret(),
        };
        headers.insert(
            header::AUTHORIZATION,
            RedactedHeader::bearer(token).as_header_value()?,
        );
        Ok(headers)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: QueryParams) -> Result<T> {
        let url = self.endpoint(path)?;
        let current = self.sessions.current();
        let session = current.as_deref();
        let (url, params) = (&url, &params);

        let response = execute_with_retry(self.retry, || async move {
            let response = self
                .client
                .get(url.clone())
                .headers(self.auth_headers(session)?)
                .header(header::ACCEPT, "application/json")
                .query(params)
                .send()
                .await?;
            if response.status().is_success() {
                Ok(response)
            } else {
                Err(error_from_response(response).await)
            }
        })
        .await?;

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl OrganizationDirectory for RestBackend {
    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        let orgs: Vec<Organization> = self
            .get_json("rest/v1/organizations", organizations_params())
            .await?;
        tracing::debug!(count = orgs.len(), "listed organizations");
        Ok(orgs)
    }

    async fn organization_by_slug(&self, slug: &str) -> Result<Organization> {
        let mut orgs: Vec<Organization> = self
            .get_json("rest/v1/organizations", organization_by_slug_params(slug))
            .await?;
        if orgs.len() > 1 {
            tracing::warn!(slug, count = orgs.len(), "slug matched several organizations");
        }
        if orgs.is_empty() {
            return Err(HelpdeskError::OrganizationNotFound(slug.to_string()));
        }
        Ok(orgs.swap_remove(0))
    }
}

#[async_trait]
impl TicketBackend for RestBackend {
    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>> {
        let tickets: Vec<Ticket> = self
            .get_json("rest/v1/tickets", ticket_list_params(query))
            .await?;
        tracing::debug!(
            organization_id = %query.organization_id,
            count = tickets.len(),
            "listed tickets"
        );
        Ok(tickets)
    }

    async fn create_ticket(&self, request: &CreateTicketRequest) -> Result<Ticket> {
        let url = self.endpoint("rest/v1/rpc/create_ticket")?;
        let session = self.sessions.current();

        // A retry could create the ticket twice, so this goes out exactly once
        let response = self
            .client
            .post(url)
            .headers(self.auth_headers(session.as_deref())?)
            .header(header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        // The procedure may return the row itself or a one-row set
        let value: serde_json::Value = response.json().await?;
        let row = match value {
            serde_json::Value::Array(mut rows) if !rows.is_empty() => rows.swap_remove(0),
            serde_json::Value::Array(_) => {
                return Err(HelpdeskError::Api {
                    status: 200,
                    message: "create_ticket returned no rows".to_string(),
                });
            }
            other => other,
        };
        let ticket: Ticket = serde_json::from_value(row)?;
        tracing::info!(ticket_no = %ticket.ticket_no, "created ticket");
        Ok(ticket)
    }
}

#[async_trait]
impl AuthBackend for RestBackend {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let response = self
            .client
            .post(url)
            .headers(self.auth_headers(None)?)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(match error_from_response(response).await {
                HelpdeskError::Api { message, .. } => HelpdeskError::Auth(message),
                other => other,
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.into_session(email))
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        let url = self.endpoint("auth/v1/logout")?;
        let response = self
            .client
            .post(url)
            .headers(self.auth_headers(Some(session))?)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}
