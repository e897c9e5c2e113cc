//! Signed-in session state.
//!
//! Tokens are held as secrets and only exposed when building request headers
//! or writing the persisted copy. Persistence is optional: with no backing
//! store the session lives as long as the process.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::types::User;

pub const SESSION_KEY: &str = "session";

pub struct Session {
    pub user: User,
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    pub expires_at: Option<Timestamp>,
}

impl Session {
    pub fn new(
        user: User,
        access_token: SecretString,
        refresh_token: Option<SecretString>,
        expires_at: Option<Timestamp>,
    ) -> Self {
        Self {
            user,
            access_token,
            refresh_token,
            expires_at,
        }
    }

    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// On-disk shape of a persisted session
#[derive(Serialize, Deserialize)]
struct PersistedSession {
    user: User,
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<Timestamp>,
}

impl From<&Session> for PersistedSession {
    fn from(session: &Session) -> Self {
        Self {
            user: session.user.clone(),
            access_token: session.access_token.expose_secret().to_string(),
            refresh_token: session
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            expires_at: session.expires_at,
        }
    }
}

impl From<PersistedSession> for Session {
    fn from(p: PersistedSession) -> Self {
        Session::new(
            p.user,
            SecretString::from(p.access_token),
            p.refresh_token.map(SecretString::from),
            p.expires_at,
        )
    }
}

pub struct SessionStore {
    current: RwLock<Option<Arc<Session>>>,
    storage: Option<Arc<dyn KeyValueStore>>,
}

impl SessionStore {
    /// A session that is never written anywhere.
    pub fn in_memory() -> Self {
        Self {
            current: RwLock::new(None),
            storage: None,
        }
    }

    /// A session persisted to `storage`, restored immediately if present.
    ///
    /// Unreadable or expired persisted sessions are discarded.
    pub fn persistent(storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let restored = match storage.get(SESSION_KEY)? {
            Some(raw) => match serde_json::from_str::<PersistedSession>(&raw) {
                Ok(persisted) => {
                    let session = Session::from(persisted);
                    if session.is_expired(Timestamp::now()) {
                        tracing::info!(email = %session.user.email, "persisted session expired");
                        storage.remove(SESSION_KEY)?;
                        None
                    } else {
                        Some(Arc::new(session))
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable persisted session");
                    storage.remove(SESSION_KEY)?;
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            current: RwLock::new(restored),
            storage: Some(storage),
        })
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.current.read().as_ref().map(|s| s.user.clone())
    }

    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    pub fn set(&self, session: Session) -> Result<()> {
        if let Some(storage) = &self.storage {
            let json = serde_json::to_string(&PersistedSession::from(&session))?;
            storage.set(SESSION_KEY, &json)?;
        }
        tracing::info!(email = %session.user.email, "session started");
        *self.current.write() = Some(Arc::new(session));
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        *self.current.write() = None;
        if let Some(storage) = &self.storage {
            storage.remove(SESSION_KEY)?;
        }
        Ok(())
    }
}
