//! Application context.
//!
//! Owns the backends and the session/selection stores. Both the CLI commands
//! and the TUI work through one of these instead of reaching for globals.

use std::sync::Arc;

use secrecy::SecretString;

use crate::backend::{
    AuthBackend, MemoryBackend, OrganizationDirectory, RestBackend, TicketBackend,
};
use crate::config::{BackendKind, Config};
use crate::error::{HelpdeskError, Result};
use crate::paths::{local_backend_path, storage_dir};
use crate::router::{Resolution, RoutePolicy, resolve};
use crate::session::SessionStore;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::tenant::SelectionStore;
use crate::types::{Organization, User};

/// Backend trait objects sharing one implementation
#[derive(Clone)]
pub struct Backends {
    pub directory: Arc<dyn OrganizationDirectory>,
    pub tickets: Arc<dyn TicketBackend>,
    pub auth: Arc<dyn AuthBackend>,
}

impl Backends {
    pub fn from_shared<B>(backend: Arc<B>) -> Self
    where
        B: OrganizationDirectory + TicketBackend + AuthBackend + 'static,
    {
        Self {
            directory: backend.clone(),
            tickets: backend.clone(),
            auth: backend,
        }
    }
}

pub struct AppContext {
    pub config: Config,
    backends: Backends,
    sessions: Arc<SessionStore>,
    selection: SelectionStore,
    storage: Arc<dyn KeyValueStore>,
    policy: RoutePolicy,
}

impl AppContext {
    /// Build the context described by `config` on top of the helpdesk home.
    pub fn from_config(config: Config) -> Result<Self> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(storage_dir()));
        let sessions = Arc::new(if config.session.persist {
            SessionStore::persistent(storage.clone())?
        } else {
            SessionStore::in_memory()
        });

        let backends = match config.backend_kind()? {
            BackendKind::Rest => {
                Backends::from_shared(Arc::new(RestBackend::from_config(&config, sessions.clone())?))
            }
            BackendKind::Local => {
                Backends::from_shared(Arc::new(MemoryBackend::open(&local_backend_path())?))
            }
        };

        if config.diagnostics.bypass_auth {
            tracing::warn!("diagnostics view is reachable without signing in");
        }

        Ok(Self::assemble(config, backends, sessions, storage))
    }

    /// A context over explicit backends and in-memory storage.
    pub fn with_backends(config: Config, backends: Backends) -> Self {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        Self::assemble(config, backends, Arc::new(SessionStore::in_memory()), storage)
    }

    /// Like `with_backends`, over caller-provided storage.
    pub fn with_storage(
        config: Config,
        backends: Backends,
        sessions: Arc<SessionStore>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self::assemble(config, backends, sessions, storage)
    }

    fn assemble(
        config: Config,
        backends: Backends,
        sessions: Arc<SessionStore>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let policy = RoutePolicy {
            diagnostics_bypass_auth: config.diagnostics.bypass_auth,
        };
        Self {
            config,
            backends,
            selection: SelectionStore::new(storage.clone()),
            sessions,
            storage,
            policy,
        }
    }

    pub fn directory(&self) -> &dyn OrganizationDirectory {
        self.backends.directory.as_ref()
    }

    pub fn tickets(&self) -> &dyn TicketBackend {
        self.backends.tickets.as_ref()
    }

    pub fn backends(&self) -> &Backends {
        &self.backends
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn policy(&self) -> RoutePolicy {
        self.policy
    }

    pub fn user(&self) -> Option<User> {
        self.sessions.user()
    }

    pub fn require_user(&self) -> Result<User> {
        self.user().ok_or(HelpdeskError::NotAuthenticated)
    }

    pub fn require_selection(&self) -> Result<Organization> {
        self.selection.load()?.ok_or(HelpdeskError::NoTenantSelected)
    }

    /// Decide which view renders at `path` given the current stores.
    pub fn resolve(&self, path: &str) -> Result<Resolution> {
        let user = self.user();
        // Selection is only read once a user exists
        let selection = match user {
            Some(_) => self.selection.load()?,
            None => None,
        };
        Ok(resolve(path, user.as_ref(), selection.as_ref(), self.policy))
    }

    pub async fn sign_in(&self, email: &str, password: SecretString) -> Result<User> {
        let email = email.trim();
        if email.is_empty() {
            return Err(HelpdeskError::Auth("Email is required".to_string()));
        }
        let session = self.backends.auth.sign_in(email, &password).await?;
        let user = session.user.clone();
        self.sessions.set(session)?;
        Ok(user)
    }

    /// End the session and forget the tenant selection.
    ///
    /// The backend call is best effort; local state is cleared regardless.
    pub async fn sign_out(&self) -> Result<()> {
        if let Some(session) = self.sessions.current()
            && let Err(e) = self.backends.auth.sign_out(&session).await
        {
            tracing::warn!(error = %e, "backend sign-out failed, clearing local session anyway");
        }
        // Both are cleared even if one fails
        let selection = self.selection.clear();
        let session = self.sessions.clear();
        selection.and(session)
    }

    pub fn select_organization(&self, org: &Organization) -> Result<String> {
        self.selection.select(org)?;
        Ok(org.path())
    }

    /// Find an organization by slug and select it.
    pub async fn select_by_slug(&self, slug: &str) -> Result<Organization> {
        let org = self.backends.directory.organization_by_slug(slug).await?;
        self.selection.select(&org)?;
        Ok(org)
    }

    /// Drop the selection and return the organization-select location.
    pub fn change_organization(&self) -> Result<String> {
        self.selection.clear()?;
        Ok(crate::router::ROOT_PATH.to_string())
    }

    /// Refresh the cached tenant from the backend.
    ///
    /// When the slug no longer resolves (or the lookup fails) the selection is
    /// cleared, since no tenant context can be established.
    pub async fn verify_tenant(&self, slug: &str) -> Result<Organization> {
        match self.backends.directory.organization_by_slug(slug).await {
            Ok(org) => {
                self.selection.select(&org)?;
                Ok(org)
            }
            Err(e) => {
                tracing::warn!(%slug, error = %e, "tenant verification failed");
                self.selection.clear()?;
                Err(e)
            }
        }
    }
}
