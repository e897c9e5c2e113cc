//! Backend capability interfaces.
//!
//! Every read and write the application performs goes through one of these
//! traits and returns a typed `Result`. `rest` talks to a PostgREST + auth
//! server over HTTP; `memory` is a seeded in-process implementation used for
//! the local backend and in tests.

pub mod memory;
pub mod postgrest;
pub mod rest;
pub mod retry;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::search::TicketQuery;
use crate::session::Session;
use crate::types::{IssueType, Organization, Ticket};

pub use memory::MemoryBackend;
pub use rest::RestBackend;
pub use retry::{RetryPolicy, execute_with_retry};

#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    /// All organizations, ordered by name ascending.
    async fn list_organizations(&self) -> Result<Vec<Organization>>;

    /// Exactly one organization, or `OrganizationNotFound`.
    async fn organization_by_slug(&self, slug: &str) -> Result<Organization>;
}

#[async_trait]
pub trait TicketBackend: Send + Sync {
    /// Tickets matching `query`, newest first.
    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>>;

    /// Invoke the `create_ticket` procedure. Never retried.
    async fn create_ticket(&self, request: &CreateTicketRequest) -> Result<Ticket>;
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session>;

    async fn sign_out(&self, session: &Session) -> Result<()>;
}

/// Arguments of the `create_ticket` remote procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    pub p_opened_by: String,
    pub p_client_file_no: String,
    pub p_mobile_no: String,
    pub p_name_of_client: String,
    pub p_issue_type: IssueType,
    pub p_description: String,
    pub p_organization_id: String,
}
