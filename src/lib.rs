pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod create;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod paths;
pub mod router;
pub mod search;
pub mod session;
pub mod storage;
pub mod tenant;
pub mod tui;
pub mod types;

pub use backend::{
    AuthBackend, CreateTicketRequest, MemoryBackend, OrganizationDirectory, RestBackend,
    TicketBackend,
};
pub use config::Config;
pub use context::{AppContext, Backends};
pub use create::{CreateModal, TicketForm, submit_ticket};
pub use error::{HelpdeskError, Result};
pub use router::{Resolution, Route, RoutePolicy, View, resolve};
pub use search::TicketQuery;
pub use session::{Session, SessionStore};
pub use tenant::SelectionStore;
pub use types::{IssueType, Organization, TenantTheme, Ticket, TicketStatus, User};
