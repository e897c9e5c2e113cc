//! In-process backend.
//!
//! Serves the `local` backend kind (snapshotted to a JSON file so separate CLI
//! invocations see the same data) and the tests. Ticket numbers and creation
//! timestamps are assigned here, the way the remote procedure assigns them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use parking_lot::{Mutex, RwLock};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{AuthBackend, CreateTicketRequest, OrganizationDirectory, TicketBackend};
use crate::error::{HelpdeskError, Result};
use crate::search::{TicketQuery, filter_tickets};
use crate::session::Session;
use crate::storage::write_atomic;
use crate::types::{IssueType, Organization, Ticket, TicketStatus, User};

pub const DEMO_EMAIL: &str = "demo@helpdesk.local";
pub const DEMO_PASSWORD: &str = "demo";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MemoryData {
    organizations: Vec<Organization>,
    tickets: Vec<Ticket>,
    next_ticket_no: u64,
}

pub struct MemoryBackend {
    data: RwLock<MemoryData>,
    users: HashMap<String, (String, User)>,
    snapshot: Option<PathBuf>,
    failure: Mutex<Option<String>>,
    latency: Mutex<Option<Duration>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl MemoryBackend {
    /// An empty backend with the demo user only.
    pub fn empty() -> Self {
        Self::from_data(MemoryData {
            next_ticket_no: 1,
            ..MemoryData::default()
        })
    }

    /// Demo organizations and tickets.
    pub fn seeded() -> Self {
        Self::from_data(seed_data())
    }

    /// Load the snapshot at `path`, seeding it on first use.
    pub fn open(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str(&raw).map_err(|e| {
                HelpdeskError::Storage(format!(
                    "local backend snapshot {} is unreadable: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            seed_data()
        };
        let mut backend = Self::from_data(data);
        backend.snapshot = Some(path.to_path_buf());
        backend.save()?;
        Ok(backend)
    }

    fn from_data(data: MemoryData) -> Self {
        let mut users = HashMap::new();
        users.insert(
            DEMO_EMAIL.to_string(),
            (
                DEMO_PASSWORD.to_string(),
                User {
                    id: "00000000-0000-4000-8000-000000000001".to_string(),
                    email: DEMO_EMAIL.to_string(),
                },
            ),
        );
        Self {
            data: RwLock::new(data),
            users,
            snapshot: None,
            failure: Mutex::new(None),
            latency: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_user(mut self, email: &str, password: &str) -> Self {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
        };
        self.users
            .insert(email.to_ascii_lowercase(), (password.to_string(), user));
        self
    }

    pub fn with_organization(self, org: Organization) -> Self {
        self.data.write().organizations.push(org);
        self
    }

    pub fn with_ticket(self, ticket: Ticket) -> Self {
        self.data.write().tickets.push(ticket);
        self
    }

    /// Make every following call fail with `message`, or recover with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock() = message.map(str::to_string);
    }

    /// Delay every following call.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock() = latency;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn tickets(&self) -> Vec<Ticket> {
        self.data.read().tickets.clone()
    }

    async fn simulate(&self) -> Result<()> {
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match self.failure.lock().clone() {
            Some(message) => Err(HelpdeskError::Api {
                status: 500,
                message,
            }),
            None => Ok(()),
        }
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&*self.data.read())?;
        write_atomic(path, &json)
    }
}

#[async_trait]
impl OrganizationDirectory for MemoryBackend {
    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.simulate().await?;
        let mut orgs = self.data.read().organizations.clone();
        orgs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(orgs)
    }

    async fn organization_by_slug(&self, slug: &str) -> Result<Organization> {
        self.simulate().await?;
        self.data
            .read()
            .organizations
            .iter()
            .find(|org| org.slug == slug)
            .cloned()
            .ok_or_else(|| HelpdeskError::OrganizationNotFound(slug.to_string()))
    }
}

#[async_trait]
impl TicketBackend for MemoryBackend {
    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        Ok(filter_tickets(self.data.read().tickets.iter(), query))
    }

    async fn create_ticket(&self, request: &CreateTicketRequest) -> Result<Ticket> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;

        let ticket = {
            let mut data = self.data.write();
            if !data
                .organizations
                .iter()
                .any(|org| org.id == request.p_organization_id)
            {
                return Err(HelpdeskError::Api {
                    status: 400,
                    message: format!("unknown organization {}", request.p_organization_id),
                });
            }

            let number = data.next_ticket_no.max(1);
            data.next_ticket_no = number + 1;
            let ticket = Ticket {
                id: uuid::Uuid::new_v4().to_string(),
                ticket_no: format!("TKT-{number:04}"),
                client_file_no: request.p_client_file_no.clone(),
                mobile_no: request.p_mobile_no.clone(),
                name_of_client: request.p_name_of_client.clone(),
                issue_type: request.p_issue_type,
                description: request.p_description.clone(),
                status: TicketStatus::Open,
                created_on: Timestamp::now(),
                organization_id: request.p_organization_id.clone(),
                assignee: None,
                opened_by: Some(request.p_opened_by.clone()),
            };
            data.tickets.push(ticket.clone());
            ticket
        };

        self.save()?;
        tracing::info!(ticket_no = %ticket.ticket_no, "created ticket in local backend");
        Ok(ticket)
    }
}

#[async_trait]
impl AuthBackend for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session> {
        self.simulate().await?;
        let key = email.trim().to_ascii_lowercase();
        match self.users.get(&key) {
            Some((expected, user)) if expected == password.expose_secret() => Ok(Session::new(
                user.clone(),
                SecretString::from(format!("local-{}", uuid::Uuid::new_v4())),
                None,
                None,
            )),
            _ => Err(HelpdeskError::Auth("Invalid login credentials".to_string())),
        }
    }

    async fn sign_out(&self, _session: &Session) -> Result<()> {
        self.simulate().await
    }
}

fn org(id: &str, name: &str, slug: &str, colors: [&str; 3]) -> Organization {
    Organization {
        id: id.to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        primary_color: Some(colors[0].to_string()),
        secondary_color: Some(colors[1].to_string()),
        accent_color: Some(colors[2].to_string()),
        logo_url: None,
    }
}

struct SeedTicket {
    no: u64,
    org: &'static str,
    file: &'static str,
    mobile: &'static str,
    client: &'static str,
    issue: IssueType,
    status: TicketStatus,
    description: &'static str,
    created: &'static str,
}

fn seed_data() -> MemoryData {
    let organizations = vec![
        org(
            "org-acme",
            "Acme Support",
            "acme",
            ["#1a365d", "#2d3748", "#4299e1"],
        ),
        org(
            "org-globex",
            "Globex",
            "globex",
            ["#22543d", "#1a202c", "#48bb78"],
        ),
        org(
            "org-usetaxfiler",
            "US eTax Filer",
            "usetaxfiler",
            ["#742a2a", "#2d3748", "#f56565"],
        ),
    ];

    let seeds = [
        SeedTicket {
            no: 1,
            org: "org-acme",
            file: "CF-1001",
            mobile: "555-0101",
            client: "Maria Lopez",
            issue: IssueType::Account,
            status: TicketStatus::Closed,
            description: "Cannot reset portal password",
            created: "2024-05-01T09:15:00Z",
        },
        SeedTicket {
            no: 2,
            org: "org-acme",
            file: "CF-1002",
            mobile: "555-0199",
            client: "Dev Patel",
            issue: IssueType::Billing,
            status: TicketStatus::InProgress,
            description: "Charged twice for annual plan",
            created: "2024-05-03T14:02:00Z",
        },
        SeedTicket {
            no: 3,
            org: "org-acme",
            file: "CF-1003",
            mobile: "555-0142",
            client: "Anna Schmidt",
            issue: IssueType::Technical,
            status: TicketStatus::Open,
            description: "Upload fails for PDFs over 10MB",
            created: "2024-05-06T11:30:00Z",
        },
        SeedTicket {
            no: 4,
            org: "org-globex",
            file: "GX-77",
            mobile: "555-0300",
            client: "Hank Scorpio",
            issue: IssueType::Other,
            status: TicketStatus::Open,
            description: "Request for on-site visit",
            created: "2024-05-02T08:00:00Z",
        },
        SeedTicket {
            no: 5,
            org: "org-usetaxfiler",
            file: "TX-2024-118",
            mobile: "555-0455",
            client: "Lee Wong",
            issue: IssueType::Technical,
            status: TicketStatus::Open,
            description: "E-file rejected with code R0000-504",
            created: "2024-04-12T16:45:00Z",
        },
    ];

    let tickets = seeds
        .into_iter()
        .map(|s| Ticket {
            id: format!("seed-{}", s.no),
            ticket_no: format!("TKT-{:04}", s.no),
            client_file_no: s.file.to_string(),
            mobile_no: s.mobile.to_string(),
            name_of_client: s.client.to_string(),
            issue_type: s.issue,
            description: s.description.to_string(),
            status: s.status,
            created_on: s.created.parse().unwrap_or_else(|_| Timestamp::UNIX_EPOCH),
            organization_id: s.org.to_string(),
            assignee: None,
            opened_by: Some(DEMO_EMAIL.to_string()),
        })
        .collect::<Vec<_>>();

    MemoryData {
        organizations,
        next_ticket_no: tickets.len() as u64 + 1,
        tickets,
    }
}
