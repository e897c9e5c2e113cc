//! Ticket list queries.
//!
//! A `TicketQuery` is always scoped to one organization. The free-text part
//! matches case-insensitively against any of four fields; the status part is
//! an exact match. Backends translate the query to their own dialect, and the
//! local backend evaluates it with `ticket_matches`.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::{Ticket, TicketStatus};

/// Fields searched by the free-text query, in backend column names
pub const SEARCH_FIELDS: [&str; 4] = ["mobile_no", "client_file_no", "name_of_client", "ticket_no"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketQuery {
    pub organization_id: String,
    pub text: Option<String>,
    pub status: Option<TicketStatus>,
}

impl TicketQuery {
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            text: None,
            status: None,
        }
    }

    pub fn with_text(mut self, raw: &str) -> Self {
        self.text = normalize_text(raw);
        self
    }

    pub fn with_status(mut self, status: Option<TicketStatus>) -> Self {
        self.status = status;
        self
    }
}

/// Trim the query; whitespace-only means no query.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a status filter where empty or "all" means no filter.
pub fn parse_status_filter(raw: &str) -> crate::error::Result<Option<TicketStatus>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || unicase::eq(trimmed, "all") {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

/// Case-insensitive substring match.
///
/// Uses `unicase` folding so comparisons are not limited to ASCII.
fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let haystack_folded = unicase::UniCase::new(haystack).to_folded_case();
    let needle_folded = unicase::UniCase::new(needle).to_folded_case();
    haystack_folded.contains(&needle_folded)
}

pub fn matches_text(ticket: &Ticket, text: &str) -> bool {
    [
        ticket.mobile_no.as_str(),
        ticket.client_file_no.as_str(),
        ticket.name_of_client.as_str(),
        ticket.ticket_no.as_str(),
    ]
    .into_iter()
    .any(|field| contains_case_insensitive(field, text))
}

pub fn ticket_matches(ticket: &Ticket, query: &TicketQuery) -> bool {
    if ticket.organization_id != query.organization_id {
        return false;
    }
    if let Some(status) = query.status
        && ticket.status != status
    {
        return false;
    }
    match &query.text {
        Some(text) => matches_text(ticket, text),
        None => true,
    }
}

/// Newest first. Ties break on ticket number so ordering is stable.
pub fn sort_newest_first(tickets: &mut [Ticket]) {
    tickets.sort_by(|a, b| {
        b.created_on
            .cmp(&a.created_on)
            .then_with(|| b.ticket_no.cmp(&a.ticket_no))
    });
}

/// Evaluate a query against an in-memory ticket set.
pub fn filter_tickets<'a>(
    tickets: impl IntoIterator<Item = &'a Ticket>,
    query: &TicketQuery,
) -> Vec<Ticket> {
    let mut matched: Vec<Ticket> = tickets
        .into_iter()
        .filter(|t| ticket_matches(t, query))
        .cloned()
        .collect();
    sort_newest_first(&mut matched);
    matched
}

/// Identity of one issued list request
pub type RequestId = u64;

/// Last-request-wins bookkeeping for overlapping list requests.
///
/// Every issued request takes a new id. A response is applied only when its id
/// is still the latest one issued.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestId {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> RequestId {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        self.latest() == id
    }

    /// Record an id issued elsewhere. Older ids never move the tracker back.
    pub fn advance_to(&self, id: RequestId) {
        self.latest.fetch_max(id, Ordering::SeqCst);
    }
}
