//! Domain records shared by the backends, the router and the views.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::{HelpdeskError, Result};

pub const DEFAULT_PRIMARY_COLOR: &str = "#1a365d";
pub const DEFAULT_SECONDARY_COLOR: &str = "#2d3748";
pub const DEFAULT_ACCENT_COLOR: &str = "#4299e1";

/// A tenant. Managed externally; this application only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Organization {
    pub fn theme(&self) -> TenantTheme {
        TenantTheme::from_organization(self)
    }

    /// Dashboard path for this tenant
    pub fn path(&self) -> String {
        format!("/{}", self.slug)
    }
}

/// A 24-bit color parsed from `#rrggbb` or `#rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn from_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Self {
                    r: expand(0)?,
                    g: expand(1)?,
                    b: expand(2)?,
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Per-tenant colors, resolved once from the organization record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantTheme {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
}

impl Default for TenantTheme {
    fn default() -> Self {
        Self::resolve(None, None, None)
    }
}

impl TenantTheme {
    /// Missing or unparsable colors fall back to the defaults.
    pub fn resolve(primary: Option<&str>, secondary: Option<&str>, accent: Option<&str>) -> Self {
        let pick = |value: Option<&str>, fallback: &str| {
            value
                .and_then(Rgb::from_hex)
                .or_else(|| Rgb::from_hex(fallback))
                .unwrap_or(Rgb { r: 0, g: 0, b: 0 })
        };
        Self {
            primary: pick(primary, DEFAULT_PRIMARY_COLOR),
            secondary: pick(secondary, DEFAULT_SECONDARY_COLOR),
            accent: pick(accent, DEFAULT_ACCENT_COLOR),
        }
    }

    pub fn from_organization(org: &Organization) -> Self {
        Self::resolve(
            org.primary_color.as_deref(),
            org.secondary_color.as_deref(),
            org.accent_color.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Closed,
}

pub const VALID_STATUSES: &[&str] = &["open", "in_progress", "closed"];

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        TicketStatus::ALL
            .into_iter()
            .find(|status| {
                unicase::eq(status.as_str(), s)
                    || unicase::eq(status.label(), s)
                    || (unicase::eq("in-progress", s) && *status == TicketStatus::InProgress)
            })
            .ok_or_else(|| HelpdeskError::InvalidValue {
                field: "status",
                message: format!("'{s}' (expected one of: {})", VALID_STATUSES.join(", ")),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    Technical,
    Billing,
    Account,
    Other,
}

pub const VALID_ISSUE_TYPES: &[&str] = &["Technical", "Billing", "Account", "Other"];

impl IssueType {
    pub const ALL: [IssueType; 4] = [
        IssueType::Technical,
        IssueType::Billing,
        IssueType::Account,
        IssueType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Technical => "Technical",
            IssueType::Billing => "Billing",
            IssueType::Account => "Account",
            IssueType::Other => "Other",
        }
    }

    /// Next type in display order, wrapping around.
    pub fn cycle(self, forward: bool) -> Self {
        let idx = IssueType::ALL.iter().position(|t| *t == self).unwrap_or(0);
        let len = IssueType::ALL.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        IssueType::ALL[next]
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        IssueType::ALL
            .into_iter()
            .find(|t| unicase::eq(t.as_str(), s))
            .ok_or_else(|| HelpdeskError::InvalidValue {
                field: "issue type",
                message: format!("'{s}' (expected one of: {})", VALID_ISSUE_TYPES.join(", ")),
            })
    }
}

/// A support request scoped to one organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub ticket_no: String,
    pub client_file_no: String,
    pub mobile_no: String,
    pub name_of_client: String,
    pub issue_type: IssueType,
    pub description: String,
    pub status: TicketStatus,
    pub created_on: Timestamp,
    pub organization_id: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub opened_by: Option<String>,
}

/// Identity of the signed-in staff member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(
            Rgb::from_hex("#1a365d"),
            Some(Rgb {
                r: 0x1a,
                g: 0x36,
                b: 0x5d
            })
        );
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb { r: 255, g: 255, b: 255 }));
        assert_eq!(Rgb::from_hex("1a365d"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(Rgb::from_hex("#ééé"), None);
    }

    #[test]
    fn test_theme_falls_back_per_color() {
        let org = Organization {
            id: "1".to_string(),
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            primary_color: Some("#ff0000".to_string()),
            secondary_color: Some("garbage".to_string()),
            accent_color: None,
            logo_url: None,
        };
        let theme = org.theme();
        assert_eq!(theme.primary.to_string(), "#ff0000");
        assert_eq!(theme.secondary.to_string(), DEFAULT_SECONDARY_COLOR);
        assert_eq!(theme.accent.to_string(), DEFAULT_ACCENT_COLOR);
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!("OPEN".parse::<TicketStatus>().unwrap(), TicketStatus::Open);
        assert_eq!(
            "in_progress".parse::<TicketStatus>().unwrap(),
            TicketStatus::InProgress
        );
        assert_eq!(
            "In Progress".parse::<TicketStatus>().unwrap(),
            TicketStatus::InProgress
        );
        assert_eq!(
            "in-progress".parse::<TicketStatus>().unwrap(),
            TicketStatus::InProgress
        );
        assert!("resolved".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn test_status_serde_matches_backend() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_issue_type_cycle_wraps() {
        assert_eq!(IssueType::Other.cycle(true), IssueType::Technical);
        assert_eq!(IssueType::Technical.cycle(false), IssueType::Other);
        assert_eq!("billing".parse::<IssueType>().unwrap(), IssueType::Billing);
    }

    #[test]
    fn test_ticket_deserializes_backend_row() {
        let row = r#"{
            "id": "5b0c",
            "ticket_no": "TKT-0042",
            "client_file_no": "CF-1",
            "mobile_no": "555-0199",
            "name_of_client": "Jane Roe",
            "issue_type": "Billing",
            "description": "Refund",
            "status": "open",
            "created_on": "2024-03-01T10:00:00Z",
            "organization_id": "org-1",
            "assignee": null
        }"#;
        let ticket: Ticket = serde_json::from_str(row).unwrap();
        assert_eq!(ticket.ticket_no, "TKT-0042");
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.assignee.is_none());
        assert!(ticket.opened_by.is_none());
    }
}
