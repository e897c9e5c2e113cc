//! Tenant selection state.
//!
//! The selected organization is cached as JSON under a single storage key.
//! A value that no longer deserializes is treated as absent and removed, so
//! routing falls back to organization selection instead of failing.

use std::sync::Arc;

use crate::error::{HelpdeskError, Result};
use crate::storage::KeyValueStore;
use crate::types::Organization;

pub const SELECTION_KEY: &str = "selectedOrganization";

/// What the store currently holds, without side effects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedSelection {
    Absent,
    Valid(Organization),
    Malformed(String),
}

pub struct SelectionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SelectionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Read and validate the cached value without repairing it.
    pub fn inspect(&self) -> Result<CachedSelection> {
        let Some(raw) = self.storage.get(SELECTION_KEY)? else {
            return Ok(CachedSelection::Absent);
        };
        Ok(match parse_selection(&raw) {
            Ok(org) => CachedSelection::Valid(org),
            Err(reason) => CachedSelection::Malformed(reason),
        })
    }

    /// The selected organization, if a valid one is cached.
    pub fn load(&self) -> Result<Option<Organization>> {
        match self.inspect()? {
            CachedSelection::Valid(org) => Ok(Some(org)),
            CachedSelection::Absent => Ok(None),
            CachedSelection::Malformed(reason) => {
                tracing::warn!(%reason, "discarding malformed tenant selection");
                self.storage.remove(SELECTION_KEY)?;
                Ok(None)
            }
        }
    }

    pub fn select(&self, org: &Organization) -> Result<()> {
        if !is_valid_slug(&org.slug) {
            return Err(HelpdeskError::InvalidValue {
                field: "slug",
                message: format!("'{}' cannot be used as an organization path", org.slug),
            });
        }
        let json = serde_json::to_string(org)?;
        self.storage.set(SELECTION_KEY, &json)?;
        tracing::info!(slug = %org.slug, "selected organization");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove(SELECTION_KEY)?;
        tracing::info!("cleared organization selection");
        Ok(())
    }
}

fn parse_selection(raw: &str) -> std::result::Result<Organization, String> {
    let org: Organization = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    if org.id.trim().is_empty() {
        return Err("missing organization id".to_string());
    }
    if !is_valid_slug(&org.slug) {
        return Err(format!("invalid slug '{}'", org.slug));
    }
    Ok(org)
}

/// Top-level paths the router claims before tenant slugs.
pub const RESERVED_SLUGS: &[&str] = &["diagnostics"];

/// Slugs are single URL path segments that don't shadow a fixed route.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !RESERVED_SLUGS.contains(&slug)
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
