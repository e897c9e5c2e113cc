//! Environment and connectivity report.
//!
//! Never includes secret values; the anon key is reported as configured or not.

use serde::Serialize;

use crate::config::BackendKind;
use crate::context::AppContext;
use crate::tenant::CachedSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

impl CheckStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "✓",
            CheckStatus::Warn => "!",
            CheckStatus::Fail => "✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub status: CheckStatus,
    pub detail: String,
}

impl Check {
    fn new(name: &'static str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name,
            status,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub checks: Vec<Check>,
}

impl DiagnosticsReport {
    /// Collect every check, including a live call to the organization directory.
    pub async fn collect(ctx: &AppContext) -> Self {
        let mut checks = Vec::new();

        let kind = ctx.config.backend_kind();
        match &kind {
            Ok(kind) => checks.push(Check::new("backend", CheckStatus::Ok, kind.to_string())),
            Err(e) => checks.push(Check::new("backend", CheckStatus::Fail, e.to_string())),
        }

        if matches!(kind, Ok(BackendKind::Rest)) {
            checks.push(match ctx.config.backend_url() {
                Ok(url) => Check::new("backend url", CheckStatus::Ok, url.to_string()),
                Err(e) => Check::new("backend url", CheckStatus::Fail, e.to_string()),
            });
            checks.push(if ctx.config.anon_key().is_some() {
                Check::new("anon key", CheckStatus::Ok, "configured")
            } else {
                Check::new("anon key", CheckStatus::Warn, "not configured")
            });
        }

        checks.push(match ctx.user() {
            Some(user) => Check::new("session", CheckStatus::Ok, format!("signed in as {}", user.email)),
            None => Check::new("session", CheckStatus::Warn, "not signed in"),
        });

        checks.push(match ctx.selection().inspect() {
            Ok(CachedSelection::Valid(org)) => Check::new(
                "organization",
                CheckStatus::Ok,
                format!("{} ({})", org.name, org.slug),
            ),
            Ok(CachedSelection::Absent) => {
                Check::new("organization", CheckStatus::Warn, "none selected")
            }
            Ok(CachedSelection::Malformed(reason)) => Check::new(
                "organization",
                CheckStatus::Fail,
                format!("cached selection is malformed: {reason}"),
            ),
            Err(e) => Check::new("organization", CheckStatus::Fail, e.to_string()),
        });

        checks.push(Check::new(
            "storage",
            CheckStatus::Ok,
            format!(
                "{} (session {})",
                ctx.storage().describe(),
                if ctx.sessions().is_persistent() {
                    "persisted"
                } else {
                    "in memory"
                }
            ),
        ));

        checks.push(match ctx.directory().list_organizations().await {
            Ok(orgs) => Check::new(
                "connectivity",
                CheckStatus::Ok,
                format!("{} organization(s) visible", orgs.len()),
            ),
            Err(e) => Check::new("connectivity", CheckStatus::Fail, e.user_message()),
        });

        Self { checks }
    }

    pub fn is_healthy(&self) -> bool {
        self.checks.iter().all(|c| c.status != CheckStatus::Fail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::config::Config;
    use crate::context::Backends;
    use std::sync::Arc;

    fn ctx(backend: Arc<MemoryBackend>) -> AppContext {
        let mut config = Config::default();
        config.backend.kind = BackendKind::Local;
        AppContext::with_backends(config, Backends::from_shared(backend))
    }

    #[tokio::test]
    async fn test_report_for_fresh_local_setup() {
        let report = DiagnosticsReport::collect(&ctx(Arc::new(MemoryBackend::seeded()))).await;
        let names: Vec<_> = report.checks.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["backend", "session", "organization", "storage", "connectivity"]
        );
        assert!(report.is_healthy());
        let conn = report.checks.last().unwrap();
        assert_eq!(conn.detail, "3 organization(s) visible");
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails_connectivity() {
        let backend = Arc::new(MemoryBackend::seeded());
        backend.set_failure(Some("connection refused"));
        let report = DiagnosticsReport::collect(&ctx(backend)).await;
        assert!(!report.is_healthy());
        let conn = report.checks.last().unwrap();
        assert_eq!(conn.status, CheckStatus::Fail);
        assert_eq!(conn.detail, "connection refused");
    }

    #[tokio::test]
    async fn test_malformed_selection_is_reported() {
        let context = ctx(Arc::new(MemoryBackend::seeded()));
        context
            .storage()
            .set(crate::tenant::SELECTION_KEY, "{not json")
            .unwrap();
        let report = DiagnosticsReport::collect(&context).await;
        let org = report.checks.iter().find(|c| c.name == "organization").unwrap();
        assert_eq!(org.status, CheckStatus::Fail);
    }
}
