//! Drives the interactive model headlessly: actions go through the reducer and
//! effects run against an in-memory backend, the same way the root component
//! wires them.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use helpdesk::backend::memory::{DEMO_EMAIL, DEMO_PASSWORD};
use helpdesk::search::RequestTracker;
use helpdesk::tui::app::effects::run_effect;
use helpdesk::tui::app::model::TICKETS_FAILED;
use helpdesk::tui::app::{Action, AppState, Effect, Screen, reduce};
use helpdesk::tui::components::ToastLevel;
use helpdesk::{AppContext, Backends, Config, IssueType, MemoryBackend, TicketStatus};

struct Harness {
    ctx: AppContext,
    backend: Arc<MemoryBackend>,
    tracker: RequestTracker,
    state: AppState,
}

impl Harness {
    async fn start(path: &str) -> Self {
        let backend = Arc::new(MemoryBackend::seeded());
        let ctx = AppContext::with_backends(Config::default(), Backends::from_shared(backend.clone()));
        let state = AppState::new(path, Duration::ZERO);
        let initial = state.initial_effects();
        let mut harness = Harness {
            ctx,
            backend,
            tracker: RequestTracker::new(),
            state,
        };
        harness.settle(initial).await;
        harness
    }

    /// Run effects until the queue is empty. Timers and the clipboard are skipped.
    async fn settle(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            if matches!(effect, Effect::ExpireToast(_) | Effect::CopyToClipboard(_)) {
                continue;
            }
            if let Some(action) = run_effect(&self.ctx, &self.tracker, effect).await {
                let (next, more) = reduce(self.state.clone(), action);
                self.state = next;
                queue.extend(more);
            }
        }
    }

    async fn send(&mut self, action: Action) {
        let (next, effects) = reduce(self.state.clone(), action);
        self.state = next;
        self.settle(effects).await;
    }

    async fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send(Action::Input(c)).await;
        }
    }

    async fn sign_in(&mut self, email: &str, password: &str) {
        self.type_text(email).await;
        self.send(Action::NextField).await;
        self.type_text(password).await;
        self.send(Action::Submit).await;
    }

    async fn open_dashboard(&mut self, filter: &str) {
        self.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;
        self.type_text(filter).await;
        self.send(Action::Submit).await;
    }

    fn screen_name(&self) -> &'static str {
        match &self.state.screen {
            Screen::Loading => "loading",
            Screen::Login(_) => "login",
            Screen::OrganizationSelect(_) => "organization-select",
            Screen::Dashboard(_) => "dashboard",
            Screen::Diagnostics(_) => "diagnostics",
        }
    }

    fn ticket_numbers(&self) -> Vec<String> {
        self.state
            .dashboard()
            .map(|d| d.tickets.iter().map(|t| t.ticket_no.clone()).collect())
            .unwrap_or_default()
    }
}

#[tokio::test]
async fn test_starts_at_login_without_session() {
    let harness = Harness::start("/acme").await;
    assert_eq!(harness.screen_name(), "login");
}

#[tokio::test]
async fn test_wrong_password_stays_on_login_with_error() {
    let mut harness = Harness::start("/").await;
    harness.sign_in(DEMO_EMAIL, "wrong").await;

    let Screen::Login(login) = &harness.state.screen else {
        panic!("expected login, got {}", harness.screen_name());
    };
    assert_eq!(login.error.as_deref(), Some("Invalid login credentials"));
    assert!(!login.submitting);
    assert!(harness.state.user.is_none());
}

#[tokio::test]
async fn test_sign_in_lists_organizations() {
    let mut harness = Harness::start("/").await;
    harness.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;

    let Screen::OrganizationSelect(orgs) = &harness.state.screen else {
        panic!("expected organization select, got {}", harness.screen_name());
    };
    assert!(!orgs.loading);
    assert_eq!(orgs.organizations.len(), 3);
    assert_eq!(
        harness.state.user.as_ref().map(|u| u.email.as_str()),
        Some(DEMO_EMAIL)
    );
}

#[tokio::test]
async fn test_selecting_organization_opens_its_dashboard() {
    let mut harness = Harness::start("/").await;
    harness.open_dashboard("acme").await;

    assert_eq!(harness.screen_name(), "dashboard");
    assert_eq!(harness.state.location, "/acme");
    assert_eq!(harness.ticket_numbers(), vec!["TKT-0003", "TKT-0002", "TKT-0001"]);
    assert_eq!(
        harness.ctx.require_selection().unwrap().slug,
        "acme",
        "selection is persisted"
    );
}

#[tokio::test]
async fn test_tenant_path_redirects_to_selected_organization() {
    let mut harness = Harness::start("/").await;
    harness.open_dashboard("globex").await;

    harness.send(Action::OpenDiagnostics).await;
    assert_eq!(harness.screen_name(), "diagnostics");
    harness.send(Action::Cancel).await;

    // Root resolves straight to the dashboard while a selection is cached
    assert_eq!(harness.screen_name(), "dashboard");
    assert_eq!(harness.state.location, "/globex");
}

#[tokio::test]
async fn test_search_and_status_filter_narrow_the_list() {
    let mut harness = Harness::start("/").await;
    harness.open_dashboard("acme").await;

    harness.send(Action::FocusSearch).await;
    harness.type_text("CF-1002").await;
    assert_eq!(harness.ticket_numbers(), vec!["TKT-0002"]);

    harness.send(Action::Cancel).await;
    assert_eq!(harness.ticket_numbers().len(), 3);

    // open -> in progress -> closed
    harness.send(Action::CycleStatusFilter).await;
    harness.send(Action::CycleStatusFilter).await;
    harness.send(Action::CycleStatusFilter).await;
    let dash = harness.state.dashboard().unwrap();
    assert_eq!(dash.status, Some(TicketStatus::Closed));
    assert_eq!(harness.ticket_numbers(), vec!["TKT-0001"]);
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_tickets() {
    let mut harness = Harness::start("/").await;
    harness.open_dashboard("acme").await;

    harness.backend.set_failure(Some("database offline"));
    harness.send(Action::Refresh).await;

    assert_eq!(harness.ticket_numbers().len(), 3);
    let toast = harness.state.toast.as_ref().expect("toast");
    assert_eq!(toast.message, TICKETS_FAILED);
    assert_eq!(toast.level, ToastLevel::Error);
}

#[tokio::test]
async fn test_create_from_selected_ticket_adds_to_list() {
    let mut harness = Harness::start("/").await;
    harness.open_dashboard("acme").await;

    harness.send(Action::OpenCreateFromSelected).await;
    harness.send(Action::CycleIssueType { forward: true }).await;
    harness.send(Action::NextField).await;
    harness.type_text("Follow-up call").await;
    harness.send(Action::Submit).await;

    let dash = harness.state.dashboard().unwrap();
    assert!(!dash.modal.is_open());
    assert_eq!(dash.tickets.len(), 4);
    let created = &dash.tickets[0];
    assert_eq!(created.ticket_no, "TKT-0006");
    assert_eq!(created.name_of_client, "Anna Schmidt");
    assert_eq!(created.issue_type, IssueType::ALL[0]);
    assert_eq!(created.description, "Follow-up call");
    assert_eq!(
        harness.state.toast.as_ref().map(|t| t.message.as_str()),
        Some("Ticket created successfully")
    );
}

#[tokio::test]
async fn test_invalid_create_never_reaches_backend() {
    let mut harness = Harness::start("/").await;
    harness.open_dashboard("acme").await;

    harness.send(Action::OpenCreate).await;
    harness.send(Action::Submit).await;

    let dash = harness.state.dashboard().unwrap();
    let form = dash.modal.form().expect("modal stays open");
    assert_eq!(form.field_errors.len(), 5);
    assert_eq!(harness.backend.create_calls(), 0);
}

#[tokio::test]
async fn test_failed_create_keeps_form_data() {
    let mut harness = Harness::start("/").await;
    harness.open_dashboard("acme").await;

    harness.send(Action::OpenCreateFromSelected).await;
    harness.send(Action::CycleIssueType { forward: false }).await;
    harness.send(Action::NextField).await;
    harness.type_text("Needs callback").await;

    harness.backend.set_failure(Some("permission denied for function create_ticket"));
    harness.send(Action::Submit).await;

    let dash = harness.state.dashboard().unwrap();
    let form = dash.modal.form().expect("modal stays open");
    assert!(!dash.modal.is_submitting());
    assert_eq!(form.form.description, "Needs callback");
    assert!(form.error.is_some());
    assert_eq!(harness.backend.create_calls(), 1);
}

#[tokio::test]
async fn test_change_organization_returns_to_picker() {
    let mut harness = Harness::start("/").await;
    harness.open_dashboard("acme").await;

    harness.send(Action::ChangeOrganization).await;
    assert_eq!(harness.screen_name(), "organization-select");
    assert!(harness.ctx.require_selection().is_err());
}

#[tokio::test]
async fn test_sign_out_returns_to_login_and_forgets_tenant() {
    let mut harness = Harness::start("/").await;
    harness.open_dashboard("acme").await;

    harness.send(Action::SignOut).await;
    assert_eq!(harness.screen_name(), "login");
    assert!(harness.state.user.is_none());
    assert!(harness.ctx.user().is_none());
    assert!(harness.ctx.selection().load().unwrap().is_none());
}

#[tokio::test]
async fn test_diagnostics_reachable_before_sign_in() {
    let harness = Harness::start("/diagnostics").await;
    let Screen::Diagnostics(diag) = &harness.state.screen else {
        panic!("expected diagnostics, got {}", harness.screen_name());
    };
    assert!(!diag.loading);
    assert!(diag.report.is_some());
}
