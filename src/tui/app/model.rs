//! Application model for the interactive client
//!
//! `AppState` is plain data and `reduce` is a pure function over it, so every
//! screen transition can be unit tested without iocraft. Anything that needs
//! the network, storage or the clipboard comes back out of `reduce` as an
//! `Effect`; the component runs it and feeds the outcome back in as an
//! `Action`.

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;

use crate::create::{CREATED_MESSAGE, CreateModal, FormField, TicketForm};
use crate::diagnostics::DiagnosticsReport;
use crate::router::{DIAGNOSTICS_PATH, ROOT_PATH, Resolution, View};
use crate::search::{RequestId, TicketQuery};
use crate::tui::components::toast::{Toast, ToastLevel};
use crate::tui::search::{FilteredOrganization, filter_organizations};
use crate::types::{IssueType, Organization, TenantTheme, Ticket, TicketStatus, User};

pub const ORGANIZATIONS_FAILED: &str = "Failed to load organizations. Please try again later.";
pub const TICKETS_FAILED: &str = "Error fetching tickets";

/// How long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Rows available to the ticket list before the first resize arrives
pub const DEFAULT_LIST_HEIGHT: usize = 20;

/// Password typed into the login form.
///
/// Kept out of `Debug` output so state dumps never leak it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn push(&mut self, c: char) {
        self.0.push(c);
    }

    pub fn pop(&mut self) {
        self.0.pop();
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_secret(self) -> SecretString {
        SecretString::from(self.0)
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Password(value.to_string())
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

impl LoginField {
    fn toggle(self) -> Self {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginState {
    pub email: String,
    pub password: Password,
    pub focus: LoginField,
    /// Inline authentication error
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgSelectState {
    pub organizations: Vec<Organization>,
    pub loading: bool,
    pub filter: String,
    /// Index into the filtered list
    pub selected: usize,
    /// Non-fatal directory error
    pub banner: Option<String>,
    pub selecting: bool,
}

impl OrgSelectState {
    pub fn visible(&self) -> Vec<FilteredOrganization> {
        filter_organizations(&self.organizations, &self.filter)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub organization: Organization,
    pub theme: TenantTheme,
    pub tickets: Vec<Ticket>,
    /// A list request is in flight
    pub loading: bool,
    pub search: String,
    pub search_focused: bool,
    pub status: Option<TicketStatus>,
    pub selected: usize,
    pub scroll_offset: usize,
    /// Id of the latest list request; responses for any other id are stale
    pub request: RequestId,
    pub modal: CreateModal,
}

impl DashboardState {
    pub fn new(organization: Organization) -> Self {
        Self {
            theme: organization.theme(),
            organization,
            tickets: Vec::new(),
            loading: true,
            search: String::new(),
            search_focused: false,
            status: None,
            selected: 0,
            scroll_offset: 0,
            request: 0,
            modal: CreateModal::Closed,
        }
    }

    pub fn query(&self) -> TicketQuery {
        TicketQuery::new(self.organization.id.clone())
            .with_text(&self.search)
            .with_status(self.status)
    }

    pub fn selected_ticket(&self) -> Option<&Ticket> {
        self.tickets.get(self.selected)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiagnosticsState {
    pub report: Option<DiagnosticsReport>,
    pub loading: bool,
}

#[derive(Debug, Clone, Default)]
pub enum Screen {
    /// Before the first route resolves
    #[default]
    Loading,
    Login(LoginState),
    OrganizationSelect(OrgSelectState),
    Dashboard(Box<DashboardState>),
    Diagnostics(DiagnosticsState),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub location: String,
    pub screen: Screen,
    pub user: Option<User>,
    pub toast: Option<Toast>,
    pub toast_seq: u64,
    pub request_seq: RequestId,
    pub list_height: usize,
    /// Delay applied to list requests triggered by typing
    pub debounce: Duration,
    pub should_exit: bool,
}

impl AppState {
    pub fn new(path: &str, debounce: Duration) -> Self {
        Self {
            location: path.to_string(),
            screen: Screen::Loading,
            user: None,
            toast: None,
            toast_seq: 0,
            request_seq: 0,
            list_height: DEFAULT_LIST_HEIGHT,
            debounce,
            should_exit: false,
        }
    }

    /// Effects that resolve the first route.
    pub fn initial_effects(&self) -> Vec<Effect> {
        vec![Effect::Navigate(self.location.clone())]
    }

    pub fn dashboard(&self) -> Option<&DashboardState> {
        match &self.screen {
            Screen::Dashboard(dash) => Some(dash),
            _ => None,
        }
    }
}

/// Work the component performs on behalf of the model
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Resolve a location against the current session and selection
    Navigate(String),
    SignIn { email: String, password: Password },
    SignOut,
    LoadOrganizations,
    SelectOrganization(Organization),
    ChangeOrganization,
    VerifyTenant(String),
    FetchTickets {
        request: RequestId,
        query: TicketQuery,
        debounce: Duration,
    },
    CreateTicket {
        form: TicketForm,
        organization: Organization,
    },
    CopyToClipboard(String),
    LoadDiagnostics,
    /// Clear the toast with this sequence number once it has been shown
    ExpireToast(u64),
}

#[derive(Debug, Clone)]
pub enum Action {
    // Input
    Quit,
    Input(char),
    Backspace,
    NextField,
    PrevField,
    Submit,
    Cancel,
    MoveUp,
    MoveDown,
    GoToTop,
    GoToBottom,
    FocusSearch,
    CycleStatusFilter,
    Refresh,
    OpenCreate,
    OpenCreateFromSelected,
    CycleIssueType { forward: bool },
    CopySelected,
    ChangeOrganization,
    SignOut,
    OpenDiagnostics,
    Resize(usize),
    ToastExpired(u64),

    // Effect outcomes
    Navigated {
        requested: String,
        resolution: Resolution,
        user: Option<User>,
    },
    SignInFinished(Result<User, String>),
    OrganizationsLoaded(Result<Vec<Organization>, String>),
    OrganizationSelected(Result<String, String>),
    TenantVerified(Result<Organization, String>),
    TicketsLoaded {
        request: RequestId,
        result: Result<Vec<Ticket>, String>,
    },
    TicketCreated(Result<Ticket, String>),
    DiagnosticsLoaded(DiagnosticsReport),
    Copied(Result<String, String>),
    Failed(String),
}

/// Keep `selected` visible inside a window of `height` rows.
pub fn adjust_scroll(offset: usize, selected: usize, height: usize, total: usize) -> usize {
    if height == 0 || total == 0 {
        return 0;
    }
    let offset = if selected < offset {
        selected
    } else if selected >= offset + height {
        selected + 1 - height
    } else {
        offset
    };
    offset.min(total.saturating_sub(height))
}

fn next_status(status: Option<TicketStatus>) -> Option<TicketStatus> {
    match status {
        None => Some(TicketStatus::Open),
        Some(TicketStatus::Open) => Some(TicketStatus::InProgress),
        Some(TicketStatus::InProgress) => Some(TicketStatus::Closed),
        Some(TicketStatus::Closed) => None,
    }
}

fn cycle_issue_type(current: Option<IssueType>, forward: bool) -> IssueType {
    match current {
        Some(t) => t.cycle(forward),
        None if forward => IssueType::ALL[0],
        None => IssueType::ALL[IssueType::ALL.len() - 1],
    }
}

fn show_toast(state: &mut AppState, message: impl Into<String>, level: ToastLevel) -> Effect {
    state.toast_seq += 1;
    state.toast = Some(Toast::new(message, level, state.toast_seq));
    Effect::ExpireToast(state.toast_seq)
}

/// Issue a new list request for the dashboard, if one is showing.
fn refetch(state: &mut AppState, debounce: Duration) -> Option<Effect> {
    let Screen::Dashboard(dash) = &mut state.screen else {
        return None;
    };
    state.request_seq += 1;
    dash.request = state.request_seq;
    dash.loading = true;
    Some(Effect::FetchTickets {
        request: dash.request,
        query: dash.query(),
        debounce,
    })
}

fn move_selection(dash: &mut DashboardState, selected: usize, height: usize) {
    let total = dash.tickets.len();
    dash.selected = selected.min(total.saturating_sub(1));
    dash.scroll_offset = adjust_scroll(dash.scroll_offset, dash.selected, height, total);
}

/// Apply one action. Returns the new state and the effects to run.
pub fn reduce(mut state: AppState, action: Action) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();
    let height = state.list_height;
    let debounce = state.debounce;

    match action {
        Action::Quit => state.should_exit = true,

        Action::Input(c) => {
            let mut search_changed = false;
            match &mut state.screen {
                Screen::Login(login) if !login.submitting => match login.focus {
                    LoginField::Email => login.email.push(c),
                    LoginField::Password => login.password.push(c),
                },
                Screen::OrganizationSelect(orgs) => {
                    orgs.filter.push(c);
                    orgs.selected = 0;
                }
                Screen::Dashboard(dash) => {
                    if let Some(modal) = dash.modal.editing_mut() {
                        let focus = modal.focus;
                        if let Some(text) = modal.form.text_mut(focus) {
                            text.push(c);
                            modal.field_errors.retain(|e| e.field != focus);
                        }
                    } else if dash.search_focused {
                        dash.search.push(c);
                        search_changed = true;
                    }
                }
                _ => {}
            }
            if search_changed {
                effects.extend(refetch(&mut state, debounce));
            }
        }

        Action::Backspace => {
            let mut search_changed = false;
            match &mut state.screen {
                Screen::Login(login) if !login.submitting => match login.focus {
                    LoginField::Email => {
                        login.email.pop();
                    }
                    LoginField::Password => login.password.pop(),
                },
                Screen::OrganizationSelect(orgs) => {
                    orgs.filter.pop();
                    orgs.selected = 0;
                }
                Screen::Dashboard(dash) => {
                    if let Some(modal) = dash.modal.editing_mut() {
                        let focus = modal.focus;
                        if let Some(text) = modal.form.text_mut(focus) {
                            text.pop();
                        }
                    } else if dash.search_focused {
                        search_changed = dash.search.pop().is_some();
                    }
                }
                _ => {}
            }
            if search_changed {
                effects.extend(refetch(&mut state, debounce));
            }
        }

        Action::NextField | Action::PrevField => {
            let forward = matches!(action, Action::NextField);
            match &mut state.screen {
                Screen::Login(login) => login.focus = login.focus.toggle(),
                Screen::Dashboard(dash) => {
                    if let Some(modal) = dash.modal.editing_mut() {
                        modal.focus = if forward {
                            modal.focus.next()
                        } else {
                            modal.focus.prev()
                        };
                    }
                }
                _ => {}
            }
        }

        Action::Submit => match &mut state.screen {
            Screen::Login(login) if !login.submitting => {
                login.submitting = true;
                login.error = None;
                effects.push(Effect::SignIn {
                    email: login.email.clone(),
                    password: login.password.clone(),
                });
            }
            Screen::OrganizationSelect(orgs) if !orgs.selecting => {
                if let Some(choice) = orgs.visible().into_iter().nth(orgs.selected) {
                    orgs.selecting = true;
                    effects.push(Effect::SelectOrganization(choice.organization));
                }
            }
            Screen::Dashboard(dash) => {
                if dash.modal.is_open() {
                    if let Some(form) = dash.modal.begin_submit() {
                        effects.push(Effect::CreateTicket {
                            form,
                            organization: dash.organization.clone(),
                        });
                    }
                } else if dash.search_focused {
                    dash.search_focused = false;
                }
            }
            _ => {}
        },

        Action::Cancel => {
            let mut search_cleared = false;
            match &mut state.screen {
                Screen::OrganizationSelect(orgs) => {
                    orgs.filter.clear();
                    orgs.selected = 0;
                }
                Screen::Dashboard(dash) => {
                    if dash.modal.is_open() {
                        dash.modal.cancel();
                    } else if dash.search_focused {
                        dash.search_focused = false;
                        search_cleared = !dash.search.is_empty();
                        dash.search.clear();
                    }
                }
                Screen::Diagnostics(_) => effects.push(Effect::Navigate(ROOT_PATH.to_string())),
                _ => {}
            }
            if search_cleared {
                effects.extend(refetch(&mut state, Duration::ZERO));
            }
        }

        Action::MoveUp | Action::MoveDown | Action::GoToTop | Action::GoToBottom => {
            match &mut state.screen {
                Screen::OrganizationSelect(orgs) => {
                    let last = orgs.visible().len().saturating_sub(1);
                    orgs.selected = match action {
                        Action::MoveUp => orgs.selected.saturating_sub(1),
                        Action::MoveDown => (orgs.selected + 1).min(last),
                        Action::GoToTop => 0,
                        _ => last,
                    };
                }
                Screen::Dashboard(dash) if !dash.modal.is_open() && !dash.search_focused => {
                    let target = match action {
                        Action::MoveUp => dash.selected.saturating_sub(1),
                        Action::MoveDown => dash.selected + 1,
                        Action::GoToTop => 0,
                        _ => dash.tickets.len().saturating_sub(1),
                    };
                    move_selection(dash, target, height);
                }
                _ => {}
            }
        }

        Action::FocusSearch => {
            if let Screen::Dashboard(dash) = &mut state.screen
                && !dash.modal.is_open()
            {
                dash.search_focused = true;
            }
        }

        Action::CycleStatusFilter => {
            if let Screen::Dashboard(dash) = &mut state.screen
                && !dash.modal.is_open()
            {
                dash.status = next_status(dash.status);
                effects.extend(refetch(&mut state, Duration::ZERO));
            }
        }

        Action::Refresh => match &mut state.screen {
            Screen::OrganizationSelect(orgs) => {
                orgs.loading = true;
                orgs.banner = None;
                effects.push(Effect::LoadOrganizations);
            }
            Screen::Diagnostics(diag) => {
                diag.loading = true;
                effects.push(Effect::LoadDiagnostics);
            }
            Screen::Dashboard(_) | Screen::Login(_) | Screen::Loading => {
                effects.extend(refetch(&mut state, Duration::ZERO));
            }
        },

        Action::OpenCreate | Action::OpenCreateFromSelected => {
            if let Screen::Dashboard(dash) = &mut state.screen
                && !dash.modal.is_open()
            {
                dash.modal = match (&action, dash.selected_ticket()) {
                    (Action::OpenCreateFromSelected, Some(ticket)) => {
                        CreateModal::open_from_ticket(ticket)
                    }
                    _ => CreateModal::open_blank(),
                };
                dash.search_focused = false;
            }
        }

        Action::CycleIssueType { forward } => {
            if let Screen::Dashboard(dash) = &mut state.screen
                && let Some(modal) = dash.modal.editing_mut()
                && modal.focus == FormField::IssueType
            {
                modal.form.issue_type = Some(cycle_issue_type(modal.form.issue_type, forward));
                modal.field_errors.retain(|e| e.field != FormField::IssueType);
            }
        }

        Action::CopySelected => {
            if let Some(ticket) = state.dashboard().and_then(|d| d.selected_ticket()) {
                effects.push(Effect::CopyToClipboard(ticket.ticket_no.clone()));
            }
        }

        Action::ChangeOrganization => {
            if matches!(state.screen, Screen::Dashboard(_)) {
                effects.push(Effect::ChangeOrganization);
            }
        }

        Action::SignOut => {
            if state.user.is_some() {
                effects.push(Effect::SignOut);
            }
        }

        Action::OpenDiagnostics => effects.push(Effect::Navigate(DIAGNOSTICS_PATH.to_string())),

        Action::Resize(rows) => {
            state.list_height = rows.max(1);
            if let Screen::Dashboard(dash) = &mut state.screen {
                let selected = dash.selected;
                move_selection(dash, selected, rows.max(1));
            }
        }

        Action::ToastExpired(seq) => {
            if state.toast.as_ref().is_some_and(|t| t.seq == seq) {
                state.toast = None;
            }
        }

        Action::Navigated {
            requested,
            resolution,
            user,
        } => {
            state.location = resolution.location(&requested).to_string();
            state.user = user;
            match resolution.view {
                View::Login => state.screen = Screen::Login(LoginState::default()),
                View::OrganizationSelect => {
                    state.screen = Screen::OrganizationSelect(OrgSelectState {
                        loading: true,
                        ..Default::default()
                    });
                    effects.push(Effect::LoadOrganizations);
                }
                View::Dashboard(org) => {
                    let already_showing = state
                        .dashboard()
                        .is_some_and(|d| d.organization.id == org.id);
                    if !already_showing {
                        effects.push(Effect::VerifyTenant(org.slug.clone()));
                        state.screen = Screen::Dashboard(Box::new(DashboardState::new(org)));
                        effects.extend(refetch(&mut state, Duration::ZERO));
                    }
                }
                View::Diagnostics => {
                    state.screen = Screen::Diagnostics(DiagnosticsState {
                        report: None,
                        loading: true,
                    });
                    effects.push(Effect::LoadDiagnostics);
                }
            }
        }

        Action::SignInFinished(result) => match result {
            Ok(user) => {
                state.user = Some(user);
                effects.push(Effect::Navigate(state.location.clone()));
            }
            Err(message) => {
                if let Screen::Login(login) = &mut state.screen {
                    login.submitting = false;
                    login.error = Some(message);
                }
            }
        },

        Action::OrganizationsLoaded(result) => {
            if let Screen::OrganizationSelect(orgs) = &mut state.screen {
                orgs.loading = false;
                orgs.selected = 0;
                match result {
                    Ok(list) => {
                        orgs.organizations = list;
                        orgs.banner = None;
                    }
                    Err(_) => {
                        orgs.organizations.clear();
                        orgs.banner = Some(ORGANIZATIONS_FAILED.to_string());
                    }
                }
            }
        }

        Action::OrganizationSelected(result) => {
            if let Screen::OrganizationSelect(orgs) = &mut state.screen {
                orgs.selecting = false;
            }
            match result {
                Ok(path) => effects.push(Effect::Navigate(path)),
                Err(message) => effects.push(show_toast(&mut state, message, ToastLevel::Error)),
            }
        }

        Action::TenantVerified(result) => {
            if let Screen::Dashboard(dash) = &mut state.screen {
                match result {
                    Ok(org) if org.id == dash.organization.id => {
                        dash.theme = org.theme();
                        dash.organization = org;
                    }
                    Ok(_) => {}
                    // Selection is already cleared; fall back to the picker
                    Err(_) => effects.push(Effect::Navigate(ROOT_PATH.to_string())),
                }
            }
        }

        Action::TicketsLoaded { request, result } => {
            let mut failed = false;
            if let Screen::Dashboard(dash) = &mut state.screen
                && dash.request == request
            {
                dash.loading = false;
                match result {
                    Ok(tickets) => {
                        dash.tickets = tickets;
                        let selected = dash.selected;
                        move_selection(dash, selected, height);
                    }
                    Err(_) => failed = true,
                }
            }
            if failed {
                effects.push(show_toast(&mut state, TICKETS_FAILED, ToastLevel::Error));
            }
        }

        Action::TicketCreated(result) => {
            if let Screen::Dashboard(dash) = &mut state.screen {
                match result {
                    Ok(_) => {
                        dash.modal.submit_succeeded();
                        effects.push(show_toast(&mut state, CREATED_MESSAGE, ToastLevel::Success));
                        effects.extend(refetch(&mut state, Duration::ZERO));
                    }
                    Err(message) => {
                        dash.modal.submit_failed(message.clone());
                        effects.push(show_toast(&mut state, message, ToastLevel::Error));
                    }
                }
            }
        }

        Action::DiagnosticsLoaded(report) => {
            if let Screen::Diagnostics(diag) = &mut state.screen {
                diag.report = Some(report);
                diag.loading = false;
            }
        }

        Action::Copied(result) => {
            let effect = match result {
                Ok(text) => show_toast(&mut state, format!("Copied {text}"), ToastLevel::Info),
                Err(message) => show_toast(&mut state, message, ToastLevel::Error),
            };
            effects.push(effect);
        }

        Action::Failed(message) => {
            if let Screen::OrganizationSelect(orgs) = &mut state.screen {
                orgs.selecting = false;
            }
            effects.push(show_toast(&mut state, message, ToastLevel::Error));
        }
    }

    (state, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;

    fn org(slug: &str) -> Organization {
        Organization {
            id: format!("org-{slug}"),
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            primary_color: Some("#112233".to_string()),
            secondary_color: None,
            accent_color: None,
            logo_url: None,
        }
    }

    fn ticket(no: &str) -> Ticket {
        Ticket {
            id: no.to_lowercase(),
            ticket_no: no.to_string(),
            client_file_no: "CF-1".to_string(),
            mobile_no: "555-0199".to_string(),
            name_of_client: "Jane Roe".to_string(),
            issue_type: IssueType::Billing,
            description: "desc".to_string(),
            status: TicketStatus::Open,
            created_on: Timestamp::UNIX_EPOCH,
            organization_id: "org-acme".to_string(),
            assignee: None,
            opened_by: None,
        }
    }

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            email: "staff@example.com".to_string(),
        }
    }

    fn navigated(path: &str, view: View) -> Action {
        Action::Navigated {
            requested: path.to_string(),
            resolution: Resolution {
                view,
                redirect: None,
            },
            user: Some(user()),
        }
    }

    fn dashboard_state() -> AppState {
        let state = AppState::new("/acme", Duration::from_millis(250));
        let (state, _) = reduce(state, navigated("/acme", View::Dashboard(org("acme"))));
        state
    }

    fn loaded(state: AppState, tickets: Vec<Ticket>) -> AppState {
        let request = state.dashboard().map(|d| d.request).unwrap_or_default();
        reduce(
            state,
            Action::TicketsLoaded {
                request,
                result: Ok(tickets),
            },
        )
        .0
    }

    #[test]
    fn test_start_navigates_to_requested_path() {
        let state = AppState::new("/acme", Duration::ZERO);
        assert!(matches!(state.screen, Screen::Loading));
        assert_eq!(state.initial_effects(), vec![Effect::Navigate("/acme".to_string())]);
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::from("hunter2");
        assert!(!format!("{password:?}").contains("hunter2"));
        assert_eq!(password.len(), 7);
    }

    #[test]
    fn test_adjust_scroll() {
        assert_eq!(adjust_scroll(0, 0, 5, 20), 0);
        assert_eq!(adjust_scroll(0, 5, 5, 20), 1);
        assert_eq!(adjust_scroll(10, 3, 5, 20), 3);
        assert_eq!(adjust_scroll(0, 19, 5, 20), 15);
        assert_eq!(adjust_scroll(4, 0, 0, 20), 0);
        assert_eq!(adjust_scroll(3, 1, 5, 3), 0);
    }

    #[test]
    fn test_dashboard_mount_verifies_tenant_and_fetches() {
        let state = AppState::new("/acme", Duration::from_millis(250));
        let (state, effects) = reduce(state, navigated("/acme", View::Dashboard(org("acme"))));
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0], Effect::VerifyTenant("acme".to_string()));
        match &effects[1] {
            Effect::FetchTickets {
                request,
                query,
                debounce,
            } => {
                assert_eq!(*request, 1);
                assert_eq!(query.organization_id, "org-acme");
                assert_eq!(query.text, None);
                assert_eq!(*debounce, Duration::ZERO);
            }
            other => panic!("unexpected effect {other:?}"),
        }
        assert_eq!(state.location, "/acme");
    }

    #[test]
    fn test_redirect_updates_location() {
        let state = AppState::new("/globex", Duration::ZERO);
        let (state, _) = reduce(
            state,
            Action::Navigated {
                requested: "/globex".to_string(),
                resolution: Resolution {
                    view: View::Dashboard(org("acme")),
                    redirect: Some("/acme".to_string()),
                },
                user: Some(user()),
            },
        );
        assert_eq!(state.location, "/acme");
    }

    #[test]
    fn test_typing_in_search_issues_debounced_request() {
        let state = dashboard_state();
        let (state, _) = reduce(state, Action::FocusSearch);
        let (state, effects) = reduce(state, Action::Input('5'));
        let (state, effects2) = reduce(state, Action::Input('5'));

        assert!(matches!(
            &effects[0],
            Effect::FetchTickets { request: 2, debounce, .. } if *debounce == Duration::from_millis(250)
        ));
        match &effects2[0] {
            Effect::FetchTickets { request, query, .. } => {
                assert_eq!(*request, 3);
                assert_eq!(query.text.as_deref(), Some("55"));
            }
            other => panic!("unexpected effect {other:?}"),
        }
        assert_eq!(state.dashboard().map(|d| d.request), Some(3));
    }

    #[test]
    fn test_stale_ticket_response_is_dropped() {
        let state = dashboard_state();
        let (state, _) = reduce(state, Action::Refresh);
        // Request 1 is now stale
        let (state, _) = reduce(
            state,
            Action::TicketsLoaded {
                request: 1,
                result: Ok(vec![ticket("TKT-0001")]),
            },
        );
        let dash = state.dashboard().unwrap();
        assert!(dash.tickets.is_empty());
        assert!(dash.loading);

        let state = loaded(state, vec![ticket("TKT-0002")]);
        let dash = state.dashboard().unwrap();
        assert_eq!(dash.tickets[0].ticket_no, "TKT-0002");
        assert!(!dash.loading);
    }

    #[test]
    fn test_fetch_error_keeps_previous_results() {
        let state = loaded(dashboard_state(), vec![ticket("TKT-0001")]);
        let (state, _) = reduce(state, Action::Refresh);
        let request = state.dashboard().unwrap().request;
        let (state, effects) = reduce(
            state,
            Action::TicketsLoaded {
                request,
                result: Err("boom".to_string()),
            },
        );
        assert_eq!(state.dashboard().unwrap().tickets.len(), 1);
        assert_eq!(state.toast.as_ref().map(|t| t.message.as_str()), Some(TICKETS_FAILED));
        assert_eq!(effects, vec![Effect::ExpireToast(state.toast_seq)]);
    }

    #[test]
    fn test_escape_in_search_clears_and_refetches() {
        let state = dashboard_state();
        let (state, _) = reduce(state, Action::FocusSearch);
        let (state, _) = reduce(state, Action::Input('x'));
        let (state, effects) = reduce(state, Action::Cancel);
        let dash = state.dashboard().unwrap();
        assert!(!dash.search_focused);
        assert!(dash.search.is_empty());
        assert!(matches!(
            &effects[0],
            Effect::FetchTickets { query, debounce, .. } if query.text.is_none() && debounce.is_zero()
        ));
    }

    #[test]
    fn test_status_filter_cycles_through_all() {
        let mut state = dashboard_state();
        let mut seen = Vec::new();
        for _ in 0..4 {
            state = reduce(state, Action::CycleStatusFilter).0;
            seen.push(state.dashboard().unwrap().status);
        }
        assert_eq!(
            seen,
            vec![
                Some(TicketStatus::Open),
                Some(TicketStatus::InProgress),
                Some(TicketStatus::Closed),
                None
            ]
        );
    }

    #[test]
    fn test_navigation_clamps_to_list() {
        let state = loaded(
            dashboard_state(),
            vec![ticket("TKT-0003"), ticket("TKT-0002"), ticket("TKT-0001")],
        );
        let (state, _) = reduce(state, Action::GoToBottom);
        assert_eq!(state.dashboard().unwrap().selected, 2);
        let (state, _) = reduce(state, Action::MoveDown);
        assert_eq!(state.dashboard().unwrap().selected, 2);
        let (state, _) = reduce(state, Action::GoToTop);
        let (state, _) = reduce(state, Action::MoveUp);
        assert_eq!(state.dashboard().unwrap().selected, 0);
    }

    fn fill_form(mut state: AppState) -> AppState {
        for field in [FormField::ClientFileNo, FormField::MobileNo, FormField::NameOfClient] {
            for c in "abc".chars() {
                state = reduce(state, Action::Input(c)).0;
            }
            let focus = state.dashboard().and_then(|d| d.modal.form()).map(|m| m.focus);
            assert_eq!(focus, Some(field));
            state = reduce(state, Action::NextField).0;
        }
        state = reduce(state, Action::CycleIssueType { forward: true }).0;
        state = reduce(state, Action::NextField).0;
        for c in "printer jammed".chars() {
            state = reduce(state, Action::Input(c)).0;
        }
        state
    }

    #[test]
    fn test_create_flow_success_closes_modal_and_refetches() {
        let state = dashboard_state();
        let (state, _) = reduce(state, Action::OpenCreate);
        let state = fill_form(state);
        let (state, effects) = reduce(state, Action::Submit);
        assert_eq!(effects.len(), 1);
        let Effect::CreateTicket { form, organization } = &effects[0] else {
            panic!("expected create effect, got {effects:?}");
        };
        assert_eq!(form.issue_type, Some(IssueType::ALL[0]));
        assert_eq!(form.description, "printer jammed");
        assert_eq!(organization.slug, "acme");

        // A second submit while in flight does nothing
        let (state, again) = reduce(state, Action::Submit);
        assert!(again.is_empty());
        assert!(state.dashboard().unwrap().modal.is_submitting());

        let (state, effects) = reduce(state, Action::TicketCreated(Ok(ticket("TKT-0006"))));
        assert!(!state.dashboard().unwrap().modal.is_open());
        assert_eq!(state.toast.as_ref().map(|t| t.message.as_str()), Some(CREATED_MESSAGE));
        assert!(effects.iter().any(|e| matches!(e, Effect::FetchTickets { .. })));
    }

    #[test]
    fn test_create_with_empty_description_makes_no_call() {
        let state = dashboard_state();
        let (mut state, _) = reduce(state, Action::OpenCreate);
        for _ in 0..3 {
            state = reduce(state, Action::Input('x')).0;
            state = reduce(state, Action::NextField).0;
        }
        state = reduce(state, Action::CycleIssueType { forward: false }).0;
        let (state, effects) = reduce(state, Action::Submit);
        assert!(effects.is_empty());
        let modal = state.dashboard().unwrap().modal.form().cloned().unwrap();
        assert_eq!(modal.focus, FormField::Description);
        assert!(modal.field_error(FormField::Description).is_some());
    }

    #[test]
    fn test_create_failure_keeps_form() {
        let state = dashboard_state();
        let (state, _) = reduce(state, Action::OpenCreate);
        let state = fill_form(state);
        let (state, _) = reduce(state, Action::Submit);
        let (state, _) = reduce(state, Action::TicketCreated(Err("duplicate".to_string())));
        let dash = state.dashboard().unwrap();
        let modal = dash.modal.form().unwrap();
        assert!(!dash.modal.is_submitting());
        assert_eq!(modal.error.as_deref(), Some("duplicate"));
        assert_eq!(modal.form.description, "printer jammed");
        assert_eq!(state.toast.as_ref().map(|t| t.level), Some(ToastLevel::Error));
    }

    #[test]
    fn test_open_from_selected_prefills_client() {
        let state = loaded(dashboard_state(), vec![ticket("TKT-0001")]);
        let (state, _) = reduce(state, Action::OpenCreateFromSelected);
        let modal = state.dashboard().unwrap().modal.form().cloned().unwrap();
        assert_eq!(modal.form.name_of_client, "Jane Roe");
        assert_eq!(modal.form.mobile_no, "555-0199");
        assert_eq!(modal.focus, FormField::IssueType);
    }

    #[test]
    fn test_failed_tenant_verification_returns_to_picker() {
        let state = dashboard_state();
        let (_, effects) = reduce(state, Action::TenantVerified(Err("not found".to_string())));
        assert_eq!(effects, vec![Effect::Navigate(ROOT_PATH.to_string())]);
    }

    #[test]
    fn test_tenant_verification_refreshes_theme() {
        let state = dashboard_state();
        let mut fresh = org("acme");
        fresh.primary_color = Some("#abcdef".to_string());
        let (state, _) = reduce(state, Action::TenantVerified(Ok(fresh.clone())));
        let dash = state.dashboard().unwrap();
        assert_eq!(dash.theme, fresh.theme());
    }

    #[test]
    fn test_login_submit_and_failure() {
        let state = AppState::new("/", Duration::ZERO);
        let (state, _) = reduce(
            state,
            Action::Navigated {
                requested: "/".to_string(),
                resolution: Resolution {
                    view: View::Login,
                    redirect: None,
                },
                user: None,
            },
        );
        let mut state = state;
        for c in "a@b.c".chars() {
            state = reduce(state, Action::Input(c)).0;
        }
        state = reduce(state, Action::NextField).0;
        state = reduce(state, Action::Input('p')).0;
        let (state, effects) = reduce(state, Action::Submit);
        assert_eq!(
            effects,
            vec![Effect::SignIn {
                email: "a@b.c".to_string(),
                password: Password::from("p"),
            }]
        );

        let (state, _) = reduce(state, Action::SignInFinished(Err("Invalid login".to_string())));
        let Screen::Login(login) = &state.screen else {
            panic!("expected login screen");
        };
        assert!(!login.submitting);
        assert_eq!(login.error.as_deref(), Some("Invalid login"));
        assert_eq!(login.email, "a@b.c");
    }

    #[test]
    fn test_sign_in_success_navigates_to_current_location() {
        let state = AppState::new("/acme", Duration::ZERO);
        let (state, effects) = reduce(state, Action::SignInFinished(Ok(user())));
        assert_eq!(state.user, Some(user()));
        assert_eq!(effects, vec![Effect::Navigate("/acme".to_string())]);
    }

    #[test]
    fn test_organization_load_failure_shows_banner() {
        let state = AppState::new("/", Duration::ZERO);
        let (state, effects) = reduce(state, navigated("/", View::OrganizationSelect));
        assert_eq!(effects, vec![Effect::LoadOrganizations]);
        let (state, _) = reduce(state, Action::OrganizationsLoaded(Err("503".to_string())));
        let Screen::OrganizationSelect(orgs) = &state.screen else {
            panic!("expected organization select");
        };
        assert_eq!(orgs.banner.as_deref(), Some(ORGANIZATIONS_FAILED));
        assert!(orgs.organizations.is_empty());
        assert!(!orgs.loading);
    }

    #[test]
    fn test_organization_filter_and_select() {
        let state = AppState::new("/", Duration::ZERO);
        let (state, _) = reduce(state, navigated("/", View::OrganizationSelect));
        let (mut state, _) = reduce(
            state,
            Action::OrganizationsLoaded(Ok(vec![org("acme"), org("globex")])),
        );
        for c in "glo".chars() {
            state = reduce(state, Action::Input(c)).0;
        }
        let (state, effects) = reduce(state, Action::Submit);
        assert_eq!(effects, vec![Effect::SelectOrganization(org("globex"))]);

        let (_, effects) = reduce(state, Action::OrganizationSelected(Ok("/globex".to_string())));
        assert_eq!(effects, vec![Effect::Navigate("/globex".to_string())]);
    }

    #[test]
    fn test_sign_out_lands_on_login() {
        let state = dashboard_state();
        let (state, effects) = reduce(state, Action::SignOut);
        assert_eq!(effects, vec![Effect::SignOut]);
        let (state, _) = reduce(
            state,
            Action::Navigated {
                requested: ROOT_PATH.to_string(),
                resolution: Resolution {
                    view: View::Login,
                    redirect: None,
                },
                user: None,
            },
        );
        assert!(matches!(state.screen, Screen::Login(_)));
        assert!(state.user.is_none());
    }

    #[test]
    fn test_toast_expiry_only_clears_matching_toast() {
        let state = dashboard_state();
        let (state, _) = reduce(state, Action::Failed("first".to_string()));
        let first = state.toast_seq;
        let (state, _) = reduce(state, Action::Failed("second".to_string()));
        let (state, _) = reduce(state, Action::ToastExpired(first));
        assert_eq!(state.toast.as_ref().map(|t| t.message.as_str()), Some("second"));
        let seq = state.toast_seq;
        let (state, _) = reduce(state, Action::ToastExpired(seq));
        assert!(state.toast.is_none());
    }

    #[test]
    fn test_diagnostics_escape_goes_home() {
        let state = AppState::new(DIAGNOSTICS_PATH, Duration::ZERO);
        let (state, effects) = reduce(state, navigated(DIAGNOSTICS_PATH, View::Diagnostics));
        assert_eq!(effects, vec![Effect::LoadDiagnostics]);
        let (_, effects) = reduce(state, Action::Cancel);
        assert_eq!(effects, vec![Effect::Navigate(ROOT_PATH.to_string())]);
    }
}
