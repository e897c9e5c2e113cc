//! Root component for `helpdesk ui`
//!
//! Owns the `AppState` and a queue of pending effects. Key events and effect
//! outcomes both go through `dispatch`, which runs the reducer and queues any
//! new effects; the queue is drained on the next render.

use std::sync::Arc;

use iocraft::prelude::*;

use super::effects::run_effect;
use super::keymap::key_to_action;
use super::model::{Action, AppState, Effect, Screen, reduce};
use crate::context::AppContext;
use crate::search::RequestTracker;
use crate::tui::components::{
    Footer, Header, create_modal_shortcuts, dashboard_shortcuts, diagnostics_shortcuts,
    login_shortcuts, org_select_shortcuts, render_toast, search_shortcuts,
};
use crate::tui::screens::{
    render_create_modal, render_dashboard, render_diagnostics, render_login, render_org_select,
};
use crate::tui::theme::{TenantPalette, theme};

/// Rows around the ticket list: header, search bar, list borders, toast and footer
const LIST_CHROME_ROWS: u16 = 8;

#[derive(Default, Props)]
pub struct HelpdeskAppProps {
    pub context: Option<Arc<AppContext>>,
    /// Location to resolve on startup
    pub initial_path: String,
}

fn dispatch(state: &mut State<AppState>, pending: &mut State<Vec<Effect>>, action: Action) {
    let current = state.read().clone();
    let (next, effects) = reduce(current, action);
    state.set(next);
    if !effects.is_empty() {
        pending.write().extend(effects);
    }
}

#[component]
pub fn HelpdeskApp(props: &HelpdeskAppProps, mut hooks: Hooks) -> impl Into<AnyElement<'static>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let theme = theme();

    let debounce = props
        .context
        .as_ref()
        .map(|ctx| ctx.config.search_debounce())
        .unwrap_or_default();
    let mut state = hooks.use_state(|| AppState::new(&props.initial_path, debounce));
    let mut pending: State<Vec<Effect>> = hooks.use_state(Vec::new);
    let tracker = hooks.use_state(|| Arc::new(RequestTracker::new()));
    let mut started = hooks.use_state(|| false);

    let effect_handler: Handler<Effect> = hooks.use_async_handler({
        let ctx = props.context.clone();
        let tracker = tracker.read().clone();
        move |effect: Effect| {
            let ctx = ctx.clone();
            let tracker = tracker.clone();
            let mut state = state;
            let mut pending = pending;
            async move {
                let Some(ctx) = ctx else {
                    return;
                };
                if let Some(action) = run_effect(&ctx, &tracker, effect).await {
                    dispatch(&mut state, &mut pending, action);
                }
            }
        }
    });

    hooks.use_terminal_events({
        move |event| match event {
            TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) if kind != KeyEventKind::Release => {
                let action = key_to_action(code, modifiers, &state.read());
                if let Some(action) = action {
                    dispatch(&mut state, &mut pending, action);
                }
            }
            _ => {}
        }
    });

    if !started.get() {
        started.set(true);
        let initial = state.read().initial_effects();
        pending.write().extend(initial);
    }

    let list_rows = (height.saturating_sub(LIST_CHROME_ROWS) as usize).max(1);
    if state.read().list_height != list_rows {
        dispatch(&mut state, &mut pending, Action::Resize(list_rows));
    }

    if !pending.read().is_empty() {
        let queued = std::mem::take(&mut *pending.write());
        for effect in queued {
            effect_handler(effect);
        }
    }

    if state.read().should_exit {
        system.exit();
    }

    let app = state.read();
    let user = app.user.as_ref().map(|u| u.email.clone());
    let mut subtitle = None;
    let mut ticket_count = None;
    let mut background = None;
    let mut modal = None;

    let (body, shortcuts) = match &app.screen {
        Screen::Loading => (
            element! {
                View(flex_grow: 1.0, justify_content: JustifyContent::Center, align_items: AlignItems::Center) {
                    Text(content: "Loading...", color: theme.text_dimmed)
                }
            }
            .into_any(),
            Vec::new(),
        ),
        Screen::Login(login) => (render_login(login), login_shortcuts()),
        Screen::OrganizationSelect(orgs) => {
            subtitle = Some("Organizations".to_string());
            (render_org_select(orgs, list_rows), org_select_shortcuts())
        }
        Screen::Dashboard(dash) => {
            let palette = TenantPalette::from(dash.theme);
            subtitle = Some(dash.organization.name.clone());
            ticket_count = Some(dash.tickets.len());
            background = Some(palette.primary);
            modal = dash.modal.form().map(|form| {
                render_create_modal(form, dash.modal.is_submitting(), &dash.organization.name)
            });
            let shortcuts = if dash.modal.is_open() {
                create_modal_shortcuts()
            } else if dash.search_focused {
                search_shortcuts()
            } else {
                dashboard_shortcuts()
            };
            (render_dashboard(dash, list_rows), shortcuts)
        }
        Screen::Diagnostics(diag) => {
            subtitle = Some("Diagnostics".to_string());
            (render_diagnostics(diag), diagnostics_shortcuts())
        }
    };
    let toast = render_toast(app.toast.as_ref());

    element! {
        View(
            width,
            height,
            flex_direction: FlexDirection::Column,
            background_color: theme.background,
        ) {
            Header(
                subtitle: subtitle,
                ticket_count: ticket_count,
                user: user,
                background: background,
            )
            View(flex_grow: 1.0, width: 100pct, flex_direction: FlexDirection::Column) {
                #(Some(body))
            }
            #(toast)
            Footer(shortcuts: shortcuts)
            #(modal)
        }
    }
}
