//! Executes model effects against the application context

use clipboard_rs::Clipboard;

use super::model::{Action, Effect, TOAST_DURATION};
use crate::context::AppContext;
use crate::create::{failure_message, submit_ticket};
use crate::diagnostics::DiagnosticsReport;
use crate::router::ROOT_PATH;
use crate::search::RequestTracker;

/// Resolve `path` and report where the app ended up.
fn navigate(ctx: &AppContext, path: &str) -> Action {
    match ctx.resolve(path) {
        Ok(resolution) => {
            tracing::debug!(path, view = resolution.view.name(), redirect = ?resolution.redirect, "resolved route");
            Action::Navigated {
                requested: path.to_string(),
                resolution,
                user: ctx.user(),
            }
        }
        Err(e) => Action::Failed(e.user_message()),
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), String> {
    clipboard_rs::ClipboardContext::new()
        .and_then(|clipboard| clipboard.set_text(text.to_string()))
        .map_err(|e| format!("Clipboard unavailable: {e}"))
}

/// Run one effect to completion. `None` means there is nothing to report,
/// which happens when a debounced list request is superseded while waiting.
pub async fn run_effect(
    ctx: &AppContext,
    tracker: &RequestTracker,
    effect: Effect,
) -> Option<Action> {
    let action = match effect {
        Effect::Navigate(path) => navigate(ctx, &path),

        Effect::SignIn { email, password } => Action::SignInFinished(
            ctx.sign_in(&email, password.into_secret())
                .await
                .map_err(|e| e.user_message()),
        ),

        Effect::SignOut => match ctx.sign_out().await {
            Ok(()) => navigate(ctx, ROOT_PATH),
            Err(e) => Action::Failed(e.user_message()),
        },

        Effect::LoadOrganizations => {
            let result = ctx.directory().list_organizations().await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "failed to load organizations");
            }
            Action::OrganizationsLoaded(result.map_err(|e| e.user_message()))
        }

        Effect::SelectOrganization(org) => {
            Action::OrganizationSelected(ctx.select_organization(&org).map_err(|e| e.user_message()))
        }

        Effect::ChangeOrganization => match ctx.change_organization() {
            Ok(path) => navigate(ctx, &path),
            Err(e) => Action::Failed(e.user_message()),
        },

        Effect::VerifyTenant(slug) => {
            Action::TenantVerified(ctx.verify_tenant(&slug).await.map_err(|e| e.user_message()))
        }

        Effect::FetchTickets {
            request,
            query,
            debounce,
        } => {
            tracker.advance_to(request);
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
                if !tracker.is_current(request) {
                    tracing::trace!(request, "list request superseded during debounce");
                    return None;
                }
            }
            let result = ctx.tickets().list_tickets(&query).await;
            if let Err(e) = &result {
                tracing::warn!(request, error = %e, "ticket fetch failed");
            }
            Action::TicketsLoaded {
                request,
                result: result.map_err(|e| e.user_message()),
            }
        }

        Effect::CreateTicket { form, organization } => {
            let user = ctx.user();
            let result = submit_ticket(&form, &organization, user.as_ref(), ctx.tickets()).await;
            match result {
                Ok(ticket) => {
                    tracing::info!(ticket_no = %ticket.ticket_no, org = %organization.slug, "ticket created");
                    Action::TicketCreated(Ok(ticket))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "ticket creation failed");
                    Action::TicketCreated(Err(failure_message(&e)))
                }
            }
        }

        Effect::CopyToClipboard(text) => Action::Copied(copy_to_clipboard(&text).map(|()| text)),

        Effect::LoadDiagnostics => Action::DiagnosticsLoaded(DiagnosticsReport::collect(ctx).await),

        Effect::ExpireToast(seq) => {
            tokio::time::sleep(TOAST_DURATION).await;
            Action::ToastExpired(seq)
        }
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::backend::memory::{DEMO_EMAIL, DEMO_PASSWORD, MemoryBackend};
    use crate::config::Config;
    use crate::context::Backends;
    use crate::router::View;
    use crate::search::TicketQuery;
    use crate::tui::app::model::Password;

    fn context() -> (AppContext, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::seeded());
        let ctx = AppContext::with_backends(Config::default(), Backends::from_shared(backend.clone()));
        (ctx, backend)
    }

    #[tokio::test]
    async fn test_sign_in_then_navigate_root() {
        let (ctx, _) = context();
        let tracker = RequestTracker::new();
        let action = run_effect(
            &ctx,
            &tracker,
            Effect::SignIn {
                email: DEMO_EMAIL.to_string(),
                password: Password::from(DEMO_PASSWORD),
            },
        )
        .await;
        assert!(matches!(action, Some(Action::SignInFinished(Ok(_)))));

        let action = run_effect(&ctx, &tracker, Effect::Navigate("/".to_string())).await;
        match action {
            Some(Action::Navigated { resolution, user, .. }) => {
                assert_eq!(resolution.view, View::OrganizationSelect);
                assert_eq!(user.map(|u| u.email), Some(DEMO_EMAIL.to_string()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_superseded_debounced_fetch_is_skipped() {
        let (ctx, backend) = context();
        let tracker = RequestTracker::new();
        let query = TicketQuery::new("org-acme");
        let first = run_effect(
            &ctx,
            &tracker,
            Effect::FetchTickets {
                request: 1,
                query: query.clone(),
                debounce: Duration::from_millis(50),
            },
        );
        let second = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            run_effect(
                &ctx,
                &tracker,
                Effect::FetchTickets {
                    request: 2,
                    query: query.clone(),
                    debounce: Duration::from_millis(50),
                },
            )
            .await
        };
        let (first, second) = tokio::join!(first, second);
        assert!(first.is_none());
        assert!(matches!(second, Some(Action::TicketsLoaded { request: 2, result: Ok(_) })));
        assert_eq!(backend.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_tenant_verification_reports_error() {
        let (ctx, _) = context();
        let tracker = RequestTracker::new();
        let action = run_effect(&ctx, &tracker, Effect::VerifyTenant("nope".to_string())).await;
        assert!(matches!(action, Some(Action::TenantVerified(Err(_)))));
    }

    #[tokio::test]
    async fn test_create_without_session_reports_not_authenticated() {
        let (ctx, backend) = context();
        let tracker = RequestTracker::new();
        let org = ctx.directory().organization_by_slug("acme").await.unwrap();
        let form = crate::create::TicketForm {
            client_file_no: "CF-9".to_string(),
            mobile_no: "555-0100".to_string(),
            name_of_client: "Sam".to_string(),
            issue_type: Some(crate::types::IssueType::Other),
            description: "help".to_string(),
        };
        let action = run_effect(
            &ctx,
            &tracker,
            Effect::CreateTicket {
                form,
                organization: org,
            },
        )
        .await;
        match action {
            Some(Action::TicketCreated(Err(message))) => {
                assert_eq!(message, "User not authenticated");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(backend.create_calls(), 0);
    }
}
