//! Key-to-action mapping
//!
//! Converts raw `(KeyCode, KeyModifiers)` pairs into `Action` values. The
//! active screen and its focus decide which map applies, so a key resolves to
//! at most one action.

use iocraft::prelude::{KeyCode, KeyModifiers};

use super::model::{Action, AppState, Screen};
use crate::create::FormField;

/// Map a raw key event to an `Action`, or `None` when the key does nothing here.
pub fn key_to_action(code: KeyCode, modifiers: KeyModifiers, state: &AppState) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL)
        && matches!(code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return Some(Action::Quit);
    }

    match &state.screen {
        Screen::Loading => None,
        Screen::Login(_) => login_key(code, modifiers),
        Screen::OrganizationSelect(_) => org_select_key(code, modifiers),
        Screen::Dashboard(dash) if dash.modal.is_open() => {
            let focus = dash.modal.form().map(|m| m.focus);
            modal_key(code, modifiers, focus)
        }
        Screen::Dashboard(dash) if dash.search_focused => search_key(code, modifiers),
        Screen::Dashboard(_) => dashboard_key(code, modifiers),
        Screen::Diagnostics(_) => diagnostics_key(code),
    }
}

/// Plain characters and backspace for text entry.
fn text_input(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    match code {
        KeyCode::Char(c)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(Action::Input(c))
        }
        KeyCode::Backspace => Some(Action::Backspace),
        _ => None,
    }
}

fn login_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    match code {
        KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::OpenDiagnostics)
        }
        _ => text_input(code, modifiers),
    }
}

fn org_select_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Char('p') if ctrl => Some(Action::MoveUp),
        KeyCode::Char('n') if ctrl => Some(Action::MoveDown),
        KeyCode::Char('r') if ctrl => Some(Action::Refresh),
        KeyCode::Char('x') if ctrl => Some(Action::SignOut),
        KeyCode::Char('d') if ctrl => Some(Action::OpenDiagnostics),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc => Some(Action::Cancel),
        _ => text_input(code, modifiers),
    }
}

fn search_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    match code {
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc => Some(Action::Cancel),
        _ => text_input(code, modifiers),
    }
}

fn modal_key(code: KeyCode, modifiers: KeyModifiers, focus: Option<FormField>) -> Option<Action> {
    match code {
        KeyCode::Tab => Some(Action::NextField),
        KeyCode::BackTab => Some(Action::PrevField),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Left if focus == Some(FormField::IssueType) => {
            Some(Action::CycleIssueType { forward: false })
        }
        KeyCode::Right if focus == Some(FormField::IssueType) => {
            Some(Action::CycleIssueType { forward: true })
        }
        // Space on the selector steps forward rather than typing
        KeyCode::Char(' ') if focus == Some(FormField::IssueType) => {
            Some(Action::CycleIssueType { forward: true })
        }
        _ => text_input(code, modifiers),
    }
}

fn dashboard_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    match code {
        KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::GoToTop),
        KeyCode::Char('G') | KeyCode::End => Some(Action::GoToBottom),
        KeyCode::Char('/') => Some(Action::FocusSearch),
        KeyCode::Char('s') => Some(Action::CycleStatusFilter),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('n') => Some(Action::OpenCreate),
        KeyCode::Char('N') => Some(Action::OpenCreateFromSelected),
        KeyCode::Char('y') => Some(Action::CopySelected),
        KeyCode::Char('o') => Some(Action::ChangeOrganization),
        KeyCode::Char('X') => Some(Action::SignOut),
        KeyCode::Char('D') => Some(Action::OpenDiagnostics),
        _ => None,
    }
}

fn diagnostics_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Esc | KeyCode::Backspace => Some(Action::Cancel),
        _ => None,
    }
}
