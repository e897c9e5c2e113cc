//! Key hints for each screen and mode

use std::fmt;

/// One key hint, e.g. `C-q Quit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: &'static str,
    pub label: &'static str,
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.label)
    }
}

const fn hint(key: &'static str, label: &'static str) -> Shortcut {
    Shortcut { key, label }
}

const QUIT: Shortcut = hint("C-q", "Quit");

pub fn login_shortcuts() -> Vec<Shortcut> {
    vec![
        hint("Tab", "Next Field"),
        hint("Enter", "Sign In"),
        hint("C-d", "Diagnostics"),
        QUIT,
    ]
}

pub fn org_select_shortcuts() -> Vec<Shortcut> {
    vec![
        hint("Up/Down", "Move"),
        hint("Enter", "Select"),
        hint("Esc", "Clear Filter"),
        hint("C-r", "Reload"),
        hint("C-x", "Sign Out"),
        QUIT,
    ]
}

/// Ticket list with nothing focused
pub fn dashboard_shortcuts() -> Vec<Shortcut> {
    vec![
        hint("j/k", "Up/Down"),
        hint("g/G", "Top/Bottom"),
        hint("/", "Search"),
        hint("s", "Status"),
        hint("r", "Refresh"),
        hint("n", "New"),
        hint("N", "New For Client"),
        hint("y", "Copy No"),
        hint("o", "Change Org"),
        hint("X", "Sign Out"),
        hint("D", "Diagnostics"),
        QUIT,
    ]
}

pub fn search_shortcuts() -> Vec<Shortcut> {
    vec![hint("Enter", "Done"), hint("Esc", "Clear & Exit"), QUIT]
}

pub fn create_modal_shortcuts() -> Vec<Shortcut> {
    vec![
        hint("Tab", "Next Field"),
        hint("S-Tab", "Prev Field"),
        hint("Left/Right", "Issue Type"),
        hint("Enter", "Submit"),
        hint("Esc", "Cancel"),
    ]
}

pub fn diagnostics_shortcuts() -> Vec<Shortcut> {
    vec![hint("r", "Re-run"), hint("Esc", "Back"), QUIT]
}
