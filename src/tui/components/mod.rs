//! Shared TUI components

pub mod footer;
pub mod header;
pub mod modal_overlay;
pub mod shortcuts;
pub mod text_field;
pub mod ticket_detail;
pub mod ticket_list;
pub mod toast;

pub use footer::{Footer, FooterProps};
pub use shortcuts::{
    Shortcut, create_modal_shortcuts, dashboard_shortcuts, diagnostics_shortcuts,
    login_shortcuts, org_select_shortcuts, search_shortcuts,
};
pub use header::{Header, HeaderProps};
pub use modal_overlay::{ModalOverlay, ModalOverlayProps};
pub use text_field::{TextField, TextFieldProps};
pub use ticket_detail::{TicketDetail, TicketDetailProps};
pub use ticket_list::{TicketList, TicketListProps};
pub use toast::{Toast, ToastLevel, render_toast};
