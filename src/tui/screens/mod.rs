//! Top-level screens, one per routed view

pub mod create_modal;
pub mod dashboard;
pub mod diagnostics;
pub mod login;
pub mod org_select;

pub use create_modal::render_create_modal;
pub use dashboard::render_dashboard;
pub use diagnostics::render_diagnostics;
pub use login::render_login;
pub use org_select::render_org_select;
