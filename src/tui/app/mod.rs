//! Interactive client: model, key mapping, effect runner and root component

pub mod effects;
pub mod keymap;
pub mod model;
pub mod view;

pub use keymap::key_to_action;
pub use model::{Action, AppState, Effect, Screen, reduce};
pub use view::{HelpdeskApp, HelpdeskAppProps};
