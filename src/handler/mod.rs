//! Handler module - Input event handling

pub mod action;
pub mod key;

pub use action::{handle_action, ActionContext, ActionResult};
pub use key::{handle_key_event, update_search_query, KeyAction};
