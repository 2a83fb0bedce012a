//! Render module - UI rendering

pub mod grid;
pub mod search;
pub mod sidebar;
pub mod status;

pub use grid::{render_grid, visible_height};
pub use search::{entry_matches, render_search_popup, EntryMatch};
pub use sidebar::render_sidebar;
pub use status::{render_help_popup, render_status_bar};
