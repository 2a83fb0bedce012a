//! Core module - Navigation session, sidebar state and view modes

pub mod mode;
pub mod panel;
pub mod session;
pub mod state;
pub mod tabs;

pub use mode::ViewMode;
pub use panel::{PanelKind, PanelSection, SidebarAction, SidebarPanel};
pub use session::{FetchOutcome, Session, SessionOptions, ACTION_PARAM, TAB_PARAM};
pub use state::AppState;
pub use tabs::{resolve_tab, tabs_for, DefaultTabs, SidebarTab};
