//! Integrate module - External integration features
//!
//! Provides integration with external tools:
//! - Pick mode: Use shelfview as an entity picker (--pick)
//! - Resolve mode: Classify an identifier on stdout (--resolve)
//! - State mode: Print derived sidebar state for a link (--print-state)

pub mod inspect;
pub mod pick;

pub use inspect::{output_resolve, output_state};
pub use pick::{exit_code, output_ids, OutputFormat, PickResult, PickTarget};
