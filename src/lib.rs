//! ShelfView - A terminal navigator for content-library authoring
//!
//! This crate provides a TUI over a content library's entries with a
//! sidebar mirroring the authoring web interface: info panels, tabs
//! and one-shot jump actions, all addressable through deep links.

pub mod app;
pub mod core;
pub mod handler;
pub mod integrate;
pub mod key;
pub mod link;
pub mod metadata;
pub mod render;
pub mod watch;
