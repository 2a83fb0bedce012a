//! Application state management

use crate::core::mode::ViewMode;
use crate::core::panel::PanelSection;
use crate::metadata::LibraryEntry;

/// Main application state
pub struct AppState {
    /// Content listing shown in the grid
    pub entries: Vec<LibraryEntry>,
    /// Current focus index in the listing
    pub focus_index: usize,
    /// Top of viewport (scroll position)
    pub viewport_top: usize,
    /// Current view mode
    pub mode: ViewMode,
    /// Status message
    pub message: Option<String>,
    /// Exit flag
    pub should_quit: bool,
    /// Entity ids marked for output in pick mode
    pub marked: Vec<String>,
    /// Selected row in the search popup
    pub search_selected: usize,
    /// Panel body section to highlight, set when a pending action is
    /// consumed
    pub panel_focus: Option<PanelSection>,
    /// Whether manifest watching is enabled
    pub watch_enabled: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            focus_index: 0,
            viewport_top: 0,
            mode: ViewMode::Browse,
            message: None,
            should_quit: false,
            marked: Vec::new(),
            search_selected: 0,
            panel_focus: None,
            watch_enabled: false,
        }
    }

    /// Replace the content listing, keeping focus in range
    pub fn set_entries(&mut self, entries: Vec<LibraryEntry>) {
        self.entries = entries;
        if self.focus_index >= self.entries.len() {
            self.focus_index = self.entries.len().saturating_sub(1);
        }
        // Drop marks that no longer exist in the listing
        self.marked.retain(|id| self.entries.iter().any(|e| &e.id == id));
    }

    /// Entry under the cursor
    pub fn focused_entry(&self) -> Option<&LibraryEntry> {
        self.entries.get(self.focus_index)
    }

    pub fn move_up(&mut self) {
        self.focus_index = self.focus_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.focus_index + 1 < self.entries.len() {
            self.focus_index += 1;
        }
    }

    pub fn move_to_top(&mut self) {
        self.focus_index = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.focus_index = self.entries.len().saturating_sub(1);
    }

    /// Move focus to the entry with the given id, if present
    pub fn focus_id(&mut self, id: &str) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| e.id == id) {
            self.focus_index = pos;
            true
        } else {
            false
        }
    }

    /// Toggle an entity's mark (pick mode multi-select)
    pub fn toggle_mark(&mut self, id: &str) {
        if let Some(pos) = self.marked.iter().position(|m| m == id) {
            self.marked.remove(pos);
        } else {
            self.marked.push(id.to_string());
        }
    }

    /// Adjust viewport to keep focus visible
    pub fn adjust_viewport(&mut self, visible_height: usize) {
        if self.focus_index < self.viewport_top {
            self.viewport_top = self.focus_index;
        } else if visible_height > 0 && self.focus_index >= self.viewport_top + visible_height {
            self.viewport_top = self.focus_index.saturating_sub(visible_height) + 1;
        }
    }

    /// Set status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Clear status message
    pub fn clear_message(&mut self) {
        self.message = None;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::EntityKind;

    fn entries(n: usize) -> Vec<LibraryEntry> {
        (0..n)
            .map(|i| LibraryEntry {
                id: format!("coll-{i}"),
                title: format!("Collection {i}"),
                kind: EntityKind::Collection,
            })
            .collect()
    }

    #[test]
    fn test_focus_movement_clamps() {
        let mut state = AppState::new();
        state.set_entries(entries(3));

        state.move_up();
        assert_eq!(state.focus_index, 0);

        state.move_down();
        state.move_down();
        state.move_down();
        assert_eq!(state.focus_index, 2);

        state.move_to_top();
        assert_eq!(state.focus_index, 0);
        state.move_to_bottom();
        assert_eq!(state.focus_index, 2);
    }

    #[test]
    fn test_set_entries_keeps_focus_in_range() {
        let mut state = AppState::new();
        state.set_entries(entries(5));
        state.focus_index = 4;

        state.set_entries(entries(2));
        assert_eq!(state.focus_index, 1);

        state.set_entries(Vec::new());
        assert_eq!(state.focus_index, 0);
        assert!(state.focused_entry().is_none());
    }

    #[test]
    fn test_set_entries_drops_vanished_marks() {
        let mut state = AppState::new();
        state.set_entries(entries(3));
        state.toggle_mark("coll-0");
        state.toggle_mark("coll-2");

        state.set_entries(entries(1));
        assert_eq!(state.marked, vec!["coll-0".to_string()]);
    }

    #[test]
    fn test_toggle_mark() {
        let mut state = AppState::new();
        state.set_entries(entries(2));
        state.toggle_mark("coll-1");
        assert_eq!(state.marked.len(), 1);
        state.toggle_mark("coll-1");
        assert!(state.marked.is_empty());
    }

    #[test]
    fn test_focus_id() {
        let mut state = AppState::new();
        state.set_entries(entries(3));
        assert!(state.focus_id("coll-2"));
        assert_eq!(state.focus_index, 2);
        assert!(!state.focus_id("missing"));
        assert_eq!(state.focus_index, 2);
    }

    #[test]
    fn test_adjust_viewport() {
        let mut state = AppState::new();
        state.set_entries(entries(50));

        state.focus_index = 30;
        state.adjust_viewport(10);
        assert_eq!(state.viewport_top, 21);

        state.focus_index = 5;
        state.adjust_viewport(10);
        assert_eq!(state.viewport_top, 5);
    }

    #[test]
    fn test_messages() {
        let mut state = AppState::new();
        state.set_message("Loading component lb:a:b:html:x");
        assert!(state.message.is_some());
        state.clear_message();
        assert!(state.message.is_none());
    }
}
