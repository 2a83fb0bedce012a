//! Keyboard event handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::{AppState, ViewMode};

/// Actions that can result from key handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Quit the application
    Quit,
    /// Cancel current mode, close the sidebar, or quit
    Cancel,
    /// Move focus up
    MoveUp,
    /// Move focus down
    MoveDown,
    /// Move to top
    MoveToTop,
    /// Move to bottom
    MoveToBottom,
    /// Open the info panel for the focused entry
    Select,
    /// Toggle selection mark on the focused entry
    ToggleMark,
    /// Clear all marks
    ClearMarks,
    /// Open the add-content panel
    OpenAddContent,
    /// Open the library info panel
    OpenLibraryInfo,
    /// Close the sidebar
    CloseSidebar,
    /// Switch to the next sidebar tab
    NextTab,
    /// Switch to the previous sidebar tab
    PrevTab,
    /// Switch to a sidebar tab by position in the tab bar
    SelectTab(usize),
    /// Jump to the collections section of the manage tab
    JumpToCollections,
    /// Jump to the tags section of the manage tab
    JumpToTags,
    /// Open team management on the library info panel
    ManageTeam,
    /// Start search input
    StartSearch,
    /// Move up in search results
    SearchUp,
    /// Move down in search results
    SearchDown,
    /// Confirm search selection
    SearchConfirm { id: String },
    /// Copy a shareable link for the current view
    CopyLink,
    /// Reload entries from the metadata source
    Refresh,
    /// Show help overlay
    ShowHelp,
}

/// Handle key event and return the resulting action
pub fn handle_key_event(state: &AppState, key: KeyEvent) -> KeyAction {
    match &state.mode {
        ViewMode::Browse => handle_browse_mode(state, key),
        ViewMode::Search { .. } => handle_search_mode(key),
        ViewMode::Help => handle_help_mode(key),
    }
}

/// Handle keys in browse mode
fn handle_browse_mode(state: &AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        // Quit
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Esc => {
            if !state.marked.is_empty() {
                KeyAction::ClearMarks
            } else {
                KeyAction::Cancel
            }
        }

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => KeyAction::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => KeyAction::MoveDown,
        KeyCode::Char('g') => KeyAction::MoveToTop,
        KeyCode::Char('G') => KeyAction::MoveToBottom,

        // Selection
        KeyCode::Enter => KeyAction::Select,
        KeyCode::Char(' ') => KeyAction::ToggleMark,

        // Sidebar panels
        KeyCode::Char('a') => KeyAction::OpenAddContent,
        KeyCode::Char('i') => KeyAction::OpenLibraryInfo,
        KeyCode::Char('x') => KeyAction::CloseSidebar,

        // Sidebar tabs
        KeyCode::Tab => KeyAction::NextTab,
        KeyCode::BackTab => KeyAction::PrevTab,
        KeyCode::Char(c @ '1'..='4') => KeyAction::SelectTab(c as usize - '1' as usize),

        // One-shot sidebar actions
        KeyCode::Char('C') => KeyAction::JumpToCollections,
        KeyCode::Char('T') => KeyAction::JumpToTags,
        KeyCode::Char('M') => KeyAction::ManageTeam,

        // Search
        KeyCode::Char('/') => KeyAction::StartSearch,

        // Clipboard and refresh
        KeyCode::Char('y') => KeyAction::CopyLink,
        KeyCode::Char('r') => KeyAction::Refresh,

        // Help
        KeyCode::Char('?') => KeyAction::ShowHelp,

        _ => KeyAction::None,
    }
}

/// Handle keys in search mode. Plain characters are consumed by the
/// query editor before this runs.
fn handle_search_mode(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => KeyAction::Cancel,
        KeyCode::Up => KeyAction::SearchUp,
        KeyCode::Down => KeyAction::SearchDown,
        KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::SearchUp,
        KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyAction::SearchDown
        }
        KeyCode::Enter => {
            // The actual id is filled in by the event loop
            KeyAction::SearchConfirm { id: String::new() }
        }
        _ => KeyAction::None,
    }
}

/// Handle keys in the help overlay
fn handle_help_mode(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            KeyAction::Cancel
        }
        _ => KeyAction::None,
    }
}

/// Update the search query based on a key event.
/// Returns the new query content, or None if the key is not an edit.
pub fn update_search_query(key: KeyEvent, query: &str) -> Option<String> {
    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(String::new())
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut updated = query.to_string();
            updated.push(c);
            Some(updated)
        }
        KeyCode::Backspace => {
            if query.is_empty() {
                None
            } else {
                let mut updated = query.to_string();
                updated.pop();
                Some(updated)
            }
        }
        _ => None,
    }
}
