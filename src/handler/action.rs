//! Action execution handler
//!
//! This module handles the execution of KeyActions, translating them into
//! state and session changes.

use crate::core::{AppState, Session, SidebarAction, ViewMode};
use crate::handler::key::KeyAction;
use crate::integrate::{exit_code, OutputFormat, PickResult, PickTarget};

/// Result of action execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// Continue the event loop
    Continue,
    /// Quit with the given exit code
    Quit(i32),
}

/// Context for action execution (extracted from Config)
#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    /// Entity kinds the picker accepts
    pub pick_target: PickTarget,
    /// Output format for pick mode
    pub output_format: OutputFormat,
}

/// Handle a KeyAction and update state accordingly
pub fn handle_action(
    action: KeyAction,
    state: &mut AppState,
    session: &mut Session,
    context: &ActionContext,
) -> anyhow::Result<ActionResult> {
    match action {
        // No action
        KeyAction::None => Ok(ActionResult::Continue),

        // App control
        KeyAction::Quit => {
            if session.picker() {
                Ok(ActionResult::Quit(exit_code::CANCELLED))
            } else {
                state.should_quit = true;
                Ok(ActionResult::Continue)
            }
        }
        KeyAction::Cancel => handle_cancel(state, session),

        // Navigation
        KeyAction::MoveUp => {
            state.move_up();
            Ok(ActionResult::Continue)
        }
        KeyAction::MoveDown => {
            state.move_down();
            Ok(ActionResult::Continue)
        }
        KeyAction::MoveToTop => {
            state.move_to_top();
            Ok(ActionResult::Continue)
        }
        KeyAction::MoveToBottom => {
            state.move_to_bottom();
            Ok(ActionResult::Continue)
        }

        // Selection
        KeyAction::Select => {
            if session.picker() {
                handle_pick_select(state, context)
            } else {
                if let Some(entry) = state.focused_entry().cloned() {
                    session.select(&entry.id);
                }
                Ok(ActionResult::Continue)
            }
        }
        KeyAction::ToggleMark => {
            if let Some(entry) = state.focused_entry().cloned() {
                if session.picker() && !context.pick_target.accepts(entry.kind) {
                    state.set_message(format!(
                        "{} entries are not selectable here",
                        entry.kind.display_name()
                    ));
                } else {
                    state.toggle_mark(&entry.id);
                }
            }
            Ok(ActionResult::Continue)
        }
        KeyAction::ClearMarks => {
            state.marked.clear();
            Ok(ActionResult::Continue)
        }

        // Sidebar panels
        KeyAction::OpenAddContent => {
            session.open_add_content();
            Ok(ActionResult::Continue)
        }
        KeyAction::OpenLibraryInfo => {
            session.open_library_info();
            Ok(ActionResult::Continue)
        }
        KeyAction::CloseSidebar => {
            state.panel_focus = None;
            session.close();
            Ok(ActionResult::Continue)
        }

        // Sidebar tabs
        KeyAction::NextTab => {
            session.cycle_tab(true);
            Ok(ActionResult::Continue)
        }
        KeyAction::PrevTab => {
            session.cycle_tab(false);
            Ok(ActionResult::Continue)
        }
        KeyAction::SelectTab(index) => {
            if let Some(tab) = session.visible_tabs().get(index).copied() {
                session.set_tab(tab);
            }
            Ok(ActionResult::Continue)
        }

        // One-shot sidebar actions
        KeyAction::JumpToCollections => {
            trigger_jump(state, session, SidebarAction::JumpToManageCollections);
            Ok(ActionResult::Continue)
        }
        KeyAction::JumpToTags => {
            trigger_jump(state, session, SidebarAction::JumpToManageTags);
            Ok(ActionResult::Continue)
        }
        KeyAction::ManageTeam => {
            session.open_library_info();
            session.set_sidebar_action(SidebarAction::ManageTeam);
            Ok(ActionResult::Continue)
        }

        // Search
        KeyAction::StartSearch => {
            state.search_selected = 0;
            state.mode = ViewMode::Search {
                query: String::new(),
            };
            Ok(ActionResult::Continue)
        }
        KeyAction::SearchUp => {
            state.search_selected = state.search_selected.saturating_sub(1);
            Ok(ActionResult::Continue)
        }
        KeyAction::SearchDown => {
            state.search_selected = state.search_selected.saturating_add(1);
            Ok(ActionResult::Continue)
        }
        KeyAction::SearchConfirm { id } => {
            state.mode = ViewMode::Browse;
            if !id.is_empty() {
                state.focus_id(&id);
                session.select(&id);
            }
            Ok(ActionResult::Continue)
        }

        // Clipboard
        KeyAction::CopyLink => {
            let link = session.location().to_string();
            match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(link.clone())) {
                Ok(_) => state.set_message(format!("Copied {}", link)),
                Err(_) => state.set_message("Failed: copy link"),
            }
            Ok(ActionResult::Continue)
        }

        // Refresh (handled in event loop, needs the metadata source)
        KeyAction::Refresh => Ok(ActionResult::Continue),

        // Help
        KeyAction::ShowHelp => {
            state.mode = ViewMode::Help;
            Ok(ActionResult::Continue)
        }
    }
}

/// Esc cascade: leave the current mode, then drop panel focus, then
/// close the sidebar, then quit.
fn handle_cancel(state: &mut AppState, session: &mut Session) -> anyhow::Result<ActionResult> {
    match &state.mode {
        ViewMode::Browse => {
            if state.panel_focus.is_some() {
                state.panel_focus = None;
            } else if session.panel().is_open() {
                session.close();
            } else if session.picker() {
                return Ok(ActionResult::Quit(exit_code::CANCELLED));
            } else {
                state.should_quit = true;
            }
            Ok(ActionResult::Continue)
        }
        _ => {
            state.mode = ViewMode::Browse;
            state.clear_message();
            Ok(ActionResult::Continue)
        }
    }
}

/// Accept the picker selection: marked entries if any, otherwise the
/// focused entry, filtered to the kinds the target accepts.
fn handle_pick_select(
    state: &mut AppState,
    context: &ActionContext,
) -> anyhow::Result<ActionResult> {
    let candidates: Vec<String> = if state.marked.is_empty() {
        state
            .focused_entry()
            .filter(|e| context.pick_target.accepts(e.kind))
            .map(|e| e.id.clone())
            .into_iter()
            .collect()
    } else {
        state
            .marked
            .iter()
            .filter(|id| {
                state
                    .entries
                    .iter()
                    .any(|e| &e.id == *id && context.pick_target.accepts(e.kind))
            })
            .cloned()
            .collect()
    };

    if candidates.is_empty() {
        state.set_message(format!("Nothing selected ({})", context.pick_target.describe()));
        return Ok(ActionResult::Continue);
    }

    let result = PickResult::Selected(candidates);
    Ok(ActionResult::Quit(result.output(context.output_format)?))
}

/// Point the pending action at the focused entry, opening its panel
/// first when no panel is up.
fn trigger_jump(state: &mut AppState, session: &mut Session, action: SidebarAction) {
    if !session.panel().is_open() {
        if let Some(entry) = state.focused_entry().cloned() {
            session.select(&entry.id);
        }
    }
    session.set_sidebar_action(action);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SessionOptions, SidebarPanel, SidebarTab};
    use crate::key::EntityKind;
    use crate::link::Location;
    use crate::metadata::{ComponentMeta, LibraryEntry};

    fn session_at(link: &str) -> Session {
        Session::new(Location::parse(link).unwrap(), SessionOptions::default())
    }

    fn picker_session(link: &str) -> Session {
        Session::new(
            Location::parse(link).unwrap(),
            SessionOptions {
                picker: true,
                ..SessionOptions::default()
            },
        )
    }

    fn entry(id: &str, title: &str, kind: EntityKind) -> LibraryEntry {
        LibraryEntry {
            id: id.to_string(),
            title: title.to_string(),
            kind,
        }
    }

    fn seeded_state() -> AppState {
        let mut state = AppState::new();
        state.set_entries(vec![
            entry("coll-1", "First", EntityKind::Collection),
            entry("lb:org:lib:html:a", "Intro", EntityKind::Component),
            entry("lb:org:lib:problem:b", "Quiz", EntityKind::Component),
        ]);
        state
    }

    fn component_meta(id: &str) -> ComponentMeta {
        ComponentMeta {
            id: id.to_string(),
            block_type: "html".to_string(),
            display_name: "Block".to_string(),
            published_display_name: None,
            last_published: None,
            published_by: None,
            last_draft_created: None,
            last_draft_created_by: None,
            has_unpublished_changes: false,
            created: None,
            modified: None,
            tags_count: 0,
            collections: vec![],
        }
    }

    #[test]
    fn test_quit_sets_flag() {
        let mut state = AppState::new();
        let mut session = session_at("/library/lib:org:lib");
        let result = handle_action(
            KeyAction::Quit,
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        assert_eq!(result, ActionResult::Continue);
        assert!(state.should_quit);
    }

    #[test]
    fn test_quit_in_picker_exits_cancelled() {
        let mut state = AppState::new();
        let mut session = picker_session("/library/lib:org:lib");
        let result = handle_action(
            KeyAction::Quit,
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        assert_eq!(result, ActionResult::Quit(exit_code::CANCELLED));
    }

    #[test]
    fn test_cancel_closes_sidebar_before_quitting() {
        let mut state = AppState::new();
        let mut session = session_at("/library/lib:org:lib");
        session.open_library_info();

        let result = handle_action(
            KeyAction::Cancel,
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        assert_eq!(result, ActionResult::Continue);
        assert_eq!(*session.panel(), SidebarPanel::Closed);
        assert!(!state.should_quit);

        let result = handle_action(
            KeyAction::Cancel,
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        assert_eq!(result, ActionResult::Continue);
        assert!(state.should_quit);
    }

    #[test]
    fn test_cancel_leaves_search_mode() {
        let mut state = AppState::new();
        state.mode = ViewMode::Search {
            query: "quiz".to_string(),
        };
        let mut session = session_at("/library/lib:org:lib");
        session.open_library_info();

        handle_action(
            KeyAction::Cancel,
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        // Only the mode is dropped; the sidebar stays up
        assert!(state.mode.is_browse());
        assert!(session.panel().is_open());
    }

    #[test]
    fn test_select_opens_panel_for_focused_entry() {
        let mut state = seeded_state();
        state.move_down();
        let mut session = session_at("/library/lib:org:lib");
        session
            .store_mut()
            .insert_component(component_meta("lb:org:lib:html:a"));

        handle_action(
            KeyAction::Select,
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        assert_eq!(
            *session.panel(),
            SidebarPanel::ComponentInfo {
                usage_key: "lb:org:lib:html:a".to_string()
            }
        );
        assert_eq!(session.location().selected_id(), Some("lb:org:lib:html:a"));
    }

    #[test]
    fn test_pick_select_outputs_marked_only() {
        let mut state = seeded_state();
        state.marked.push("lb:org:lib:html:a".to_string());
        state.marked.push("coll-1".to_string());
        let mut session = picker_session("/library/lib:org:lib");

        // Components-only target drops the marked collection
        let context = ActionContext {
            pick_target: PickTarget::Components,
            output_format: OutputFormat::Lines,
        };
        let result =
            handle_action(KeyAction::Select, &mut state, &mut session, &context).unwrap();
        assert_eq!(result, ActionResult::Quit(exit_code::SUCCESS));
    }

    #[test]
    fn test_pick_select_empty_stays_running() {
        let mut state = seeded_state();
        // Focus on the collection, but the target only accepts components
        let mut session = picker_session("/library/lib:org:lib");
        let context = ActionContext {
            pick_target: PickTarget::Components,
            output_format: OutputFormat::Lines,
        };
        let result =
            handle_action(KeyAction::Select, &mut state, &mut session, &context).unwrap();
        assert_eq!(result, ActionResult::Continue);
        assert!(state.message.is_some());
    }

    #[test]
    fn test_toggle_mark_respects_pick_target() {
        let mut state = seeded_state();
        let mut session = picker_session("/library/lib:org:lib");
        let context = ActionContext {
            pick_target: PickTarget::Components,
            output_format: OutputFormat::Lines,
        };

        // Focused entry is the collection
        handle_action(KeyAction::ToggleMark, &mut state, &mut session, &context).unwrap();
        assert!(state.marked.is_empty());

        state.move_down();
        handle_action(KeyAction::ToggleMark, &mut state, &mut session, &context).unwrap();
        assert_eq!(state.marked, vec!["lb:org:lib:html:a".to_string()]);
    }

    #[test]
    fn test_select_tab_by_index() {
        let mut state = AppState::new();
        let mut session = session_at("/library/lib:org:lib/item/lb:org:lib:html:a");
        session
            .store_mut()
            .insert_component(component_meta("lb:org:lib:html:a"));
        session.sync_route();

        handle_action(
            KeyAction::SelectTab(1),
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        assert_eq!(session.current_tab(), Some(SidebarTab::Manage));

        // Out of range is ignored
        handle_action(
            KeyAction::SelectTab(9),
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        assert_eq!(session.current_tab(), Some(SidebarTab::Manage));
    }

    #[test]
    fn test_jump_to_tags_selects_focused_entry() {
        let mut state = seeded_state();
        state.move_down();
        let mut session = session_at("/library/lib:org:lib");
        session
            .store_mut()
            .insert_component(component_meta("lb:org:lib:html:a"));

        handle_action(
            KeyAction::JumpToTags,
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        assert!(session.panel().is_open());
        assert_eq!(session.sidebar_action(), SidebarAction::JumpToManageTags);
    }

    #[test]
    fn test_manage_team_opens_library_info() {
        let mut state = AppState::new();
        let mut session = session_at("/library/lib:org:lib");

        handle_action(
            KeyAction::ManageTeam,
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        assert_eq!(*session.panel(), SidebarPanel::LibraryInfo);
        assert_eq!(session.sidebar_action(), SidebarAction::ManageTeam);
        assert_eq!(
            session.apply_pending_action(),
            Some(SidebarAction::ManageTeam)
        );
    }

    #[test]
    fn test_search_confirm_focuses_and_selects() {
        let mut state = seeded_state();
        state.mode = ViewMode::Search {
            query: "quiz".to_string(),
        };
        let mut session = session_at("/library/lib:org:lib");
        session
            .store_mut()
            .insert_component(component_meta("lb:org:lib:problem:b"));

        handle_action(
            KeyAction::SearchConfirm {
                id: "lb:org:lib:problem:b".to_string(),
            },
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        assert!(state.mode.is_browse());
        assert_eq!(state.focus_index, 2);
        assert_eq!(
            session.location().selected_id(),
            Some("lb:org:lib:problem:b")
        );
    }

    #[test]
    fn test_show_help_and_dismiss() {
        let mut state = AppState::new();
        let mut session = session_at("/library/lib:org:lib");

        handle_action(
            KeyAction::ShowHelp,
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        assert_eq!(state.mode, ViewMode::Help);

        handle_action(
            KeyAction::Cancel,
            &mut state,
            &mut session,
            &ActionContext::default(),
        )
        .unwrap();
        assert!(state.mode.is_browse());
    }
}
