//! Library content grid rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::core::{AppState, Session};
use crate::key::{block_type_of, EntityKind};
use crate::metadata::LibraryEntry;

/// Render the library content grid
pub fn render_grid(frame: &mut Frame, state: &AppState, session: &Session, area: Rect) {
    let height = visible_height(area);

    let items: Vec<ListItem> = state
        .entries
        .iter()
        .skip(state.viewport_top)
        .take(height)
        .enumerate()
        .map(|(i, entry)| {
            let absolute_index = state.viewport_top + i;
            render_entry(state, session, entry, absolute_index)
        })
        .collect();

    let library_title = session
        .store()
        .library()
        .map(|l| l.title.clone())
        .unwrap_or_else(|| session.library_key().to_string());
    let title = format!(" {} ({}) ", library_title, state.entries.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(list, area);
}

/// Render a single entry as a ListItem
fn render_entry(
    state: &AppState,
    session: &Session,
    entry: &LibraryEntry,
    index: usize,
) -> ListItem<'static> {
    let is_focused = index == state.focus_index;
    let is_marked = state.marked.contains(&entry.id);
    let is_selected = session.location().selected_id() == Some(entry.id.as_str());

    let mark_indicator = if is_marked { "*" } else { " " };

    let mut style = match entry.kind {
        EntityKind::Collection => Style::default().fg(Color::Magenta),
        EntityKind::Unit | EntityKind::Section | EntityKind::Subsection => {
            Style::default().fg(Color::Blue)
        }
        EntityKind::Component => Style::default(),
    };

    // Draft state overrides the kind color, matching the sidebar status line
    if has_draft(session, entry) {
        style = style.fg(Color::Yellow);
    }

    if is_selected {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if is_focused {
        style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
    }

    let line = Line::from(vec![
        Span::styled(mark_indicator, Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("{:<13} {}", entry_tag(entry), entry.title),
            style,
        ),
    ]);

    ListItem::new(line)
}

/// Whether the entry has unpublished changes, as far as cached metadata
/// can tell.
fn has_draft(session: &Session, entry: &LibraryEntry) -> bool {
    match entry.kind {
        EntityKind::Component => session
            .store()
            .component(&entry.id)
            .is_some_and(|c| c.has_unpublished_changes),
        EntityKind::Unit | EntityKind::Section | EntityKind::Subsection => session
            .store()
            .container(&entry.id)
            .is_some_and(|c| c.has_unpublished_changes),
        EntityKind::Collection => false,
    }
}

/// Short bracketed type tag shown before the title
pub(super) fn entry_tag(entry: &LibraryEntry) -> String {
    let tag = match entry.kind {
        EntityKind::Collection => "collection",
        _ => block_type_of(&entry.id).unwrap_or("?"),
    };
    format!("[{}]", tag)
}

/// Calculate visible height for the grid area
pub fn visible_height(area: Rect) -> usize {
    area.height.saturating_sub(2) as usize
}
