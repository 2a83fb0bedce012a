//! Frame composition for the event loop

use ratatui::prelude::*;

use crate::core::{AppState, Session, ViewMode};
use crate::render::{
    render_grid, render_help_popup, render_search_popup, render_sidebar, render_status_bar,
    EntryMatch,
};

/// Context for rendering a frame
pub struct RenderContext<'a> {
    pub state: &'a AppState,
    pub session: &'a Session,
    pub search_matches: &'a [EntryMatch],
}

/// Render a complete frame
pub fn render_frame(frame: &mut Frame, ctx: RenderContext) {
    let size = frame.area();

    // The sidebar claims its column while a panel is open or a gated
    // open is still waiting on its fetch
    let sidebar_visible = ctx.session.panel().is_open() || ctx.session.pending_panel().is_some();

    let main_chunks = if sidebar_visible {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(size)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(size)
    };

    // Grid area with status bar
    let grid_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(main_chunks[0]);

    // Render the listing (viewport adjustment is done in the event loop)
    render_grid(frame, ctx.state, ctx.session, grid_chunks[0]);

    render_status_bar(frame, ctx.state, ctx.session, grid_chunks[1]);

    if sidebar_visible && main_chunks.len() > 1 {
        render_sidebar(frame, ctx.state, ctx.session, main_chunks[1]);
    }

    // Render search popup if in Search mode
    if let ViewMode::Search { query } = &ctx.state.mode {
        // Bound selected index to results length
        let bounded_selected = if ctx.search_matches.is_empty() {
            0
        } else {
            ctx.state.search_selected.min(ctx.search_matches.len() - 1)
        };
        render_search_popup(frame, query, ctx.search_matches, bounded_selected, size);
    }

    // Render help popup if in Help mode
    render_help_popup(frame, ctx.state);
}
