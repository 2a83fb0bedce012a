//! Status bar and help popup rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::core::{AppState, Session, ViewMode};

/// Render the status bar
pub fn render_status_bar(frame: &mut Frame, state: &AppState, session: &Session, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Left: message or help hint, with watch and picker indicators
    let watch_indicator = if state.watch_enabled {
        "\u{f06e} " // Eye icon (nf-fa-eye) for manifest watching
    } else {
        ""
    };

    let picker_indicator = if session.picker() { "PICK | " } else { "" };

    let message = state.message.as_deref().unwrap_or("? for help");
    let left_content = Line::from(vec![
        Span::styled(watch_indicator, Style::default().fg(Color::Blue)),
        Span::styled(picker_indicator, Style::default().fg(Color::Yellow)),
        Span::raw(format!(" {}", message)),
    ]);
    let msg_widget = Paragraph::new(left_content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(msg_widget, chunks[0]);

    // Right: position, marks, and the open panel with its tab
    let position = if state.entries.is_empty() {
        "0/0".to_string()
    } else {
        format!("{}/{}", state.focus_index + 1, state.entries.len())
    };

    let marked_info = if state.marked.is_empty() {
        String::new()
    } else {
        format!(" | Marked: {}", state.marked.len())
    };

    let panel_info = if session.panel().is_open() {
        match session.current_tab() {
            Some(tab) => format!(
                " | {}:{}",
                session.panel().kind().wire_name(),
                tab.as_str()
            ),
            None => format!(" | {}", session.panel().kind().wire_name()),
        }
    } else if session.pending_panel().is_some() {
        " | loading".to_string()
    } else {
        String::new()
    };

    let stats = format!("{}{}{}", position, marked_info, panel_info);
    let stats_widget = Paragraph::new(stats).block(Block::default().borders(Borders::ALL));
    frame.render_widget(stats_widget, chunks[1]);
}

/// Render help popup overlay
pub fn render_help_popup(frame: &mut Frame, state: &AppState) {
    if !matches!(state.mode, ViewMode::Help) {
        return;
    }

    let help_lines = vec![
        Line::from(vec![Span::styled(
            "Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  j/\u{2193}      Move down"),
        Line::from("  k/\u{2191}      Move up"),
        Line::from("  g        Go to top"),
        Line::from("  G        Go to bottom"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Sidebar",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Enter    Open info for entry"),
        Line::from("  i        Library info"),
        Line::from("  a        Add content"),
        Line::from("  x        Close sidebar"),
        Line::from("  Tab      Next tab"),
        Line::from("  S-Tab    Previous tab"),
        Line::from("  1-4      Tab by number"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Jump",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  C        Manage collections"),
        Line::from("  T        Manage tags"),
        Line::from("  M        Manage team"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Other",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Space    Toggle mark"),
        Line::from("  /        Search"),
        Line::from("  y        Copy link"),
        Line::from("  r        Refresh"),
        Line::from("  q        Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press ? or Esc to close",
            Style::default().fg(Color::DarkGray),
        )]),
    ];

    let height = (help_lines.len() + 2) as u16; // +2 for border
    let area = centered_rect(50, height, frame.area());

    let popup = Paragraph::new(help_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// Create a centered rectangle
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
