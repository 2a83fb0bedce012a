//! Search popup rendering and matching

use nucleo_matcher::{
    pattern::{CaseMatching, Normalization, Pattern},
    Matcher, Utf32Str,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::metadata::LibraryEntry;

use super::grid::entry_tag;

/// Maximum number of results to display
const MAX_RESULTS: usize = 15;

/// Search match result
#[derive(Debug, Clone)]
pub struct EntryMatch {
    /// Entity id of the matched entry
    pub id: String,
    /// Title as displayed
    pub display: String,
    /// Type tag shown before the title
    pub tag: String,
    /// Match score (higher is better)
    pub score: u32,
    /// Matched character indices for highlighting
    pub indices: Vec<usize>,
}

/// Match entries against a query by title
pub fn entry_matches(query: &str, entries: &[LibraryEntry]) -> Vec<EntryMatch> {
    if query.is_empty() {
        // Return first MAX_RESULTS entries when no query
        return entries
            .iter()
            .take(MAX_RESULTS)
            .map(|entry| EntryMatch {
                id: entry.id.clone(),
                display: entry.title.clone(),
                tag: entry_tag(entry),
                score: 0,
                indices: vec![],
            })
            .collect();
    }

    let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);
    let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);

    let mut results: Vec<EntryMatch> = entries
        .iter()
        .filter_map(|entry| {
            let mut buf = Vec::new();
            let haystack = Utf32Str::new(&entry.title, &mut buf);

            let mut indices = Vec::new();
            let score = pattern.indices(haystack, &mut matcher, &mut indices)?;

            let indices: Vec<usize> = indices.iter().map(|&i| i as usize).collect();

            Some(EntryMatch {
                id: entry.id.clone(),
                display: entry.title.clone(),
                tag: entry_tag(entry),
                score,
                indices,
            })
        })
        .collect();

    // Sort by score descending
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(MAX_RESULTS);

    results
}

/// Render the search popup
pub fn render_search_popup(
    frame: &mut Frame,
    query: &str,
    results: &[EntryMatch],
    selected: usize,
    area: Rect,
) {
    // Popup dimensions, clamped for very small terminals
    let popup_width = (area.width * 70 / 100)
        .min(80)
        .max(40)
        .min(area.width.saturating_sub(2));
    let popup_height = (MAX_RESULTS as u16 + 4)
        .min(area.height.saturating_sub(4))
        .max(6);

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 3;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Search ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    // Split inner area: input field + separator + results
    let chunks = Layout::default()
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let input_line = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(query.to_string()),
        Span::styled(
            "_",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    let separator = "\u{2500}".repeat(chunks[1].width as usize);
    frame.render_widget(
        Paragraph::new(separator).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );

    if results.is_empty() {
        let no_results =
            Paragraph::new("  No matches found").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(no_results, chunks[2]);
    } else {
        let items: Vec<ListItem> = results
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let is_selected = i == selected;
                let style = if is_selected {
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                let mut spans = vec![
                    Span::raw("  "),
                    Span::styled(m.tag.clone(), Style::default().fg(Color::DarkGray)),
                    Span::raw(" "),
                ];
                spans.extend(create_highlighted_spans(&m.display, &m.indices));
                ListItem::new(Line::from(spans)).style(style)
            })
            .collect();

        frame.render_widget(List::new(items), chunks[2]);
    }
}

/// Create spans with matched characters highlighted
fn create_highlighted_spans(text: &str, indices: &[usize]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let chars: Vec<char> = text.chars().collect();

    let match_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let normal_style = Style::default();

    let mut last_idx = 0;
    for &idx in indices {
        if idx > last_idx {
            let s: String = chars[last_idx..idx].iter().collect();
            spans.push(Span::styled(s, normal_style));
        }
        if idx < chars.len() {
            spans.push(Span::styled(chars[idx].to_string(), match_style));
            last_idx = idx + 1;
        }
    }

    if last_idx < chars.len() {
        let s: String = chars[last_idx..].iter().collect();
        spans.push(Span::styled(s, normal_style));
    }

    spans
}
