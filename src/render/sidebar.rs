//! Sidebar panel rendering

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::{AppState, PanelSection, Session, SidebarPanel, SidebarTab};

/// Render the sidebar for the current panel. Call only when a panel is
/// open or a pending open is parked.
pub fn render_sidebar(frame: &mut Frame, state: &AppState, session: &Session, area: Rect) {
    let panel = session.panel();

    if !panel.is_open() {
        // A pending open with nothing committed yet: placeholder box
        if let Some(pending) = session.pending_panel() {
            render_loading(frame, pending.kind().title(), area);
        }
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", panel.kind().title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tabs = session.visible_tabs();
    let body_area = if tabs.is_empty() {
        inner
    } else {
        let chunks = Layout::default()
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);
        render_tab_bar(frame, &tabs, session.current_tab(), chunks[0]);
        let separator = "\u{2500}".repeat(chunks[1].width as usize);
        frame.render_widget(
            Paragraph::new(separator).style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );
        chunks[2]
    };

    let mut lines = panel_body(state, session, panel);

    if session.pending_panel().is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        body_area,
    );
}

fn render_loading(frame: &mut Frame, title: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", title));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )),
        inner,
    );
}

/// Numbered tab bar, current tab highlighted
fn render_tab_bar(
    frame: &mut Frame,
    tabs: &[SidebarTab],
    current: Option<SidebarTab>,
    area: Rect,
) {
    let mut spans = Vec::new();
    for (i, tab) in tabs.iter().enumerate() {
        let label = format!(" {}:{} ", i + 1, tab.label());
        let style = if Some(*tab) == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(label, style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn panel_body(state: &AppState, session: &Session, panel: &SidebarPanel) -> Vec<Line<'static>> {
    match panel {
        SidebarPanel::Closed => vec![],
        SidebarPanel::AddContent => add_content_body(),
        SidebarPanel::LibraryInfo => library_body(state, session),
        SidebarPanel::ComponentInfo { usage_key } => component_body(state, session, usage_key),
        SidebarPanel::CollectionInfo { collection_key } => {
            collection_body(session, collection_key)
        }
        SidebarPanel::UnitInfo { container_key }
        | SidebarPanel::SectionInfo { container_key }
        | SidebarPanel::SubsectionInfo { container_key } => {
            container_body(state, session, container_key)
        }
    }
}

fn add_content_body() -> Vec<Line<'static>> {
    vec![
        Line::from("Content types in this library:"),
        Line::from(""),
        tagged_line("collection", "Collection"),
        tagged_line("unit", "Unit"),
        tagged_line("html", "Text"),
        tagged_line("problem", "Problem"),
        tagged_line("video", "Video"),
    ]
}

fn library_body(state: &AppState, session: &Session) -> Vec<Line<'static>> {
    let Some(lib) = session.store().library() else {
        return vec![dim_line("No metadata cached")];
    };

    let mut lines = vec![title_line(&lib.title), Line::from("")];
    lines.push(field("Org", lib.org.clone()));
    lines.push(field("Slug", lib.slug.clone()));
    lines.push(field("Blocks", lib.num_blocks.to_string()));
    lines.push(field("Status", draft_label(lib.has_unpublished_changes)));
    if !lib.license.is_empty() {
        lines.push(field("License", lib.license.clone()));
    }
    if !lib.description.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(lib.description.clone()));
    }

    lines.push(Line::from(""));
    lines.push(section(
        "Team",
        state.panel_focus == Some(PanelSection::Team),
    ));
    lines.push(field(
        "Access",
        if lib.can_edit_library {
            "edit"
        } else {
            "read-only"
        },
    ));
    lines.push(field(
        "Public read",
        if lib.allow_public_read { "yes" } else { "no" },
    ));

    lines
}

fn component_body(state: &AppState, session: &Session, usage_key: &str) -> Vec<Line<'static>> {
    let Some(meta) = session.store().component(usage_key) else {
        return vec![dim_line("No metadata cached")];
    };

    match session.current_tab() {
        Some(SidebarTab::Manage) => {
            let mut lines = vec![title_line(&meta.display_name), Line::from("")];
            lines.push(section(
                "Tags",
                state.panel_focus == Some(PanelSection::Tags),
            ));
            lines.push(field("Count", meta.tags_count.to_string()));
            lines.push(Line::from(""));
            lines.push(section(
                "Collections",
                state.panel_focus == Some(PanelSection::Collections),
            ));
            if meta.collections.is_empty() {
                lines.push(dim_line("  (none)"));
            } else {
                for coll in &meta.collections {
                    lines.push(Line::from(format!("  {}", coll.title)));
                }
            }
            lines
        }
        Some(SidebarTab::Details) => vec![
            title_line(&meta.display_name),
            Line::from(""),
            field("Created", opt(&meta.created)),
            field("Modified", opt(&meta.modified)),
            field("Published", opt(&meta.last_published)),
            field("By", opt(&meta.published_by)),
            field("Draft", opt(&meta.last_draft_created)),
            field("Draft by", opt(&meta.last_draft_created_by)),
        ],
        // Preview and anything else the tab set allows
        _ => {
            let mut lines = vec![title_line(&meta.display_name), Line::from("")];
            lines.push(field("Type", meta.block_type.clone()));
            lines.push(field("Status", draft_label(meta.has_unpublished_changes)));
            if let Some(published) = &meta.published_display_name {
                if *published != meta.display_name {
                    lines.push(field("Published as", published.clone()));
                }
            }
            lines
        }
    }
}

fn container_body(state: &AppState, session: &Session, container_key: &str) -> Vec<Line<'static>> {
    let Some(meta) = session.store().container(container_key) else {
        return vec![dim_line("No metadata cached")];
    };

    match session.current_tab() {
        Some(SidebarTab::Manage) => {
            let mut lines = vec![title_line(&meta.display_name), Line::from("")];
            lines.push(section(
                "Tags",
                state.panel_focus == Some(PanelSection::Tags),
            ));
            lines.push(field("Count", meta.tags_count.to_string()));
            lines.push(Line::from(""));
            lines.push(section(
                "Collections",
                state.panel_focus == Some(PanelSection::Collections),
            ));
            if meta.collections.is_empty() {
                lines.push(dim_line("  (none)"));
            } else {
                for coll in &meta.collections {
                    lines.push(Line::from(format!("  {}", coll.title)));
                }
            }
            lines
        }
        Some(SidebarTab::Usage) => vec![
            title_line(&meta.display_name),
            Line::from(""),
            field("Children", meta.children_count.to_string()),
            field("Collections", meta.collections.len().to_string()),
        ],
        Some(SidebarTab::Settings) => vec![
            title_line(&meta.display_name),
            Line::from(""),
            field("Published", opt(&meta.last_published)),
            field("By", opt(&meta.published_by)),
            field("Created", opt(&meta.created)),
            field("Modified", opt(&meta.modified)),
        ],
        _ => {
            let mut lines = vec![title_line(&meta.display_name), Line::from("")];
            lines.push(field("Type", meta.container_type.clone()));
            lines.push(field("Children", meta.children_count.to_string()));
            lines.push(field("Status", draft_label(meta.has_unpublished_changes)));
            lines
        }
    }
}

fn collection_body(session: &Session, collection_key: &str) -> Vec<Line<'static>> {
    let Some(meta) = session.store().collection(collection_key) else {
        return vec![dim_line("No metadata cached")];
    };

    match session.current_tab() {
        Some(SidebarTab::Details) => vec![
            title_line(&meta.title),
            Line::from(""),
            field("Created", opt(&meta.created)),
            field("By", opt(&meta.created_by)),
            field("Modified", opt(&meta.modified)),
        ],
        _ => {
            let mut lines = vec![title_line(&meta.title), Line::from("")];
            lines.push(field("Enabled", if meta.enabled { "yes" } else { "no" }));
            if !meta.description.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(meta.description.clone()));
            }
            lines
        }
    }
}

fn title_line(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn field(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<12}", label),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value.into()),
    ])
}

fn section(label: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    Line::from(Span::styled(format!(" {} ", label), style))
}

fn dim_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
}

fn tagged_line(tag: &str, label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  [{:<10}] ", tag),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(label.to_string()),
    ])
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "--".to_string())
}

fn draft_label(has_unpublished_changes: bool) -> &'static str {
    if has_unpublished_changes {
        "Draft"
    } else {
        "Published"
    }
}
