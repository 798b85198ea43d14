use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::keys::HELP;
use crate::state::Session;
use crate::types::{Indicator, Mode, RowView};

use super::theme::Theme;

/// Rows taken by the header and footer around the tree body.
pub const CHROME_HEIGHT: u16 = 3 + 2;

pub fn draw(frame: &mut Frame, session: &Session, theme: &Theme) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    frame.render_widget(Paragraph::new(header_lines(session, theme)), header);
    draw_tree(frame, body, session, theme);
    frame.render_widget(Paragraph::new(footer_lines(session, theme)), footer);

    if session.show_help() {
        draw_help(frame, session, theme);
    }
}

fn draw_tree(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let block = Block::default().borders(Borders::ALL).border_style(theme.border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = usize::from(inner.height);
    // keep the cursor roughly centered
    let offset = session.cursor().saturating_sub(height / 2);
    let lines: Vec<Line> = session
        .rows_window(offset, height)
        .iter()
        .map(|row| row_line(row, theme))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn row_line(row: &RowView, theme: &Theme) -> Line<'static> {
    let icon = match row.indicator {
        Indicator::Expanded => "▼ ",
        Indicator::Collapsed => "▶ ",
        Indicator::Leaf => "  ",
    };
    let mut spans = vec![Span::raw("  ".repeat(row.depth)), Span::raw(icon)];
    if !row.key.is_empty() {
        spans.push(Span::styled(row.key.clone(), theme.key));
        spans.push(Span::raw(": "));
    }
    spans.push(Span::styled(row.hint.clone(), theme.value_style(row.kind)));

    let line = Line::from(spans);
    if row.is_cursor {
        line.style(theme.cursor)
    } else if row.is_match {
        line.style(theme.matched)
    } else {
        line
    }
}

fn format_size(bytes: u64) -> String {
    format!("{:.1}KB", bytes as f64 / 1024.0)
}

fn header_lines(session: &Session, theme: &Theme) -> Vec<Line<'static>> {
    let meta = session.metadata();
    let title = match &meta.filename {
        Some(name) => format!("snappy-tree - {name}"),
        None => "snappy-tree".to_string(),
    };
    let stats = match meta.size {
        Some(size) => format!("Size: {} | Nodes: {}", format_size(size), meta.node_count),
        None => format!("Nodes: {}", meta.node_count),
    };
    let first = Line::from(vec![
        Span::styled(title, theme.header),
        Span::raw("     "),
        Span::styled(stats, theme.status),
    ]);

    let input = session.input();
    let second = match session.mode() {
        Mode::FilterInput => Span::styled(format!("Filter: {input}█"), theme.filter),
        Mode::QueryInput => Span::styled(format!("JSONPath: {input}█"), theme.query),
        Mode::SearchInput => Span::styled(format!("Search: {input}█"), theme.search),
        Mode::GotoInput => Span::styled(format!("Goto: {input}█"), theme.goto),
        Mode::Normal => normal_status(session, theme),
    };
    vec![first, Line::from(second), Line::default()]
}

fn normal_status(session: &Session, theme: &Theme) -> Span<'static> {
    let status = session.match_status();
    if status.count > 0 {
        return Span::styled(
            format!("Search \"{}\": {}/{}", session.search_term(), status.position, status.count),
            theme.search,
        );
    }
    if let Some(query) = session.active_query() {
        return Span::styled(format!("Active JSONPath: {query}"), theme.query);
    }
    if !session.filter().is_empty() {
        return Span::styled(format!("Active Filter: {}", session.filter()), theme.filter);
    }
    match session.current_path() {
        Some(path) => Span::styled(format!("Path: {path}"), theme.breadcrumb),
        None => Span::raw(""),
    }
}

fn footer_lines(session: &Session, theme: &Theme) -> Vec<Line<'static>> {
    let (text, style) = match session.mode() {
        Mode::FilterInput => ("Press Enter to apply filter, Esc to cancel", theme.filter),
        Mode::QueryInput => ("Press Enter to apply JSONPath, Esc to cancel", theme.query),
        Mode::SearchInput => ("Press Enter to search, Esc to cancel", theme.search),
        Mode::GotoInput => ("Press Enter to goto path, Esc to cancel", theme.goto),
        Mode::Normal if session.config().show_help => ("Press ? for help", theme.status),
        Mode::Normal => ("", theme.status),
    };
    let hint = Span::styled(text, style);
    vec![Line::default(), Line::from(hint)]
}

fn draw_help(frame: &mut Frame, session: &Session, theme: &Theme) {
    let mut lines = vec![Line::styled("━━━ Help ━━━", theme.header), Line::default()];
    for (group, bindings) in HELP {
        if *group == "Clipboard" && !session.config().enable_clipboard {
            continue;
        }
        lines.push(Line::styled(format!("{group}:"), theme.status));
        for (keys, what) in *bindings {
            lines.push(Line::from(format!("  {keys:<26}{what}")));
        }
        lines.push(Line::default());
    }
    lines.push(Line::styled("Press ? to close help", theme.header));

    let area = centered(frame.area(), 64, lines.len() as u16 + 2);
    frame.render_widget(Clear, area);
    let block = Block::default().borders(Borders::ALL).border_style(theme.border);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
