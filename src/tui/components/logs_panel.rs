//! System logs panel
//!
//! Tail of the in-memory tracing buffer, newest at the bottom. Poll failures
//! are only ever reported here, never as user-facing errors.

use crate::logging::{LogEntry, Severity};
use crate::tui::theme::Theme;
use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, entries: &[LogEntry], theme: &Theme) {
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    entry
                        .timestamp
                        .with_timezone(&Local)
                        .format("%H:%M:%S ")
                        .to_string(),
                    Style::default().fg(theme.muted),
                ),
                Span::styled(
                    format!("{:<5} ", entry.severity.as_str()),
                    Style::default().fg(severity_color(entry.severity, theme)),
                ),
                Span::styled(entry.message.clone(), Style::default().fg(theme.foreground)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border))
            .title(" System Logs "),
    );
    f.render_widget(list, area);
}

fn severity_color(severity: Severity, theme: &Theme) -> Color {
    match severity {
        Severity::Error => theme.error,
        Severity::Warn => Color::Rgb(245, 158, 11),
        Severity::Info => theme.foreground,
        Severity::Debug | Severity::Trace => theme.muted,
    }
}
