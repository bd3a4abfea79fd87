//! Log records table
//!
//! Shows the current result set in the order the service returned it. The
//! selection is kept by record id so a refresh that reshuffles rows does
//! not jump the cursor to a different record.

use crate::api::LogRecord;
use crate::tui::theme::Theme;
use crate::util::{truncate_display, FILENAME_WIDTH};
use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

#[derive(Debug, Default)]
pub struct LogsTable {
    /// Id of the selected record, if any
    selected_id: Option<String>,
}

impl LogsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the selected record within `logs`
    pub fn selected_index(&self, logs: &[LogRecord]) -> Option<usize> {
        let id = self.selected_id.as_ref()?;
        logs.iter().position(|r| &r.id == id)
    }

    /// Selected record, falling back to the first row
    pub fn selected<'a>(&self, logs: &'a [LogRecord]) -> Option<&'a LogRecord> {
        self.selected_index(logs)
            .and_then(|i| logs.get(i))
            .or_else(|| logs.first())
    }

    pub fn select_next(&mut self, logs: &[LogRecord]) {
        let next = match self.selected_index(logs) {
            Some(i) => (i + 1).min(logs.len().saturating_sub(1)),
            None => 0,
        };
        self.selected_id = logs.get(next).map(|r| r.id.clone());
    }

    pub fn select_prev(&mut self, logs: &[LogRecord]) {
        let prev = self
            .selected_index(logs)
            .map(|i| i.saturating_sub(1))
            .unwrap_or(0);
        self.selected_id = logs.get(prev).map(|r| r.id.clone());
    }

    pub fn render(&self, f: &mut Frame, area: Rect, logs: &[LogRecord], theme: &Theme, focused: bool) {
        let border = if focused { theme.highlight } else { theme.border };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border))
            .title(" Log Files ");

        if logs.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from("No Logs Found").style(Style::default().add_modifier(Modifier::BOLD)),
                Line::from("Nothing matches the current filter."),
            ])
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.muted))
            .block(block);
            f.render_widget(empty, area);
            return;
        }

        let header = Row::new(["Time", "Level", "Owner", "File"]).style(
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::BOLD),
        );

        let rows = logs.iter().map(|record| {
            let when = record
                .parsed_timestamp()
                .map(|t| t.with_timezone(&Local).format("%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| record.timestamp.clone());
            Row::new(vec![
                Cell::from(when),
                Cell::from(record.level.as_str()).style(
                    Style::default()
                        .fg(theme.level_color(record.level))
                        .add_modifier(Modifier::BOLD),
                ),
                Cell::from(record.owner.clone()),
                Cell::from(truncate_display(&record.filename, FILENAME_WIDTH).into_owned()),
            ])
            .style(Style::default().fg(theme.foreground))
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Length(9),
                Constraint::Length(12),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

        let mut state = TableState::default();
        if focused {
            state.select(self.selected_index(logs).or(Some(0)));
        }
        f.render_stateful_widget(table, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LogLevel;

    fn record(id: &str) -> LogRecord {
        LogRecord {
            id: id.to_string(),
            filename: format!("admin_{}.json", id),
            level: LogLevel::Info,
            timestamp: String::new(),
            owner: "admin".to_string(),
        }
    }

    #[test]
    fn test_selection_follows_record_across_refresh() {
        let mut table = LogsTable::new();
        let first = vec![record("a"), record("b"), record("c")];
        table.select_next(&first);
        table.select_next(&first);
        assert_eq!(table.selected(&first).map(|r| r.id.as_str()), Some("b"));

        // New record at the top pushes "b" down one row
        let refreshed = vec![record("z"), record("a"), record("b"), record("c")];
        assert_eq!(table.selected_index(&refreshed), Some(2));
    }

    #[test]
    fn test_selection_clamps_at_edges() {
        let mut table = LogsTable::new();
        let logs = vec![record("a"), record("b")];
        table.select_prev(&logs);
        assert_eq!(table.selected_index(&logs), Some(0));
        for _ in 0..5 {
            table.select_next(&logs);
        }
        assert_eq!(table.selected_index(&logs), Some(1));
    }

    #[test]
    fn test_missing_selection_falls_back_to_first_row() {
        let mut table = LogsTable::new();
        table.select_next(&[record("gone")]);
        let logs = vec![record("a")];
        assert_eq!(table.selected(&logs).map(|r| r.id.as_str()), Some("a"));
        assert!(table.selected(&[]).is_none());
    }
}
