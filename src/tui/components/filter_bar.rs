// Filter bar component
//
// Level tabs, the search input and the result count.

use crate::api::LevelFilter;
use crate::filter::FilterState;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub fn render(
    f: &mut Frame,
    area: Rect,
    filter: &FilterState,
    result_count: usize,
    editing_search: bool,
    theme: &Theme,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(44),
            Constraint::Percentage(35),
            Constraint::Length(14),
        ])
        .split(area);

    // Level tabs, numbered for the 0-4 shortcuts
    let titles: Vec<Line> = LevelFilter::OPTIONS
        .iter()
        .enumerate()
        .map(|(i, level)| Line::from(format!("{} {}", i, short_label(*level))))
        .collect();
    let selected = LevelFilter::OPTIONS
        .iter()
        .position(|l| *l == filter.level)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme.muted))
        .highlight_style(
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.border))
                .title(" Level ←/→ "),
        );
    f.render_widget(tabs, columns[0]);

    // Search input
    let (text, style) = if editing_search {
        (
            format!("{}▏", filter.search),
            Style::default().fg(theme.foreground),
        )
    } else if filter.search.is_empty() {
        (
            "press / to search".to_string(),
            Style::default().fg(theme.muted),
        )
    } else {
        (filter.search.clone(), Style::default().fg(theme.foreground))
    };
    let border = if editing_search {
        theme.highlight
    } else {
        theme.border
    };
    let search = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border))
            .title(" Search "),
    );
    f.render_widget(search, columns[1]);

    let count = Paragraph::new(Line::from(vec![
        Span::styled(
            result_count.to_string(),
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" results", Style::default().fg(theme.muted)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(count, columns[2]);
}

fn short_label(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::All => "All",
        LevelFilter::Info => "Info",
        LevelFilter::Warning => "Warn",
        LevelFilter::Error => "Error",
        LevelFilter::Critical => "Crit",
    }
}
