// Title bar component
//
// App name, the signed-in account with its role badge, and the time of the
// last applied refresh.

use crate::session::{Role, Session};
use crate::tui::theme::Theme;
use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(
    f: &mut Frame,
    area: Rect,
    session: Option<&Session>,
    last_updated: Option<DateTime<Utc>>,
    theme: &Theme,
) {
    let mut spans = vec![Span::styled(
        " ◉ logstream",
        Style::default()
            .fg(theme.title)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(session) = session {
        let badge_color = match session.role {
            Role::Admin => theme.level_color(crate::api::LogLevel::Critical),
            Role::Client => theme.highlight,
            Role::Unassigned => theme.muted,
        };
        spans.push(Span::styled(" ──── ", Style::default().fg(theme.border)));
        spans.push(Span::styled(
            session.username.clone(),
            Style::default().fg(theme.foreground),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!(" {} ", role_badge(session.role)),
            Style::default()
                .fg(theme.background)
                .bg(badge_color)
                .add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(at) = last_updated {
        spans.push(Span::styled(
            format!(
                "  updated {}",
                at.with_timezone(&Local).format("%H:%M:%S")
            ),
            Style::default().fg(theme.muted),
        ));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.title)),
    );

    f.render_widget(title, area);
}

fn role_badge(role: Role) -> &'static str {
    match role {
        Role::Admin => "ADMIN",
        Role::Client => "CLIENT",
        Role::Unassigned => "NO ROLE",
    }
}
