// Status bar component
//
// Key hints for the current route, plus the refresh interval and uptime.

use crate::router::Route;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Duration;

pub fn render(
    f: &mut Frame,
    area: Rect,
    route: Route,
    editing_search: bool,
    poll_interval: Duration,
    uptime: &str,
    theme: &Theme,
) {
    let hints = match route {
        Route::Login => "Tab next field │ Enter sign in │ Esc quit",
        Route::Dashboard if editing_search => "type to search │ Enter/Esc done",
        Route::Dashboard => {
            "←/→ 0-4 level │ / search │ ↑/↓ select │ o open │ y copy link │ l logs │ t theme │ Ctrl+L logout │ q quit"
        }
    };

    let status_text = format!(
        " {} │ ⟳ {:.1}s │ {}",
        uptime,
        poll_interval.as_secs_f32(),
        hints
    );

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(theme.muted))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
