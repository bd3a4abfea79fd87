// UI rendering logic
//
// One draw function per frame. What gets drawn comes from the router's
// render decision: the verifying placeholder, the login form, or the
// dashboard read from a fresh snapshot.

use super::app::App;
use super::components::{filter_bar, logs_panel, stats_chart, status_bar, title_bar};
use super::theme::Theme;
use crate::router::{Render, Route};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Paragraph},
    Frame,
};
use std::sync::PoisonError;

/// Height of the system log panel when shown
const LOGS_PANEL_HEIGHT: u16 = 8;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &App) {
    let theme = app.theme.theme();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        f.area(),
    );

    match app.router.render() {
        Render::Placeholder => render_placeholder(f, f.area(), &theme),
        Render::Content(Route::Login) => render_login(f, app, &theme),
        Render::Content(Route::Dashboard) => match app.dashboard.as_ref() {
            Some(_) => render_dashboard(f, app, &theme),
            // Authorized but not mounted yet; settles on the next turn
            None => render_placeholder(f, f.area(), &theme),
        },
    }

    if let Some(toast) = &app.toast {
        toast.render(f, f.area(), &theme);
    }
}

fn render_placeholder(f: &mut Frame, area: Rect, theme: &Theme) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    let text = Paragraph::new("Verifying secure session…")
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::ITALIC),
        );
    f.render_widget(text, middle);
}

fn render_login(f: &mut Frame, app: &App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(12),   // Form
            Constraint::Length(2), // Status bar
        ])
        .split(f.area());

    title_bar::render(f, chunks[0], None, None, theme);
    app.login_form.render(f, chunks[1], theme, app.demo_mode);
    status_bar::render(
        f,
        chunks[2],
        Route::Login,
        false,
        app.poll_interval,
        &app.uptime(),
        theme,
    );
}

fn render_dashboard(f: &mut Frame, app: &App, theme: &Theme) {
    let Some(view) = app.dashboard.as_ref() else {
        return;
    };
    let snapshot = view.snapshot();
    let last_updated = view
        .display()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .last_updated;

    let logs_height = if app.show_logs { LOGS_PANEL_HEIGHT } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),           // Title bar
            Constraint::Length(3),           // Filter bar
            Constraint::Min(8),              // Chart + table
            Constraint::Length(logs_height), // System logs
            Constraint::Length(2),           // Status bar
        ])
        .split(f.area());

    title_bar::render(
        f,
        chunks[0],
        Some(&snapshot.session_view),
        last_updated,
        theme,
    );
    filter_bar::render(
        f,
        chunks[1],
        &snapshot.filter,
        snapshot.result_count,
        app.editing_search,
        theme,
    );

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[2]);
    stats_chart::render(f, main[0], &snapshot.stats, theme);
    app.logs_table.render(
        f,
        main[1],
        &snapshot.filtered_logs,
        theme,
        !app.editing_search,
    );

    if app.show_logs {
        let visible = LOGS_PANEL_HEIGHT.saturating_sub(2) as usize;
        logs_panel::render(f, chunks[3], &app.log_buffer.recent(visible), theme);
    }

    status_bar::render(
        f,
        chunks[4],
        Route::Dashboard,
        app.editing_search,
        app.poll_interval,
        &app.uptime(),
        theme,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::demo::DemoService;
    use crate::logging::LogBuffer;
    use crate::session::{MemorySessionStore, Role, Session};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn draw_app(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        screen_text(&terminal)
    }

    #[tokio::test]
    async fn test_protected_route_shows_placeholder_until_settled() {
        let store = Arc::new(MemorySessionStore::new());
        let (mut app, _channels) = App::new(
            &Config::default(),
            Arc::new(DemoService::seeded(3)),
            store,
            LogBuffer::with_capacity(8),
        );

        assert!(draw_app(&app).contains("Verifying secure session"));

        app.settle();
        let screen = draw_app(&app);
        assert!(!screen.contains("Verifying secure session"));
        assert!(screen.contains("Username"));
    }

    #[tokio::test]
    async fn test_dashboard_renders_after_mount() {
        let store = Arc::new(MemorySessionStore::with_session(Session::new(
            "admin",
            Role::Admin,
        )));
        let (mut app, _channels) = App::new(
            &Config::default(),
            Arc::new(DemoService::seeded(3)),
            store,
            LogBuffer::with_capacity(8),
        );
        app.settle();

        let screen = draw_app(&app);
        assert!(screen.contains("admin"));
        assert!(screen.contains("ADMIN"));
        assert!(screen.contains("0 results"));
    }
}
