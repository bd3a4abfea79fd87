// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - The event loop (keyboard input, timer ticks, navigation, login results)
// - Settling the auth gate between frames

pub mod app;
pub mod clipboard;
pub mod components;
pub mod theme;
pub mod ui;

use crate::api::SharedService;
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::session::SharedSession;
use anyhow::{Context, Result};
use app::{App, AppChannels};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// when done, whether or not the loop failed.
pub async fn run_tui(
    config: Config,
    service: SharedService,
    store: SharedSession,
    log_buffer: LogBuffer,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (mut app, mut channels) = App::new(&config, service, store, log_buffer);

    let result = run_event_loop(&mut terminal, &mut app, &mut channels).await;

    // Unmount before leaving so polling stops with the UI
    drop(app);

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Each turn draws a frame, settles the gate, then waits on whichever
/// source fires first: keyboard input, the redraw tick, a navigation
/// request, a finished login, or a dashboard data refresh.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    channels: &mut AppChannels,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        // A route decision changes what is on screen: redraw before waiting
        if app.settle() {
            continue;
        }

        let mut revisions = app.dashboard.as_ref().map(|view| view.subscribe());

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key)) = event::read() {
                        if key.kind == KeyEventKind::Press {
                            app.handle_key(key);
                        }
                    }
                }
            } => {}

            _ = tick_interval.tick() => app.tick(),

            Some(route) = channels.navigation.recv() => app.navigate(route),

            Some(outcome) = channels.login.recv() => app.finish_login(outcome),

            // Fresh data: loop round and redraw
            Ok(()) = async {
                match revisions.as_mut() {
                    Some(rx) => rx.changed().await,
                    None => std::future::pending().await,
                }
            } => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
