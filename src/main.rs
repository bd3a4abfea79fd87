// logstream - Live dashboard for a remote log service
//
// Logs in against the service, keeps the session on disk, and shows the
// account's log records and per-level statistics, refreshed on a timer.
//
// Architecture:
// - api: LogService trait, HTTP client (reqwest) and wire types
// - session / router: persisted session and the auth-gated routes
// - login / dashboard / poll: login flow, dashboard view, refresh loop
// - tui (ratatui): interactive terminal front end
// - cli (clap): config management, headless watch, one-shot commands

mod api;
mod cli;
mod config;
mod dashboard;
mod demo;
mod filter;
mod logging;
mod login;
mod poll;
mod router;
mod session;
mod startup;
mod tui;
mod util;

use anyhow::{Context, Result};
use api::{HttpLogService, SharedService};
use clap::Parser;
use config::{Config, LogRotation};
use logging::{LogBuffer, TuiLogLayer};
use session::{FileSessionStore, SharedSession};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the tracing subscriber.
///
/// In TUI mode events go to the in-memory buffer (prevents garbling the
/// display); otherwise to stderr. File logging is added on top when enabled.
/// The returned guard must live until exit so buffered file writes flush.
fn init_tracing(config: &Config, tui_mode: bool, log_buffer: &LogBuffer) -> Option<WorkerGuard> {
    // Precedence: RUST_LOG env var > config file > default "info"
    let default_filter = format!("logstream={},reqwest=warn", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let tui_layer = tui_mode.then(|| TuiLogLayer::new(log_buffer.clone()));
    let stderr_layer =
        (!tui_mode).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let (file_layer, guard) = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let dir = &config.logging.file_dir;
                let prefix = &config.logging.file_prefix;
                let file_appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(dir, prefix),
                    LogRotation::Daily => tracing_appender::rolling::daily(dir, prefix),
                    LogRotation::Never => tracing_appender::rolling::never(dir, prefix),
                };

                // Writes happen on a background thread; JSON for structured parsing
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tui_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Config subcommands run before anything else is set up
    if cli::handle_config_command(&cli)? {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::from_env();

    let tui_mode = cli.command.is_none() && config.enable_tui;
    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config, tui_mode, &log_buffer);

    let store: SharedSession = Arc::new(FileSessionStore::new(&config.session_file));

    // Demo mode swaps the HTTP client for the in-process service
    let (demo_shutdown_tx, demo_shutdown_rx) = tokio::sync::oneshot::channel();
    let mut demo_handle = None;
    let service: SharedService = if config.demo_mode {
        tracing::info!("Running in DEMO MODE - in-process log service");
        let demo = Arc::new(demo::DemoService::seeded(12));
        demo_handle = Some(tokio::spawn(demo::run_generator(
            demo.clone(),
            demo_shutdown_rx,
        )));
        demo
    } else {
        let client = HttpLogService::new(&config.api_url, config.request_timeout)
            .context("Failed to create HTTP client")?;
        Arc::new(client)
    };

    let result = match cli.command {
        Some(command) => cli::run_command(command, &config, service, store).await,
        None if tui_mode => {
            startup::log_startup(&config);
            tracing::info!("Starting TUI");
            tui::run_tui(config, service, store, log_buffer).await
        }
        None => {
            tracing::info!("TUI disabled, running headless watch");
            cli::watch(&config, service, store, Default::default(), String::new()).await
        }
    };

    // Stop the demo generator, if any
    let _ = demo_shutdown_tx.send(());
    if let Some(handle) = demo_handle {
        let _ = handle.await;
    }

    tracing::debug!("Shutdown complete");
    result
}
