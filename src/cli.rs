// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - config --show/--reset/--edit/--path: configuration management
// - login/logout/whoami: session management without the TUI
// - watch: headless dashboard that prints every refresh
// - link/upload: one-shot calls against the log service

use crate::api::{HttpLogService, LevelFilter, SharedService};
use crate::config::{Config, VERSION};
use crate::dashboard::{DashboardSnapshot, DashboardView};
use crate::login::LoginFlow;
use crate::router::Navigator;
use crate::session::SharedSession;
use crate::util::{truncate_display, FILENAME_WIDTH};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::Command;

/// logstream - live dashboard for a remote log service
#[derive(Parser)]
#[command(name = "logstream")]
#[command(version = VERSION)]
#[command(about = "Live dashboard for a remote log service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Log in and store the session
    Login {
        username: String,

        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// Print the dashboard on every refresh until Ctrl+C
    Watch {
        /// Level filter: ALL, INFO, WARNING, ERROR, CRITICAL
        #[arg(long, default_value_t = LevelFilter::All)]
        level: LevelFilter,

        /// Search text matched by the service
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Print a pre-signed link for a log file
    Link {
        log_id: String,

        /// Link that downloads instead of displaying
        #[arg(long)]
        download: bool,
    },

    /// Upload a log file
    Upload {
        file: PathBuf,

        /// Level label stored with the file
        #[arg(long)]
        level: String,

        /// Owning account (defaults to the logged-in user)
        #[arg(long)]
        owner: Option<String>,
    },
}

/// Handle `config` subcommands. `Ok(true)` means one ran and the process
/// should exit.
pub fn handle_config_command(cli: &Cli) -> Result<bool> {
    let Some(Commands::Config {
        show,
        reset,
        edit,
        path,
    }) = &cli.command
    else {
        return Ok(false);
    };

    match (*path, *show, *reset, *edit) {
        (true, ..) => println!("{}", config_file()?.display()),
        (_, true, ..) => show_config(),
        (_, _, true, _) => reset_config()?,
        (_, _, _, true) => edit_config()?,
        _ => println!(
            "Usage: logstream config [--show|--reset|--edit|--path]\n\n\
             Options:\n  \
             --show    Print the effective configuration\n  \
             --reset   Overwrite the config file with defaults\n  \
             --edit    Open the config file in $EDITOR\n  \
             --path    Print the config file location"
        ),
    }
    Ok(true)
}

fn config_file() -> Result<PathBuf> {
    Config::config_path().context("Could not determine the config directory")
}

fn show_config() {
    let config = Config::from_env();
    let source = match Config::config_path() {
        Some(path) if path.exists() => path.display().to_string(),
        _ => "defaults (no config file)".to_string(),
    };

    println!("# Effective configuration (env > file > defaults)");
    println!("# Source: {}\n", source);
    print!("{}", config.to_toml());
    println!("\n# Runtime flags (environment only)");
    println!("# LOGSTREAM_NO_TUI -> enable_tui = {}", config.enable_tui);
    println!("# LOGSTREAM_DEMO   -> demo_mode = {}", config.demo_mode);
}

fn reset_config() -> Result<()> {
    let path = config_file()?;

    if path.exists() && !confirm(&format!("Overwrite {}?", path.display()))? {
        println!("Aborted.");
        return Ok(());
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    eprint!("{} [y/N] ", question);
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn edit_config() -> Result<()> {
    let path = config_file()?;
    if !path.exists() {
        Config::ensure_config_exists();
    }

    let editor = ["EDITOR", "VISUAL"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .unwrap_or_else(|| if cfg!(windows) { "notepad" } else { "nano" }.to_string());

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .with_context(|| format!("Failed to launch '{}' (set $EDITOR)", editor))?;
    if !status.success() {
        bail!("{} exited with {}", editor, status);
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Service commands
// ─────────────────────────────────────────────────────────────────────────────

/// Run a non-config subcommand against the configured service
pub async fn run_command(
    command: Commands,
    config: &Config,
    service: SharedService,
    store: SharedSession,
) -> Result<()> {
    match command {
        Commands::Config { .. } => Ok(()),
        Commands::Login { username, password } => login(service, store, &username, password).await,
        Commands::Logout => {
            store.clear();
            println!("Logged out.");
            Ok(())
        }
        Commands::Whoami => {
            match store.get() {
                Some(s) => println!("{} ({})", s.username, s.role),
                None => println!("Not logged in."),
            }
            Ok(())
        }
        Commands::Watch { level, search } => watch(config, service, store, level, search).await,
        Commands::Link { log_id, download } => {
            let client = http_client(config)?;
            let url = client
                .presigned_link(&log_id, download)
                .await
                .with_context(|| format!("Could not resolve link for log {}", log_id))?;
            println!("{}", url);
            Ok(())
        }
        Commands::Upload { file, level, owner } => {
            let owner = match owner.or_else(|| store.get().map(|s| s.username)) {
                Some(owner) => owner,
                None => bail!("No owner given and not logged in (use --owner or `logstream login`)"),
            };
            let client = http_client(config)?;
            let log_id = client
                .upload(&file, &level.to_uppercase(), &owner)
                .await
                .with_context(|| format!("Upload of {} failed", file.display()))?;
            println!("Uploaded {} as {}", file.display(), log_id);
            Ok(())
        }
    }
}

/// Direct HTTP client for endpoints outside the dashboard service trait
fn http_client(config: &Config) -> Result<HttpLogService> {
    if config.demo_mode {
        bail!("This command talks to a real log service and is not available in demo mode");
    }
    HttpLogService::new(&config.api_url, config.request_timeout)
        .context("Failed to create HTTP client")
}

async fn login(
    service: SharedService,
    store: SharedSession,
    username: &str,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };

    // Nothing routes in CLI mode; the navigation request is dropped
    let (navigator, _routes) = Navigator::channel();
    let flow = LoginFlow::new(service, store, navigator);

    match flow.submit(username, &password).await {
        Ok(session) => {
            println!("Logged in as {} ({})", session.username, session.role);
            Ok(())
        }
        Err(e) => bail!("{}", e),
    }
}

fn prompt_password() -> Result<String> {
    eprint!("Password (input is echoed): ");
    let _ = std::io::stderr().flush();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Headless dashboard: mount, print each refresh, stop on Ctrl+C
pub async fn watch(
    config: &Config,
    service: SharedService,
    store: SharedSession,
    level: LevelFilter,
    search: String,
) -> Result<()> {
    crate::startup::print_startup(config, store.get().as_ref());

    let Some(mut view) = DashboardView::mount(service, store, config.poll_interval) else {
        bail!("Not logged in. Run `logstream login <username>` first.");
    };
    view.set_level(level);
    view.set_search(search);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, stopping watch");
            Ok(())
        }
        result = follow(&view, |snapshot| print_snapshot(&snapshot)) => result,
    }
}

/// Hand each refresh to `on_refresh` until the poll loop stops
async fn follow(view: &DashboardView, mut on_refresh: impl FnMut(DashboardSnapshot)) -> Result<()> {
    let mut revisions = view.subscribe();
    while revisions.changed().await.is_ok() {
        if !view.is_polling() {
            bail!("Session ended. Run `logstream login <username>` to sign in again.");
        }
        on_refresh(view.snapshot());
    }
    Ok(())
}

fn print_snapshot(snapshot: &DashboardSnapshot) {
    println!(
        "── {} ({}) · {} · search {:?} · {} results ──",
        snapshot.session_view.username,
        snapshot.session_view.role,
        snapshot.filter.level.label(),
        snapshot.filter.search,
        snapshot.result_count
    );

    if snapshot.stats.is_empty() {
        println!("  stats: none");
    } else {
        let stats: Vec<String> = snapshot
            .stats
            .iter()
            .map(|b| format!("{}={}", b.name, b.value))
            .collect();
        println!("  stats: {}", stats.join("  "));
    }

    if snapshot.filtered_logs.is_empty() {
        println!("  No logs found");
    }
    for record in &snapshot.filtered_logs {
        let when = record
            .parsed_timestamp()
            .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| record.timestamp.clone());
        println!(
            "  {:<19}  {:<8}  {:<12}  {}",
            when,
            record.level.as_str(),
            record.owner,
            truncate_display(&record.filename, FILENAME_WIDTH)
        );
    }
    println!();
}
