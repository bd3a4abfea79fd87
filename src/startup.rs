// Startup module - banner and backend status
//
// Headless mode prints the banner to stdout before the first snapshot; TUI
// mode writes the same information into the system log panel.

use crate::config::{Config, VERSION};
use crate::session::Session;

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Where dashboard data comes from
fn backend_label(config: &Config) -> String {
    if config.demo_mode {
        "in-process demo service".to_string()
    } else {
        config.api_url.clone()
    }
}

/// Print the startup banner (headless mode)
pub fn print_startup(config: &Config, session: Option<&Session>) {
    use colors::*;

    println!();
    println!("  {BOLD}{CYAN}logstream{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}Live log dashboard{RESET}");
    println!();

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET}  {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET}  {DIM}(using defaults){RESET}");
        }
    }

    match session {
        Some(s) => println!(
            "  {DIM}Session:{RESET} {GREEN}✓{RESET} {} {DIM}({}){RESET}",
            s.username, s.role
        ),
        None => println!("  {DIM}Session:{RESET} {DIM}○ not logged in{RESET}"),
    }
    println!();

    println!(
        "  {MAGENTA}▸{RESET} Polling {BOLD}{}{RESET} every {}ms",
        backend_label(config),
        config.poll_interval.as_millis()
    );
    if config.demo_mode {
        println!("  {YELLOW}▸{RESET} {YELLOW}Demo mode active{RESET} {DIM}(try admin / admin123){RESET}");
    }
    println!();
}

/// Write startup messages to the system log panel (TUI mode)
pub fn log_startup(config: &Config) {
    tracing::info!("logstream v{}", VERSION);
    tracing::info!("▸ Backend: {}", backend_label(config));
    tracing::info!("▸ Poll interval: {}ms", config.poll_interval.as_millis());
    tracing::info!("▸ Session file: {}", config.session_file.display());
    if config.demo_mode {
        tracing::info!("▸ Demo mode active (admin/admin123, client_user/client123)");
    }
}
