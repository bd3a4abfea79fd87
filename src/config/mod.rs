//! Configuration for the dashboard client
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/logstream/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod logging;
mod serialization;

#[cfg(test)]
mod tests;

pub use logging::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log service location
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default refresh interval of the dashboard
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Floor for the refresh interval; anything faster just hammers the service
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(250);

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_THEME: &str = "dark";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the log service
    pub api_url: String,

    /// Dashboard refresh interval
    pub poll_interval: Duration,

    /// Per-request timeout for the HTTP client
    pub request_timeout: Duration,

    /// Where the session is persisted between runs
    pub session_file: PathBuf,

    /// Theme name: "dark" or "light"
    pub theme: String,

    /// Whether to enable the TUI (can be disabled for headless mode)
    pub enable_tui: bool,

    /// Demo mode: use the in-process demo service instead of HTTP
    pub demo_mode: bool,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            session_file: default_session_file(),
            theme: DEFAULT_THEME.to_string(),
            enable_tui: true,
            demo_mode: false,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_session_file() -> PathBuf {
    crate::session::FileSessionStore::default_path()
        .unwrap_or_else(|| PathBuf::from("./logstream-session.toml"))
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub api_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub session_file: Option<String>,
    pub theme: Option<String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/logstream/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("logstream").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        // Config::default().to_toml() is the template
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but cannot be read or parsed is fatal: the
    /// process exits with a clear message instead of running on defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - Invalid boolean values (use true/false)");
                    eprintln!("    - Numbers written as strings (poll_interval_ms = 3000)\n");
                    eprintln!("  To reset, run `logstream config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Self {
        Self::resolve(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with an environment lookup
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // API URL: env > file > default
        let api_url = env("LOGSTREAM_API_URL")
            .or(file.api_url)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.api_url);

        // Poll interval: env > file > default, never below the floor
        let poll_interval = env("LOGSTREAM_POLL_MS")
            .and_then(|v| v.parse().ok())
            .or(file.poll_interval_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval)
            .max(MIN_POLL_INTERVAL);

        // Request timeout: file > default
        let request_timeout = file
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        // Session file: env > file > default
        let session_file = env("LOGSTREAM_SESSION_FILE")
            .or(file.session_file)
            .map(PathBuf::from)
            .unwrap_or(defaults.session_file);

        // Theme: env > file > default
        let theme = env("LOGSTREAM_THEME")
            .or(file.theme)
            .unwrap_or(defaults.theme);

        // TUI toggle: env only (runtime flag)
        let enable_tui = env("LOGSTREAM_NO_TUI")
            .map(|v| v != "1" && v.to_lowercase() != "true")
            .unwrap_or(true);

        // Demo mode: env only (runtime flag)
        let demo_mode = env("LOGSTREAM_DEMO")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let logging = LoggingConfig::from_file(file.logging);

        Self {
            api_url,
            poll_interval,
            request_timeout,
            session_file,
            theme,
            enable_tui,
            demo_mode,
            logging,
        }
    }
}
