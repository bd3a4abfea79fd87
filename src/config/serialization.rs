//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

/// Escape a value for a TOML basic string
fn toml_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        format!(
            r#"# logstream configuration

# Log service base URL (LOGSTREAM_API_URL overrides)
api_url = "{api_url}"

# Dashboard refresh interval in milliseconds (LOGSTREAM_POLL_MS overrides)
poll_interval_ms = {poll_ms}

# Per-request timeout in seconds
request_timeout_secs = {timeout}

# Where the login session is kept (LOGSTREAM_SESSION_FILE overrides)
session_file = "{session_file}"

# Theme: dark, light (LOGSTREAM_THEME overrides)
theme = "{theme}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            api_url = toml_escape(&self.api_url),
            poll_ms = self.poll_interval.as_millis(),
            timeout = self.request_timeout.as_secs(),
            session_file = toml_escape(&self.session_file.display().to_string()),
            theme = toml_escape(&self.theme),
            log_level = toml_escape(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = toml_escape(&self.logging.file_dir.display().to_string()),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = toml_escape(&self.logging.file_prefix),
        )
    }
}
