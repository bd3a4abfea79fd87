//! Wire types for the log service API
//!
//! These mirror the JSON bodies returned by the service. Records are kept as
//! received: the client never re-sorts or re-filters them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Levels
// ─────────────────────────────────────────────────────────────────────────────

/// Severity label carried by a stored log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    /// Any label the client does not know about
    #[serde(other)]
    Unknown,
}

impl LogLevel {
    /// Levels a record can be generated with, lowest severity first
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level selector offered by the dashboard filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Info,
    Warning,
    Error,
    Critical,
}

impl LevelFilter {
    /// Filter options in the order the filter bar shows them
    pub const OPTIONS: [LevelFilter; 5] = [
        LevelFilter::All,
        LevelFilter::Info,
        LevelFilter::Warning,
        LevelFilter::Error,
        LevelFilter::Critical,
    ];

    /// Value sent as the `level` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            LevelFilter::All => "ALL",
            LevelFilter::Info => "INFO",
            LevelFilter::Warning => "WARNING",
            LevelFilter::Error => "ERROR",
            LevelFilter::Critical => "CRITICAL",
        }
    }

    /// Human label for the filter bar
    pub fn label(&self) -> &'static str {
        match self {
            LevelFilter::All => "All Levels",
            other => other.as_query(),
        }
    }

    /// Whether a record level passes this filter
    pub fn matches(&self, level: LogLevel) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Info => level == LogLevel::Info,
            LevelFilter::Warning => level == LogLevel::Warning,
            LevelFilter::Error => level == LogLevel::Error,
            LevelFilter::Critical => level == LogLevel::Critical,
        }
    }

    fn position(&self) -> usize {
        Self::OPTIONS.iter().position(|o| o == self).unwrap_or(0)
    }

    /// Next option, wrapping around
    pub fn next(self) -> Self {
        Self::OPTIONS[(self.position() + 1) % Self::OPTIONS.len()]
    }

    /// Previous option, wrapping around
    pub fn prev(self) -> Self {
        let len = Self::OPTIONS.len();
        Self::OPTIONS[(self.position() + len - 1) % len]
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for LevelFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" | "" => Ok(LevelFilter::All),
            "INFO" => Ok(LevelFilter::Info),
            "WARNING" | "WARN" => Ok(LevelFilter::Warning),
            "ERROR" => Ok(LevelFilter::Error),
            "CRITICAL" => Ok(LevelFilter::Critical),
            other => Err(format!(
                "unknown level '{}' (expected ALL, INFO, WARNING, ERROR or CRITICAL)",
                other
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// Metadata for one stored log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: String,
    pub filename: String,
    pub level: LogLevel,
    /// Timestamp exactly as the service rendered it
    #[serde(default)]
    pub timestamp: String,
    pub owner: String,
}

impl LogRecord {
    /// Parse the timestamp. The service emits either RFC 3339 or an HTTP
    /// date (RFC 2822 style) depending on its JSON encoder.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .or_else(|_| DateTime::parse_from_rfc2822(&self.timestamp))
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}

/// Per-level record count for the distribution chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBucket {
    pub name: String,
    pub value: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests / responses
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters of one log query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub user: String,
    pub level: LevelFilter,
    pub search: String,
}

/// Body of `POST /api/login`
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `POST /api/login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of the pre-signed link endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct LinkResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `POST /api/upload-log`
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub log_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
