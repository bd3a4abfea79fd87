//! Log service API
//!
//! The dashboard talks to the remote log service only through the
//! [`LogService`] trait. `HttpLogService` is the real client; the demo
//! backend and the test fakes implement the same trait.

mod client;
mod models;

pub use client::HttpLogService;
pub use models::{
    LevelFilter, LinkResponse, LogLevel, LogQuery, LogRecord, LoginRequest, LoginResponse,
    StatBucket, UploadResponse,
};

use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Errors returned by the log service client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Service unreachable, timed out, or connection dropped
    Network(String),
    /// Service answered with a non-success status and no usable body
    Status { status: u16, message: String },
    /// Body could not be decoded into the expected shape
    Malformed(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Status { status, message } => write!(f, "HTTP {}: {}", status, message),
            Self::Malformed(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Remote log storage and query service
pub trait LogService: Send + Sync {
    /// Submit credentials. Rejections come back as `Ok` with `success: false`.
    fn login<'a>(
        &'a self,
        username: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<LoginResponse, ApiError>>;

    /// Query log records for a user, filtered server-side
    fn logs<'a>(&'a self, query: &'a LogQuery) -> BoxFuture<'a, Result<Vec<LogRecord>, ApiError>>;

    /// Account-wide per-level counts
    fn stats<'a>(&'a self, user: &'a str) -> BoxFuture<'a, Result<Vec<StatBucket>, ApiError>>;

    /// Link that serves a stored log file directly
    fn download_url(&self, filename: &str) -> String;
}

/// Service handle shared between the login flow and the poll controller
pub type SharedService = Arc<dyn LogService>;
