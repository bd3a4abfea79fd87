//! Login flow
//!
//! Submits credentials, and on success writes the session and asks the
//! router for the dashboard. Only one submission may be outstanding.

use crate::api::{ApiError, SharedService};
use crate::router::{Navigator, Route};
use crate::session::{Role, Session, SharedSession};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Message shown when the service cannot be reached
pub const UNAVAILABLE_MESSAGE: &str = "Connection refused. Is the log service running?";

/// Why a login attempt did not produce a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Service rejected the credentials; carries its message
    Rejected(String),
    /// Service unreachable or returned garbage
    Unavailable,
    /// Another submission is still outstanding
    InFlight,
    /// Username or password left empty
    MissingCredentials,
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(msg) => f.write_str(msg),
            Self::Unavailable => f.write_str(UNAVAILABLE_MESSAGE),
            Self::InFlight => f.write_str("Login already in progress"),
            Self::MissingCredentials => f.write_str("Username and password are required"),
        }
    }
}

impl std::error::Error for LoginError {}

/// Credential submission against the log service
#[derive(Clone)]
pub struct LoginFlow {
    service: SharedService,
    session: SharedSession,
    navigator: Navigator,
    pending: Arc<AtomicBool>,
}

/// Clears the pending flag however the submission ends
struct PendingGuard(Arc<AtomicBool>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl LoginFlow {
    pub fn new(service: SharedService, session: SharedSession, navigator: Navigator) -> Self {
        Self {
            service,
            session,
            navigator,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a submission is outstanding (form inputs are disabled)
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Submit credentials
    pub async fn submit(&self, username: &str, password: &str) -> Result<Session, LoginError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Ignoring login re-submission while one is outstanding");
            return Err(LoginError::InFlight);
        }
        let _guard = PendingGuard(self.pending.clone());

        tracing::info!("Logging in as '{}'", username);

        let response = match self.service.login(username.trim(), password).await {
            Ok(response) => response,
            Err(e) => {
                log_transport_failure(&e);
                return Err(LoginError::Unavailable);
            }
        };

        if !response.success {
            let message = response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Invalid credentials".to_string());
            tracing::info!("Login rejected: {}", message);
            return Err(LoginError::Rejected(message));
        }

        let username = response
            .user
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| username.trim().to_string());
        let role = Role::from_label(response.role.as_deref().unwrap_or_default());

        self.session.set(&username, role);
        tracing::info!("Logged in as '{}' ({})", username, role);
        self.navigator.push(Route::Dashboard);

        Ok(Session::new(username, role))
    }
}

fn log_transport_failure(error: &ApiError) {
    match error {
        ApiError::Network(_) => tracing::warn!("Login service unreachable: {}", error),
        _ => tracing::warn!("Login response unusable: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LogQuery, LogRecord, LogService, LoginResponse, StatBucket};
    use crate::session::{MemorySessionStore, SessionStore};
    use futures::future::BoxFuture;
    use std::time::Duration;

    /// Service that knows a single account
    struct AccountService {
        delay: Duration,
        reachable: bool,
    }

    impl LogService for AccountService {
        fn login<'a>(
            &'a self,
            username: &'a str,
            password: &'a str,
        ) -> BoxFuture<'a, Result<LoginResponse, ApiError>> {
            Box::pin(async move {
                tokio::time::sleep(self.delay).await;
                if !self.reachable {
                    return Err(ApiError::Network("connection refused".into()));
                }
                if username == "admin" && password == "admin123" {
                    Ok(LoginResponse {
                        success: true,
                        user: Some("admin".into()),
                        role: Some("admin".into()),
                        message: None,
                    })
                } else {
                    Ok(LoginResponse {
                        success: false,
                        message: Some("Invalid credentials".into()),
                        ..Default::default()
                    })
                }
            })
        }

        fn logs<'a>(&'a self, _: &'a LogQuery) -> BoxFuture<'a, Result<Vec<LogRecord>, ApiError>> {
            Box::pin(async { Ok(vec![]) })
        }

        fn stats<'a>(&'a self, _: &'a str) -> BoxFuture<'a, Result<Vec<StatBucket>, ApiError>> {
            Box::pin(async { Ok(vec![]) })
        }

        fn download_url(&self, filename: &str) -> String {
            filename.to_string()
        }
    }

    fn flow(
        reachable: bool,
        delay: Duration,
    ) -> (
        LoginFlow,
        Arc<MemorySessionStore>,
        tokio::sync::mpsc::UnboundedReceiver<Route>,
    ) {
        let store = Arc::new(MemorySessionStore::new());
        let (navigator, rx) = Navigator::channel();
        let flow = LoginFlow::new(
            Arc::new(AccountService { delay, reachable }),
            store.clone(),
            navigator,
        );
        (flow, store, rx)
    }

    #[tokio::test]
    async fn test_successful_login_stores_session_and_navigates() {
        let (flow, store, mut nav) = flow(true, Duration::ZERO);

        let session = flow.submit("admin", "admin123").await.unwrap();

        assert_eq!(session, Session::new("admin", Role::Admin));
        assert_eq!(store.get(), Some(Session::new("admin", Role::Admin)));
        assert_eq!(nav.try_recv().ok(), Some(Route::Dashboard));
        assert!(!flow.is_pending());
    }

    #[tokio::test]
    async fn test_rejected_login_surfaces_server_message() {
        let (flow, store, mut nav) = flow(true, Duration::ZERO);

        let err = flow.submit("admin", "wrongpass").await.unwrap_err();

        assert_eq!(err, LoginError::Rejected("Invalid credentials".into()));
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(store.get(), None);
        assert!(nav.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_distinct_error() {
        let (flow, store, _nav) = flow(false, Duration::ZERO);

        let err = flow.submit("admin", "admin123").await.unwrap_err();

        assert_eq!(err, LoginError::Unavailable);
        assert_eq!(err.to_string(), UNAVAILABLE_MESSAGE);
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn test_empty_credentials_rejected_locally() {
        let (flow, _store, _nav) = flow(false, Duration::ZERO);
        assert_eq!(
            flow.submit("", "x").await.unwrap_err(),
            LoginError::MissingCredentials
        );
        assert_eq!(
            flow.submit("admin", "").await.unwrap_err(),
            LoginError::MissingCredentials
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmission_rejected_while_pending() {
        let (flow, store, _nav) = flow(true, Duration::from_secs(2));

        let first = {
            let flow = flow.clone();
            tokio::spawn(async move { flow.submit("admin", "admin123").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(flow.is_pending());

        assert_eq!(
            flow.submit("admin", "admin123").await.unwrap_err(),
            LoginError::InFlight
        );

        assert!(first.await.unwrap().is_ok());
        assert!(!flow.is_pending());
        assert!(store.get().is_some());
    }
}
