// Dashboard view - the protected screen
//
// Mounting the view creates its filter state and starts polling; dropping
// it stops polling. Filter edits restart the poll loop whenever the
// effective {level, search} pair changes.

use crate::api::{LevelFilter, LogRecord, SharedService, StatBucket};
use crate::filter::FilterState;
use crate::poll::{PollController, SharedDisplay};
use crate::router::{Navigator, Route};
use crate::session::{Session, SharedSession};
use std::sync::PoisonError;
use std::time::Duration;
use tokio::sync::watch;

/// Everything the presentation layer reads for one frame
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub session_view: Session,
    pub filter: FilterState,
    pub filtered_logs: Vec<LogRecord>,
    pub stats: Vec<StatBucket>,
    pub result_count: usize,
}

/// A mounted dashboard
pub struct DashboardView {
    session_view: Session,
    service: SharedService,
    store: SharedSession,
    filter: FilterState,
    poller: PollController,
}

impl DashboardView {
    /// Mount the dashboard for the stored session.
    ///
    /// Returns `None` when there is no session; the caller should be on the
    /// login route in that case.
    pub fn mount(service: SharedService, store: SharedSession, interval: Duration) -> Option<Self> {
        let session_view = store.get()?;
        tracing::info!("Dashboard mounted for '{}'", session_view.username);

        let mut poller = PollController::new(service.clone(), store.clone(), interval);
        let filter = FilterState::default();
        poller.start(filter.clone());

        Some(Self {
            session_view,
            service,
            store,
            filter,
            poller,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session_view
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn display(&self) -> SharedDisplay {
        self.poller.display()
    }

    /// Revision counter bumped whenever displayed data changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.poller.subscribe()
    }

    /// False once the poll loop stopped, e.g. on a cleared session
    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    pub fn set_level(&mut self, level: LevelFilter) {
        let previous = self.filter.clone();
        self.filter.set_level(level);
        self.restart_if_changed(previous);
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        let previous = self.filter.clone();
        self.filter.set_search(text);
        self.restart_if_changed(previous);
    }

    fn restart_if_changed(&mut self, previous: FilterState) {
        if previous != self.filter {
            self.poller.start(self.filter.clone());
        }
    }

    /// Read contract for the presentation layer
    pub fn snapshot(&self) -> DashboardSnapshot {
        let display = self.poller.display();
        let display = display.lock().unwrap_or_else(PoisonError::into_inner);
        DashboardSnapshot {
            session_view: self.session_view.clone(),
            filter: self.filter.clone(),
            filtered_logs: display.logs.clone(),
            stats: display.stats.clone(),
            result_count: display.logs.len(),
        }
    }

    /// Link serving a record's stored file
    pub fn download_link(&self, record: &LogRecord) -> String {
        self.service.download_url(&record.filename)
    }

    /// Clear the session and leave for the login route. Consumes the view,
    /// which stops polling.
    pub fn logout(self, navigator: &Navigator) {
        tracing::info!("Logging out '{}'", self.session_view.username);
        self.store.clear();
        drop(self);
        navigator.push(Route::Login);
    }
}

impl Drop for DashboardView {
    fn drop(&mut self) {
        self.poller.stop();
        tracing::debug!("Dashboard unmounted");
    }
}
