//! Poll controller - keeps the dashboard collections fresh
//!
//! One controller per dashboard view. `start` (re)launches a timed loop that
//! runs a fetch cycle immediately and then once per interval; `stop` (or
//! drop) tears it down. A fetch cycle queries logs and stats concurrently and
//! each successful response wholly replaces its collection.
//!
//! # Stale responses
//!
//! Every `start`/`stop` bumps a generation counter stored inside the shared
//! display state. A cycle remembers the generation it was launched under and
//! its writes are applied under the display mutex only while that generation
//! is still current. A response belonging to a superseded filter therefore
//! can never overwrite newer data, even if it resolves late.

use crate::api::{LogRecord, SharedService, StatBucket};
use crate::filter::FilterState;
use crate::session::SharedSession;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Collections currently on screen
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    pub logs: Vec<LogRecord>,
    pub stats: Vec<StatBucket>,
    /// Time of the last applied response
    pub last_updated: Option<DateTime<Utc>>,
    generation: u64,
    /// The loop for the current generation stopped on a cleared session
    session_ended: bool,
}

impl DisplayState {
    /// Replace the log collection if `token` is still current
    fn apply_logs(&mut self, token: CycleToken, logs: Vec<LogRecord>) -> bool {
        if token.0 != self.generation {
            return false;
        }
        self.logs = logs;
        self.last_updated = Some(Utc::now());
        true
    }

    /// Replace the stats collection if `token` is still current
    fn apply_stats(&mut self, token: CycleToken, stats: Vec<StatBucket>) -> bool {
        if token.0 != self.generation {
            return false;
        }
        self.stats = stats;
        self.last_updated = Some(Utc::now());
        true
    }
}

/// Display state shared between the view and its poll task
pub type SharedDisplay = Arc<Mutex<DisplayState>>;

/// Generation a cycle was launched under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CycleToken(u64);

/// Drives the periodic fetch loop for one dashboard view
pub struct PollController {
    service: SharedService,
    session: SharedSession,
    interval: Duration,
    display: SharedDisplay,
    revision: Arc<watch::Sender<u64>>,
    task: Option<JoinHandle<()>>,
}

impl PollController {
    pub fn new(service: SharedService, session: SharedSession, interval: Duration) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            service,
            session,
            interval,
            display: Arc::new(Mutex::new(DisplayState::default())),
            revision: Arc::new(revision),
            task: None,
        }
    }

    pub fn display(&self) -> SharedDisplay {
        self.display.clone()
    }

    /// Counter bumped once per cycle that applied a write, and once more
    /// when the loop stops on a cleared session
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn is_running(&self) -> bool {
        let ended = self
            .display
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .session_ended;
        !ended && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel any running loop and start a new one under `filter`
    pub fn start(&mut self, filter: FilterState) {
        let token = self.invalidate();
        if let Some(task) = self.task.take() {
            task.abort();
        }

        tracing::debug!(
            "Poll cycle {} starting (level={}, search={:?})",
            token.0,
            filter.level,
            filter.search
        );

        let worker = PollWorker {
            service: self.service.clone(),
            session: self.session.clone(),
            display: self.display.clone(),
            revision: self.revision.clone(),
            token,
            filter,
        };
        self.task = Some(tokio::spawn(worker.run(self.interval)));
    }

    /// Cancel the timer; in-flight results are discarded
    pub fn stop(&mut self) {
        self.invalidate();
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Poll loop stopped");
        }
    }

    /// Advance the generation, returning the new current token
    fn invalidate(&self) -> CycleToken {
        let mut display = self.display.lock().unwrap_or_else(PoisonError::into_inner);
        display.generation += 1;
        display.session_ended = false;
        CycleToken(display.generation)
    }
}

impl Drop for PollController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// State moved into the spawned poll task
struct PollWorker {
    service: SharedService,
    session: SharedSession,
    display: SharedDisplay,
    revision: Arc<watch::Sender<u64>>,
    token: CycleToken,
    filter: FilterState,
}

impl PollWorker {
    async fn run(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // First tick completes immediately
            ticker.tick().await;

            let Some(session) = self.session.get() else {
                tracing::info!("Session cleared, stopping poll loop");
                if self.apply(|d| {
                    let current = d.generation == self.token.0;
                    d.session_ended |= current;
                    current
                }) {
                    self.bump();
                }
                return;
            };
            self.cycle(&session.username).await;
        }
    }

    /// One logs + stats round trip
    async fn cycle(&self, user: &str) {
        let query = self.filter.query_for(user);

        let logs = async {
            match self.service.logs(&query).await {
                Ok(records) => {
                    let count = records.len();
                    let applied = self.apply(|d| d.apply_logs(self.token, records));
                    if applied {
                        tracing::trace!("Applied {} log records", count);
                    } else {
                        tracing::debug!("Discarded stale log response ({} records)", count);
                    }
                    applied
                }
                Err(e) => {
                    tracing::warn!("Log query failed: {}", e);
                    false
                }
            }
        };

        let stats = async {
            match self.service.stats(user).await {
                Ok(buckets) => {
                    let applied = self.apply(|d| d.apply_stats(self.token, buckets));
                    if !applied {
                        tracing::debug!("Discarded stale stats response");
                    }
                    applied
                }
                Err(e) => {
                    tracing::warn!("Stats query failed: {}", e);
                    false
                }
            }
        };

        // Observers see each cycle once, with logs and stats from the same round
        let (logs_applied, stats_applied) = tokio::join!(logs, stats);
        if logs_applied || stats_applied {
            self.bump();
        }
    }

    fn apply(&self, write: impl FnOnce(&mut DisplayState) -> bool) -> bool {
        let mut display = self.display.lock().unwrap_or_else(PoisonError::into_inner);
        write(&mut display)
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}
