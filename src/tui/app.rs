// App state management
//
// The App owns the router and whichever screen is mounted. Route changes
// arrive on the navigator channel and are applied by the event loop; the
// gate is settled once per loop turn, after the frame has been drawn.

use super::clipboard;
use super::components::{FormAction, LoginForm, LogsTable, Toast};
use super::theme::ThemeKind;
use crate::api::{LevelFilter, LogRecord, SharedService};
use crate::config::Config;
use crate::dashboard::DashboardView;
use crate::logging::LogBuffer;
use crate::login::{LoginError, LoginFlow};
use crate::router::{Navigator, Route, Router, Settled};
use crate::session::SharedSession;
use crate::util;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Outcome of a login submission, reported back to the form
pub type LoginOutcome = Result<(), LoginError>;

/// Receiving ends drained by the event loop
pub struct AppChannels {
    pub navigation: mpsc::UnboundedReceiver<Route>,
    pub login: mpsc::UnboundedReceiver<LoginOutcome>,
}

pub struct App {
    pub router: Router,
    store: SharedSession,
    service: SharedService,
    navigator: Navigator,
    login: LoginFlow,
    login_tx: mpsc::UnboundedSender<LoginOutcome>,

    /// Login screen state
    pub login_form: LoginForm,

    /// Mounted only while the dashboard route is authorized
    pub dashboard: Option<DashboardView>,
    pub logs_table: LogsTable,

    /// Keystrokes go to the search box
    pub editing_search: bool,

    /// Show the system log panel
    pub show_logs: bool,
    pub log_buffer: LogBuffer,

    pub theme: ThemeKind,
    pub toast: Option<Toast>,
    pub should_quit: bool,

    pub poll_interval: Duration,
    pub demo_mode: bool,

    /// When the app started (for uptime display)
    pub start_time: Instant,
}

impl App {
    /// Build the app on the dashboard route. The first settle decides
    /// whether the stored session lets it stay there.
    pub fn new(
        config: &Config,
        service: SharedService,
        store: SharedSession,
        log_buffer: LogBuffer,
    ) -> (Self, AppChannels) {
        let (navigator, navigation) = Navigator::channel();
        let (login_tx, login) = mpsc::unbounded_channel();
        let flow = LoginFlow::new(service.clone(), store.clone(), navigator.clone());

        let app = Self {
            router: Router::new(Route::Dashboard),
            store,
            service,
            navigator,
            login: flow,
            login_tx,
            login_form: LoginForm::new(),
            dashboard: None,
            logs_table: LogsTable::new(),
            editing_search: false,
            show_logs: false,
            log_buffer,
            theme: ThemeKind::from_name(&config.theme),
            toast: None,
            should_quit: false,
            poll_interval: config.poll_interval,
            demo_mode: config.demo_mode,
            start_time: Instant::now(),
        };
        (app, AppChannels { navigation, login })
    }

    /// Apply a navigation request. The gate re-verifies on the next settle.
    pub fn navigate(&mut self, route: Route) {
        self.router.navigate(route);
    }

    /// Settle the gate and mount or unmount the dashboard to match.
    /// Returns true when something changed and the frame should be redrawn.
    pub fn settle(&mut self) -> bool {
        match self.router.settle(self.store.as_ref()) {
            Settled::Unchanged => false,
            Settled::Authorized(Route::Dashboard) => {
                // A fresh navigation gets a fresh view and filter
                self.unmount();
                self.dashboard =
                    DashboardView::mount(self.service.clone(), self.store.clone(), self.poll_interval);
                if self.dashboard.is_none() {
                    // Session vanished between the gate check and the mount
                    self.router.navigate(Route::Login);
                }
                true
            }
            Settled::Authorized(Route::Login) | Settled::Redirected(_) => {
                self.unmount();
                true
            }
        }
    }

    fn unmount(&mut self) {
        self.dashboard = None;
        self.logs_table = LogsTable::new();
        self.editing_search = false;
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::info(message));
    }

    fn show_error(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::error(message));
    }

    /// Periodic tick: expire the toast
    pub fn tick(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    /// Result of a spawned login submission
    pub fn finish_login(&mut self, outcome: LoginOutcome) {
        self.login_form.finish(outcome);
    }

    pub fn uptime(&self) -> String {
        let seconds = self.start_time.elapsed().as_secs();
        format!(
            "{:02}:{:02}:{:02}",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        )
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.router.current() {
            Route::Login => self.handle_login_key(key),
            Route::Dashboard if self.dashboard.is_some() => {
                if self.editing_search {
                    self.handle_search_key(key);
                } else {
                    self.handle_dashboard_key(key);
                }
            }
            // Gate still verifying: nothing is interactive
            Route::Dashboard => {}
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return;
        }

        if let FormAction::Submit { username, password } = self.login_form.handle_key(key) {
            let flow = self.login.clone();
            let tx = self.login_tx.clone();
            tokio::spawn(async move {
                let outcome = flow.submit(&username, &password).await.map(|_| ());
                // Receiver is gone once the UI has shut down
                let _ = tx.send(outcome);
            });
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let Some(view) = self.dashboard.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.editing_search = false,
            KeyCode::Backspace => {
                let mut text = view.filter().search.clone();
                text.pop();
                view.set_search(text);
            }
            KeyCode::Char(c) => {
                let mut text = view.filter().search.clone();
                text.push(c);
                view.set_search(text);
            }
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('l') {
                self.logout();
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.editing_search = true,
            KeyCode::Left => self.change_level(LevelFilter::prev),
            KeyCode::Right => self.change_level(LevelFilter::next),
            KeyCode::Char(c @ '0'..='4') => {
                let index = c as usize - '0' as usize;
                self.change_level(|_| LevelFilter::OPTIONS[index]);
            }
            KeyCode::Up => {
                let logs = self.current_logs();
                self.logs_table.select_prev(&logs);
            }
            KeyCode::Down => {
                let logs = self.current_logs();
                self.logs_table.select_next(&logs);
            }
            KeyCode::Enter | KeyCode::Char('o') => self.open_selected(),
            KeyCode::Char('y') => self.copy_selected_link(),
            KeyCode::Char('l') => self.show_logs = !self.show_logs,
            KeyCode::Char('t') => {
                self.theme = self.theme.toggle();
                self.show_toast(format!("Theme: {}", self.theme.name()));
            }
            _ => {}
        }
    }

    fn change_level(&mut self, pick: impl FnOnce(LevelFilter) -> LevelFilter) {
        if let Some(view) = self.dashboard.as_mut() {
            let level = pick(view.filter().level);
            view.set_level(level);
        }
    }

    fn current_logs(&self) -> Vec<LogRecord> {
        self.dashboard
            .as_ref()
            .map(|view| view.snapshot().filtered_logs)
            .unwrap_or_default()
    }

    /// Download link and filename of the selected row
    fn selected_link(&self) -> Option<(String, String)> {
        let view = self.dashboard.as_ref()?;
        let logs = view.snapshot().filtered_logs;
        let record = self.logs_table.selected(&logs)?;
        Some((view.download_link(record), record.filename.clone()))
    }

    fn open_selected(&mut self) {
        let Some((url, filename)) = self.selected_link() else {
            self.show_error("No log selected");
            return;
        };
        match util::open_external(&url) {
            Ok(()) => self.show_toast(format!("Opening {}", filename)),
            Err(e) => {
                tracing::warn!("Failed to open {}: {}", url, e);
                self.show_error("Could not open browser");
            }
        }
    }

    fn copy_selected_link(&mut self) {
        let Some((url, _)) = self.selected_link() else {
            self.show_error("No log selected");
            return;
        };
        match clipboard::copy_link(&url) {
            Ok(()) => self.show_toast("Link copied"),
            Err(e) => {
                tracing::warn!("Clipboard copy failed: {}", e);
                self.show_error("Copy failed");
            }
        }
    }

    /// Clear the session and return to the login screen
    pub fn logout(&mut self) {
        if let Some(view) = self.dashboard.take() {
            view.logout(&self.navigator);
        }
        self.unmount();
        self.login_form = LoginForm::new();
    }
}
