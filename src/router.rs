// Routing and the auth gate
//
// Every route change re-initialises the gate to Unverified. Deciding
// (settle) and navigating (redirect) are separate steps: the render pass
// only ever reads the gate, it never navigates.

use crate::session::SessionStore;
use tokio::sync::mpsc;

/// Navigable screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// Public login form
    Login,
    /// Protected log dashboard
    #[default]
    Dashboard,
}

impl Route {
    /// Routes that render without a session
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Dashboard => "dashboard",
        }
    }
}

/// Per-navigation gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unverified,
    Authorized,
    Redirecting,
}

/// What the render pass may show for the current route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// Non-interactive "verifying session" screen
    Placeholder,
    /// The route's own content
    Content(Route),
}

/// Access guard for a single navigation
#[derive(Debug, Clone)]
pub struct AuthGate {
    route: Route,
    state: GateState,
}

impl AuthGate {
    /// Start checking a freshly requested route
    pub fn begin(route: Route) -> Self {
        Self {
            route,
            state: GateState::Unverified,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Run the session check. Only transitions out of Unverified; a settled
    /// gate keeps its decision until the next navigation.
    pub fn verify(&mut self, store: &dyn SessionStore) -> GateState {
        if self.state == GateState::Unverified {
            self.state = if self.route.is_public() || store.get().is_some() {
                GateState::Authorized
            } else {
                GateState::Redirecting
            };
        }
        self.state
    }

    /// Protected content only renders once Authorized; the login route
    /// always renders its own form.
    pub fn render(&self) -> Render {
        if self.route.is_public() || self.state == GateState::Authorized {
            Render::Content(self.route)
        } else {
            Render::Placeholder
        }
    }
}

/// Outcome of settling the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Current route may render
    Authorized(Route),
    /// Access denied, router moved to this route
    Redirected(Route),
    /// Nothing changed since the last settle
    Unchanged,
}

/// Current route plus its gate
#[derive(Debug)]
pub struct Router {
    gate: AuthGate,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            gate: AuthGate::begin(initial),
        }
    }

    pub fn current(&self) -> Route {
        self.gate.route()
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn render(&self) -> Render {
        self.gate.render()
    }

    /// Begin a route transition. The gate goes back to Unverified.
    pub fn navigate(&mut self, route: Route) {
        tracing::debug!("Navigate: {} -> {}", self.gate.route().name(), route.name());
        self.gate = AuthGate::begin(route);
    }

    /// Decide the pending navigation, then act on it
    pub fn settle(&mut self, store: &dyn SessionStore) -> Settled {
        if self.gate.state() != GateState::Unverified {
            return Settled::Unchanged;
        }

        match self.gate.verify(store) {
            GateState::Authorized => Settled::Authorized(self.gate.route()),
            GateState::Redirecting => {
                tracing::info!(
                    "No session for {} route, redirecting to login",
                    self.gate.route().name()
                );
                self.navigate(Route::Login);
                // Login is public: settles straight to Authorized
                self.gate.verify(store);
                Settled::Redirected(Route::Login)
            }
            GateState::Unverified => Settled::Unchanged,
        }
    }
}

/// Cloneable handle for requesting navigation from outside the router
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl Navigator {
    /// Create a navigator and the receiving end drained by the UI loop
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Request a route change. Dropped silently once the UI has shut down.
    pub fn push(&self, route: Route) {
        if self.tx.send(route).is_err() {
            tracing::debug!("Navigation to {} after shutdown ignored", route.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, Role, Session};

    fn stores() -> Vec<(bool, MemorySessionStore)> {
        vec![
            (false, MemorySessionStore::new()),
            (
                true,
                MemorySessionStore::with_session(Session::new("admin", Role::Admin)),
            ),
        ]
    }

    #[test]
    fn test_gate_renders_content_iff_session_or_login() {
        for (has_session, store) in stores() {
            for route in [Route::Login, Route::Dashboard] {
                let mut gate = AuthGate::begin(route);
                gate.verify(&store);
                let shows_content = gate.render() == Render::Content(route);
                assert_eq!(
                    shows_content,
                    has_session || route == Route::Login,
                    "session={} route={:?}",
                    has_session,
                    route
                );
            }
        }
    }

    #[test]
    fn test_protected_route_shows_placeholder_before_check() {
        let gate = AuthGate::begin(Route::Dashboard);
        assert_eq!(gate.state(), GateState::Unverified);
        assert_eq!(gate.render(), Render::Placeholder);
    }

    #[test]
    fn test_login_route_renders_while_unverified() {
        let gate = AuthGate::begin(Route::Login);
        assert_eq!(gate.render(), Render::Content(Route::Login));
    }

    #[test]
    fn test_authorized_gate_never_regresses_to_placeholder() {
        let store = MemorySessionStore::with_session(Session::new("admin", Role::Admin));
        let mut gate = AuthGate::begin(Route::Dashboard);
        gate.verify(&store);

        // Logging out mid-navigation does not flip an already settled gate
        store.clear();
        gate.verify(&store);
        assert_eq!(gate.state(), GateState::Authorized);
        assert_eq!(gate.render(), Render::Content(Route::Dashboard));
    }

    #[test]
    fn test_router_redirects_without_session() {
        let store = MemorySessionStore::new();
        let mut router = Router::new(Route::Dashboard);
        assert_eq!(router.render(), Render::Placeholder);

        assert_eq!(router.settle(&store), Settled::Redirected(Route::Login));
        assert_eq!(router.current(), Route::Login);
        assert_eq!(router.render(), Render::Content(Route::Login));
        assert_eq!(router.settle(&store), Settled::Unchanged);
    }

    #[test]
    fn test_router_reverifies_every_navigation() {
        let store = MemorySessionStore::with_session(Session::new("admin", Role::Admin));
        let mut router = Router::new(Route::Dashboard);
        assert_eq!(router.settle(&store), Settled::Authorized(Route::Dashboard));

        store.clear();
        router.navigate(Route::Dashboard);
        assert_eq!(router.gate().state(), GateState::Unverified);
        assert_eq!(router.settle(&store), Settled::Redirected(Route::Login));
    }

    #[test]
    fn test_login_route_never_redirects() {
        for (_, store) in stores() {
            let mut router = Router::new(Route::Login);
            assert_eq!(router.settle(&store), Settled::Authorized(Route::Login));
        }
    }

    #[tokio::test]
    async fn test_navigator_delivers_requests_in_order() {
        let (nav, mut rx) = Navigator::channel();
        nav.push(Route::Dashboard);
        nav.clone().push(Route::Login);
        assert_eq!(rx.recv().await, Some(Route::Dashboard));
        assert_eq!(rx.recv().await, Some(Route::Login));
    }
}
