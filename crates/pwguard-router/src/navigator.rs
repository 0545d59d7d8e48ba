//! Application-shell navigation
//!
//! Applies guard decisions to a [`LocationProvider`] and owns the session
//! snapshot. On startup the route requested by the URL is remembered, the
//! user is parked on the initializing view, and the guard only runs once the
//! session check has answered.

use tracing::{debug, error, info, warn};

use crate::error::{ConfigError, RouteError, SessionError};
use crate::guard::{NavigationDecision, NavigationGuard};
use crate::location::LocationProvider;
use crate::path::split_url;
use crate::resolver::RouteResolver;
use crate::session::{SessionProvider, SessionState};
use crate::ParamMap;

/// Flash message queued when a logged-in session gets a 401
pub const SESSION_TIMEOUT_MESSAGE: &str = "Session timeout. Please log in again.";

/// Identifies one session check; completions carrying an older ticket are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCheckTicket(u64);

/// What a 401 response meant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedOutcome {
    /// A logged-in session expired; the user was sent to the login route
    SessionExpired,
    /// No one was logged in, so the credentials themselves were refused
    LoginFailed,
}

/// Route and path the location named when the session check started
#[derive(Debug, Clone)]
struct LoadTarget {
    route: String,
    path: String,
}

#[derive(Debug, Clone)]
enum Phase {
    Initializing { on_load: Option<LoadTarget> },
    Ready(SessionState),
}

/// The initializing route is never a load target: restoring it would park the
/// user on the loading view after the check
fn capture_load_target(
    resolver: &RouteResolver,
    location: &impl LocationProvider,
    initializing_route: Option<&str>,
) -> Option<LoadTarget> {
    let url = location.current_url();
    let route = resolver.route_for_url(&url)?.name.clone();
    if initializing_route == Some(route.as_str()) {
        debug!(route = %route, "location is the initializing route, nothing to restore");
        return None;
    }
    let parts = split_url(&url);
    let path = match parts.query {
        Some(query) if !query.is_empty() => format!("{}?{}", parts.path, query),
        _ => parts.path.into_owned(),
    };
    Some(LoadTarget { route, path })
}

/// Glue between location, resolver, guard and session
pub struct Navigator<L> {
    resolver: RouteResolver,
    guard: NavigationGuard,
    location: L,
    initializing_route: Option<String>,
    phase: Phase,
    generation: u64,
    current_route: Option<String>,
    pending_flash: Option<String>,
}

impl<L: LocationProvider> Navigator<L> {
    /// Creates a navigator and remembers the route the URL names right now
    ///
    /// The navigator starts in the initializing phase: no guard decision is
    /// made until a session check completes or a session is set.
    ///
    /// # Errors
    ///
    /// `initializing_route`, when given, must be registered, reachable by
    /// every session and need no parameters.
    pub fn new(
        resolver: RouteResolver,
        guard: NavigationGuard,
        location: L,
        initializing_route: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(name) = initializing_route.as_deref() {
            let route = resolver
                .registry()
                .by_name(name)
                .ok_or_else(|| ConfigError::UnknownRedirectTarget {
                    role: "initializing",
                    name: name.to_string(),
                })?;
            if !(route.pre_login_allowed && route.post_login_required) || route.admin_only {
                return Err(ConfigError::UnreachableRedirectTarget {
                    role: "initializing",
                    name: name.to_string(),
                    reason: "not open to every session",
                });
            }
            if resolver.path_for(name, &ParamMap::new()).is_err() {
                return Err(ConfigError::UnreachableRedirectTarget {
                    role: "initializing",
                    name: name.to_string(),
                    reason: "pattern needs parameters",
                });
            }
        }

        let on_load = capture_load_target(&resolver, &location, initializing_route.as_deref());
        debug!(
            route_on_load = on_load.as_ref().map(|t| t.route.as_str()).unwrap_or("<none>"),
            "navigator created"
        );

        Ok(Self {
            resolver,
            guard,
            location,
            initializing_route,
            phase: Phase::Initializing { on_load },
            generation: 0,
            current_route: None,
            pending_flash: None,
        })
    }

    pub fn resolver(&self) -> &RouteResolver {
        &self.resolver
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    /// Session snapshot, or `None` while a session check is outstanding
    pub fn session(&self) -> Option<&SessionState> {
        match &self.phase {
            Phase::Initializing { .. } => None,
            Phase::Ready(session) => Some(session),
        }
    }

    pub fn is_initializing(&self) -> bool {
        matches!(self.phase, Phase::Initializing { .. })
    }

    /// Route most recently entered through [`on_route_change`](Self::on_route_change)
    pub fn current_route(&self) -> Option<&str> {
        self.current_route.as_deref()
    }

    /// Whether the live location resolves to the named route
    pub fn route_is_active(&self, name: &str) -> bool {
        self.resolver.route_is_active(name, &self.location)
    }

    /// Releases the flash message queued for after the last route change
    pub fn take_flash(&mut self) -> Option<String> {
        self.pending_flash.take()
    }

    // ========================================================================
    // Session checks
    // ========================================================================

    /// Starts a session check
    ///
    /// Enters the initializing phase (remembering the current route when the
    /// shell was already running) and shows the initializing route if one is
    /// configured. Any earlier outstanding check is superseded.
    pub fn begin_session_check(&mut self) -> SessionCheckTicket {
        if let Phase::Ready(_) = self.phase {
            let on_load = capture_load_target(
                &self.resolver,
                &self.location,
                self.initializing_route.as_deref(),
            );
            self.phase = Phase::Initializing { on_load };
        }

        self.generation += 1;
        if let Some(name) = self.initializing_route.clone() {
            self.redirect_to_named_route(&name);
        }

        debug!(ticket = self.generation, "session check started");
        SessionCheckTicket(self.generation)
    }

    /// Applies the result of a session check
    ///
    /// Returns `None` for a superseded ticket. Otherwise stores the session
    /// (anonymous when the check failed) and decides on the route requested at
    /// load time: an allowed request is restored with its original path, a
    /// refused one is redirected by name.
    pub fn complete_session_check(
        &mut self,
        ticket: SessionCheckTicket,
        result: Result<SessionState, SessionError>,
    ) -> Option<NavigationDecision> {
        if ticket.0 != self.generation {
            warn!(ticket = ticket.0, current = self.generation, "dropping stale session check");
            return None;
        }

        let on_load = match &mut self.phase {
            Phase::Initializing { on_load } => on_load.take(),
            Phase::Ready(_) => None,
        };

        let session = result.unwrap_or_else(|err| {
            warn!(error = %err, "session check failed, continuing anonymously");
            SessionState::Anonymous
        });
        info!(?session, "session established");
        self.phase = Phase::Ready(session);

        let decision = self
            .guard
            .decide(on_load.as_ref().map(|t| t.route.as_str()), &session);
        match (decision.redirect_route_name(), on_load) {
            (Some(redirect), _) => {
                let redirect = redirect.to_string();
                self.redirect_to_named_route(&redirect);
            }
            (None, Some(target)) => {
                debug!(route = %target.route, path = %target.path, "restoring route requested on load");
                self.location.navigate(&target.path);
            }
            // Guard never allows an absent route
            (None, None) => {}
        }

        Some(decision)
    }

    /// Runs a full session check against `provider`
    ///
    /// The guard is not consulted until the provider answers.
    pub async fn refresh_session<P>(&mut self, provider: &P) -> Option<NavigationDecision>
    where
        P: SessionProvider + ?Sized,
    {
        let ticket = self.begin_session_check();
        debug!(provider = provider.name(), "checking session");
        let result = provider.check_session().await;
        self.complete_session_check(ticket, result)
    }

    /// Replaces the session after a login or logout and re-evaluates the
    /// current location. Supersedes any outstanding session check.
    pub fn set_session(&mut self, session: SessionState) -> Option<NavigationDecision> {
        self.generation += 1;
        self.phase = Phase::Ready(session);
        info!(?session, "session replaced");
        self.on_route_change()
    }

    /// Handles an HTTP 401 from the backend
    pub fn on_unauthorized(&mut self) -> UnauthorizedOutcome {
        match self.phase {
            Phase::Ready(session) if session.is_logged_in() => {
                self.generation += 1;
                self.phase = Phase::Ready(SessionState::Anonymous);
                let login = self.guard.login_route().to_string();
                self.redirect_to_named_route(&login);
                self.pending_flash = Some(SESSION_TIMEOUT_MESSAGE.to_string());
                info!("session expired, redirected to login");
                UnauthorizedOutcome::SessionExpired
            }
            _ => UnauthorizedOutcome::LoginFailed,
        }
    }

    // ========================================================================
    // Route changes
    // ========================================================================

    /// Evaluates the live location after it changed
    ///
    /// Returns `None` while initializing: the decision is deferred until the
    /// session is known. A refused route is redirected by name. Entering a
    /// route from a different one drops the query string unless the route
    /// allows it.
    pub fn on_route_change(&mut self) -> Option<NavigationDecision> {
        let session = match self.phase {
            Phase::Initializing { .. } => {
                debug!("route change during initialization, decision deferred");
                return None;
            }
            Phase::Ready(session) => session,
        };

        let url = self.location.current_url();
        let route_name = self.resolver.route_for_url(&url).map(|route| route.name.clone());
        let decision = self.guard.decide(route_name.as_deref(), &session);

        match decision.redirect_route_name() {
            Some(target) if Some(target) == route_name.as_deref() => {
                // Guard construction rules this out; never bounce onto the same route
                warn!(route = target, "guard redirected a route to itself, staying");
            }
            Some(target) => {
                let target = target.to_string();
                self.redirect_to_named_route(&target);
            }
            None => self.enter(route_name, &url),
        }

        Some(decision)
    }

    fn enter(&mut self, route_name: Option<String>, url: &str) {
        let Some(name) = route_name else {
            return;
        };

        let arriving = self.current_route.as_deref() != Some(name.as_str());
        let allow_query = self
            .resolver
            .registry()
            .by_name(&name)
            .map(|route| route.allow_query_string)
            .unwrap_or(false);

        let parts = split_url(url);
        if arriving && !allow_query && parts.has_query() {
            debug!(route = %name, "dropping query string");
            let path = parts.path.into_owned();
            self.location.navigate(&path);
        }

        self.current_route = Some(name);
    }

    // ========================================================================
    // Redirects
    // ========================================================================

    /// Navigates to the named route
    ///
    /// A route that cannot be built is a programming error: it is logged and
    /// the default route is used instead. Returns the path navigated to.
    pub fn redirect_to_named_route(&mut self, name: &str) -> Option<String> {
        self.redirect_to_route(name, &ParamMap::new())
    }

    /// Navigates to the named route with parameters, falling back to the
    /// default route on error
    pub fn redirect_to_route(&mut self, name: &str, params: &ParamMap) -> Option<String> {
        match self.resolver.path_for(name, params) {
            Ok(path) => {
                debug!(route = name, %path, "redirecting");
                self.location.navigate(&path);
                Some(path)
            }
            Err(err) => {
                error!(route = name, error = %err, "(BUG) cannot build redirect, using default route");
                self.redirect_to_default_route()
            }
        }
    }

    pub fn redirect_to_default_route(&mut self) -> Option<String> {
        let default = self.resolver.registry().default_route().name.clone();
        match self.resolver.path_for(&default, &ParamMap::new()) {
            Ok(path) => {
                debug!(route = %default, %path, "redirecting to default route");
                self.location.navigate(&path);
                Some(path)
            }
            Err(err) => {
                error!(route = %default, error = %err, "default route cannot be built");
                None
            }
        }
    }

    /// Builds a link for the named route, falling back to the default route's
    /// link when it cannot be built
    pub fn href_or_default(&self, name: &str, params: &ParamMap) -> String {
        self.resolver.href_for(name, params).unwrap_or_else(|err: RouteError| {
            error!(route = name, error = %err, "(BUG) cannot build link, using default route");
            let default = &self.resolver.registry().default_route().name;
            self.resolver
                .href_for(default, &ParamMap::new())
                .unwrap_or_else(|_| self.resolver.href_prefix().to_string())
        })
    }
}
