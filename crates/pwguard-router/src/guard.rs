//! Navigation guard
//!
//! Whitelist policy in both directions: an authenticated session may only
//! enter routes flagged `post_login_required` (and `admin_only` ones only as an
//! admin), an anonymous session may only enter routes flagged
//! `pre_login_allowed`. A route with neither flag is unreachable.

use std::sync::Arc;

use tracing::debug;

use crate::error::ConfigError;
use crate::expand::expand;
use crate::registry::RouteRegistry;
use crate::session::SessionState;
use crate::ParamMap;

/// Conventional name of the login route
pub const DEFAULT_LOGIN_ROUTE: &str = "login";

/// Outcome of one navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationDecision {
    pub allowed: bool,
    pub redirect_route_name: Option<String>,
}

impl NavigationDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            redirect_route_name: None,
        }
    }

    pub fn redirect(route_name: impl Into<String>) -> Self {
        Self {
            allowed: false,
            redirect_route_name: Some(route_name.into()),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn redirect_route_name(&self) -> Option<&str> {
        self.redirect_route_name.as_deref()
    }
}

/// Stateless allow/redirect decisions over a shared registry
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    registry: Arc<RouteRegistry>,
    login_route: String,
}

impl NavigationGuard {
    /// Creates a guard redirecting anonymous sessions to `login_route`
    ///
    /// # Errors
    ///
    /// Both redirect targets must be usable, otherwise a refused navigation
    /// could loop:
    /// - the login route must exist, allow anonymous sessions and need no parameters
    /// - the default route must allow non-admin authenticated sessions and need
    ///   no parameters
    pub fn new(registry: Arc<RouteRegistry>, login_route: impl Into<String>) -> Result<Self, ConfigError> {
        let login_route = login_route.into();

        let login = registry
            .by_name(&login_route)
            .ok_or_else(|| ConfigError::UnknownRedirectTarget {
                role: "login",
                name: login_route.clone(),
            })?;
        if !login.pre_login_allowed {
            return Err(unreachable_target("login", &login.name, "not open to anonymous sessions"));
        }
        if expand(&login.pattern, &ParamMap::new()).is_err() {
            return Err(unreachable_target("login", &login.name, "pattern needs parameters"));
        }

        let default = registry.default_route();
        if !default.post_login_required || default.admin_only {
            return Err(unreachable_target(
                "default",
                &default.name,
                "not open to every authenticated session",
            ));
        }
        if expand(&default.pattern, &ParamMap::new()).is_err() {
            return Err(unreachable_target("default", &default.name, "pattern needs parameters"));
        }

        Ok(Self {
            registry,
            login_route,
        })
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn registry(&self) -> &Arc<RouteRegistry> {
        &self.registry
    }

    /// Decides whether `session` may enter `requested`
    ///
    /// Unknown or missing route names are refused like ineligible ones; the
    /// guard never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use pwguard_router::{NavigationDecision, NavigationGuard, RouteDefinition, RouteRegistry, SessionState};
    ///
    /// let registry = Arc::new(RouteRegistry::register(vec![
    ///     RouteDefinition::new("login", "/login").with_pre_login(),
    ///     RouteDefinition::new("search", "/search").with_post_login().as_default(),
    ///     RouteDefinition::new("admin-users", "/admin/users").with_admin_only(),
    /// ]).unwrap());
    /// let guard = NavigationGuard::new(registry, "login").unwrap();
    ///
    /// assert_eq!(
    ///     guard.decide(Some("admin-users"), &SessionState::Anonymous),
    ///     NavigationDecision::redirect("login")
    /// );
    /// assert_eq!(
    ///     guard.decide(Some("admin-users"), &SessionState::user()),
    ///     NavigationDecision::redirect("search")
    /// );
    /// assert!(guard.decide(Some("admin-users"), &SessionState::admin()).is_allowed());
    /// ```
    pub fn decide(&self, requested: Option<&str>, session: &SessionState) -> NavigationDecision {
        let route = requested.and_then(|name| self.registry.by_name(name));

        let decision = match session {
            SessionState::AuthenticatedUser { is_admin } => match route {
                Some(route) if route.post_login_required && (!route.admin_only || *is_admin) => {
                    NavigationDecision::allow()
                }
                _ => NavigationDecision::redirect(self.registry.default_route().name.clone()),
            },
            SessionState::Anonymous => match route {
                Some(route) if route.pre_login_allowed => NavigationDecision::allow(),
                _ => NavigationDecision::redirect(self.login_route.clone()),
            },
        };

        debug!(
            requested = requested.unwrap_or("<none>"),
            ?session,
            allowed = decision.allowed,
            redirect = decision.redirect_route_name().unwrap_or("-"),
            "navigation decided"
        );

        decision
    }
}

fn unreachable_target(role: &'static str, name: &str, reason: &'static str) -> ConfigError {
    ConfigError::UnreachableRedirectTarget {
        role,
        name: name.to_string(),
        reason,
    }
}
