//! Route definitions and the pure pattern machinery behind them
//!
//! - `pattern`: classify and validate `:name` / `:name?` / `:name*` templates
//! - `matcher`: match canonical paths against parsed patterns

pub mod matcher;
pub mod pattern;

pub use pattern::{classify_segment, PatternSegment, RoutePattern};

/// A named, pattern-addressed application view and its access class
///
/// Definitions are plain values built with the chaining methods below and
/// handed to [`crate::RouteRegistry::register`], which validates them as a
/// whole. Access flags are not mutually exclusive: a route that is both
/// `pre_login_allowed` and `post_login_required` is reachable by every
/// session (the initializing view is one).
///
/// # Examples
///
/// ```
/// use pwguard_router::RouteDefinition;
///
/// let admin = RouteDefinition::new("admin-users", "/admin/users").with_admin_only();
/// assert!(admin.admin_only);
/// assert!(admin.post_login_required);
/// assert!(!admin.pre_login_allowed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    /// Unique symbolic name used for redirects and link generation
    pub name: String,
    /// Path template like "/edit/:id"
    pub pattern: String,
    /// Reachable by an anonymous session
    pub pre_login_allowed: bool,
    /// Reachable by an authenticated session
    pub post_login_required: bool,
    /// Reachable only by an authenticated admin; implies `post_login_required`
    pub admin_only: bool,
    /// Fallback destination for unmatched or refused navigation
    pub is_default: bool,
    /// Whether a query string survives entering this route from another one
    pub allow_query_string: bool,
}

impl RouteDefinition {
    /// Creates a route with no access flags. Such a route is unreachable until
    /// at least one login flag is set.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            pre_login_allowed: false,
            post_login_required: false,
            admin_only: false,
            is_default: false,
            allow_query_string: false,
        }
    }

    pub fn with_pre_login(mut self) -> Self {
        self.pre_login_allowed = true;
        self
    }

    pub fn with_post_login(mut self) -> Self {
        self.post_login_required = true;
        self
    }

    /// Restricts the route to admins (and therefore to authenticated sessions)
    pub fn with_admin_only(mut self) -> Self {
        self.admin_only = true;
        self.post_login_required = true;
        self
    }

    /// Opens the route to every session, logged in or not
    pub fn with_always_available(self) -> Self {
        self.with_pre_login().with_post_login()
    }

    /// Marks this route as the registry's default route
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn with_query_string(mut self) -> Self {
        self.allow_query_string = true;
        self
    }

    /// Whether any session at all may enter this route
    pub fn is_reachable(&self) -> bool {
        self.pre_login_allowed || self.post_login_required
    }
}
