//! # PWGuard Router
//!
//! Client-side routing core for the PWGuard password manager:
//! - Named route table with login flags (`/login`, `/edit/:id`, `/new-entry/:fromID?`)
//! - Parameter substitution that refuses to leave placeholders behind
//! - URL classification and link building (`#/profile`)
//! - A navigation guard that whitelists routes per session state
//! - An application shell that defers routing until the session check answers
//!
//! ## Placeholders
//!
//! - `:name` required, one segment
//! - `:name?` optional, zero or one segment
//! - `:name*` variadic, one or more segments
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use pwguard_router::{NavigationGuard, RouteDefinition, RouteRegistry, RouteResolver, SessionState};
//!
//! let registry = Arc::new(RouteRegistry::register(vec![
//!     RouteDefinition::new("login", "/login").with_pre_login(),
//!     RouteDefinition::new("search", "/search").with_post_login().as_default(),
//!     RouteDefinition::new("edit-entry", "/edit/:id").with_post_login(),
//! ]).unwrap());
//!
//! let resolver = RouteResolver::new(registry.clone());
//! assert_eq!(resolver.path_for_params("edit-entry", &[("id", "7")]).unwrap(), "/edit/7");
//! assert_eq!(resolver.route_for_url("#/edit/7").unwrap().name, "edit-entry");
//!
//! let guard = NavigationGuard::new(registry, "login").unwrap();
//! let decision = guard.decide(Some("edit-entry"), &SessionState::Anonymous);
//! assert_eq!(decision.redirect_route_name(), Some("login"));
//! ```

use std::collections::HashMap;

// ============================================================================
// Module Declarations
// ============================================================================

mod config;
mod error;
mod expand;
mod guard;
mod location;
mod navigator;
pub mod path;
mod registry;
mod resolver;
pub mod route;
mod session;

pub use config::{RouteEntry, Routing, RoutingConfig};
pub use error::{ConfigError, ExpansionError, PatternError, RouteError, SessionError};
pub use expand::expand;
pub use guard::{NavigationDecision, NavigationGuard, DEFAULT_LOGIN_ROUTE};
pub use location::{LocationProvider, MemoryLocation};
pub use navigator::{Navigator, SessionCheckTicket, UnauthorizedOutcome, SESSION_TIMEOUT_MESSAGE};
pub use path::{is_valid_path, normalize_path, split_url, UrlParts};
pub use registry::{RouteMatch, RouteRegistry};
pub use resolver::{RouteResolver, DEFAULT_HREF_PREFIX};
pub use route::{PatternSegment, RouteDefinition, RoutePattern};
pub use session::{
    SessionCheckResponse, SessionProvider, SessionState, SessionUser, StaticSessionProvider,
};

/// Parameter values keyed by placeholder name (without the leading `:`)
pub type ParamMap = HashMap<String, String>;
