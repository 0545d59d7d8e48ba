// File: src/config.rs
// Purpose: Route table and routing options, built in or read from routes.toml

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::guard::{NavigationGuard, DEFAULT_LOGIN_ROUTE};
use crate::location::LocationProvider;
use crate::navigator::Navigator;
use crate::registry::RouteRegistry;
use crate::resolver::{RouteResolver, DEFAULT_HREF_PREFIX};
use crate::route::RouteDefinition;

/// Routing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Anchor convention prepended to paths in links (default: "#")
    #[serde(default = "default_href_prefix")]
    pub href_prefix: String,

    /// Where anonymous sessions are sent (default: "login")
    #[serde(default = "default_login_route")]
    pub login_route: String,

    /// View shown while the session check runs (default: "initializing" with
    /// the built-in routes, none with a custom table)
    #[serde(default)]
    pub initializing_route: Option<String>,

    /// Whether static segments match regardless of ASCII case (default: false)
    #[serde(default = "default_false")]
    pub case_insensitive: bool,

    /// Route table, matched in this order
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// One `[[routes]]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub name: String,

    pub pattern: String,

    #[serde(default = "default_false")]
    pub pre_login: bool,

    #[serde(default = "default_false")]
    pub post_login: bool,

    #[serde(default = "default_false")]
    pub admin: bool,

    /// Shorthand for `pre_login = true` plus `post_login = true`
    #[serde(default = "default_false")]
    pub always_available: bool,

    #[serde(default = "default_false")]
    pub default: bool,

    #[serde(default = "default_false")]
    pub allow_query_string: bool,
}

impl RouteEntry {
    fn new(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            pre_login: false,
            post_login: false,
            admin: false,
            always_available: false,
            default: false,
            allow_query_string: false,
        }
    }

    pub fn to_definition(&self) -> RouteDefinition {
        let mut definition = RouteDefinition::new(&self.name, &self.pattern);
        if self.pre_login || self.always_available {
            definition = definition.with_pre_login();
        }
        if self.post_login || self.always_available {
            definition = definition.with_post_login();
        }
        if self.admin {
            definition = definition.with_admin_only();
        }
        if self.default {
            definition = definition.as_default();
        }
        if self.allow_query_string {
            definition = definition.with_query_string();
        }
        definition
    }
}

/// The validated routing core, ready to share
#[derive(Debug, Clone)]
pub struct Routing {
    pub registry: Arc<RouteRegistry>,
    pub resolver: RouteResolver,
    pub guard: NavigationGuard,
    pub initializing_route: Option<String>,
}

impl Routing {
    /// Wires a navigator over `location`
    pub fn navigator<L: LocationProvider>(&self, location: L) -> Result<Navigator<L>, ConfigError> {
        Navigator::new(
            self.resolver.clone(),
            self.guard.clone(),
            location,
            self.initializing_route.clone(),
        )
    }
}

// Default values
fn default_href_prefix() -> String {
    DEFAULT_HREF_PREFIX.to_string()
}

fn default_login_route() -> String {
    DEFAULT_LOGIN_ROUTE.to_string()
}

fn default_false() -> bool {
    false
}

/// Loading view of the built-in table
const BUILTIN_INITIALIZING_ROUTE: &str = "initializing";

/// The PWGuard view table
fn default_routes() -> Vec<RouteEntry> {
    let always = |name, pattern| RouteEntry {
        always_available: true,
        ..RouteEntry::new(name, pattern)
    };
    let pre = |name, pattern| RouteEntry {
        pre_login: true,
        ..RouteEntry::new(name, pattern)
    };
    let post = |name, pattern| RouteEntry {
        post_login: true,
        ..RouteEntry::new(name, pattern)
    };

    vec![
        always(BUILTIN_INITIALIZING_ROUTE, "/initializing"),
        pre("login", "/login"),
        RouteEntry {
            default: true,
            allow_query_string: true,
            ..post("search", "/search")
        },
        post("edit-entry", "/edit/:id"),
        post("new-entry", "/new-entry/:fromID?"),
        post("profile", "/profile"),
        RouteEntry {
            admin: true,
            ..post("admin-users", "/admin/users")
        },
        post("import-export", "/import-export"),
        post("about", "/about"),
    ]
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            href_prefix: default_href_prefix(),
            login_route: default_login_route(),
            initializing_route: Some(BUILTIN_INITIALIZING_ROUTE.to_string()),
            case_insensitive: false,
            routes: default_routes(),
        }
    }
}

impl RoutingConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the built-in table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read routing config: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse routing config: {:?}", path))
    }

    /// Load configuration from the default path (./routes.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("routes.toml")
    }

    /// Parse configuration text. Empty text yields the built-in table; a file
    /// without `[[routes]]` keeps its options but uses the built-in routes,
    /// including the built-in initializing view unless it names another.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut config: RoutingConfig = toml::from_str(content)?;
        if config.routes.is_empty() {
            config.routes = default_routes();
            config
                .initializing_route
                .get_or_insert_with(|| BUILTIN_INITIALIZING_ROUTE.to_string());
        }
        Ok(config)
    }

    pub fn route_definitions(&self) -> Vec<RouteDefinition> {
        self.routes.iter().map(RouteEntry::to_definition).collect()
    }

    /// Validates the table and builds registry, resolver and guard
    ///
    /// Any [`ConfigError`] here is fatal: the application must not start.
    pub fn build(&self) -> Result<Routing, ConfigError> {
        let registry = Arc::new(RouteRegistry::register_with_options(
            self.route_definitions(),
            self.case_insensitive,
        )?);
        let resolver = RouteResolver::with_href_prefix(registry.clone(), self.href_prefix.clone());
        let guard = NavigationGuard::new(registry.clone(), self.login_route.clone())?;

        Ok(Routing {
            registry,
            resolver,
            guard,
            initializing_route: self.initializing_route.clone(),
        })
    }
}
