//! The immutable route table

use std::collections::HashMap;

use tracing::debug;

use crate::error::ConfigError;
use crate::path::split_url;
use crate::route::matcher::match_path;
use crate::route::{RouteDefinition, RoutePattern};
use crate::ParamMap;

/// Result of matching a URL against the registry
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<'a> {
    /// The first registered route whose pattern matched
    pub route: &'a RouteDefinition,
    /// Extracted parameters from the path
    pub params: ParamMap,
}

#[derive(Debug, Clone)]
struct RegisteredRoute {
    definition: RouteDefinition,
    pattern: RoutePattern,
}

/// Validated, immutable table of route definitions
///
/// Built once at startup with [`RouteRegistry::register`] and shared read-only
/// afterwards (typically behind an `Arc`). Because registration produces the
/// registry, every `RouteRegistry` value holds exactly one default route.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    routes: Vec<RegisteredRoute>,
    by_name: HashMap<String, usize>,
    default_index: usize,
    case_insensitive: bool,
}

impl RouteRegistry {
    /// Validates `definitions` and builds the registry (case-sensitive matching)
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidPattern`] for a malformed pattern
    /// - [`ConfigError::DuplicateName`] when two routes share a name
    /// - [`ConfigError::AmbiguousPattern`] when two patterns match the same URLs
    /// - [`ConfigError::MissingOrMultipleDefaults`] unless exactly one route is the default
    ///
    /// # Examples
    ///
    /// ```
    /// use pwguard_router::{RouteDefinition, RouteRegistry};
    ///
    /// let registry = RouteRegistry::register(vec![
    ///     RouteDefinition::new("login", "/login").with_pre_login(),
    ///     RouteDefinition::new("search", "/search").with_post_login().as_default(),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(registry.default_route().name, "search");
    /// ```
    pub fn register(definitions: Vec<RouteDefinition>) -> Result<Self, ConfigError> {
        Self::register_with_options(definitions, false)
    }

    /// Like [`register`](Self::register), optionally matching static segments
    /// without regard to ASCII case
    pub fn register_with_options(
        definitions: Vec<RouteDefinition>,
        case_insensitive: bool,
    ) -> Result<Self, ConfigError> {
        let mut routes = Vec::with_capacity(definitions.len());
        let mut by_name = HashMap::with_capacity(definitions.len());
        let mut signatures: HashMap<String, String> = HashMap::new();

        for mut definition in definitions {
            let pattern =
                RoutePattern::parse(&definition.pattern).map_err(|source| ConfigError::InvalidPattern {
                    name: definition.name.clone(),
                    pattern: definition.pattern.clone(),
                    source,
                })?;

            if by_name.contains_key(&definition.name) {
                return Err(ConfigError::DuplicateName(definition.name));
            }

            if let Some(other) = signatures.get(&pattern.signature(case_insensitive)) {
                return Err(ConfigError::AmbiguousPattern {
                    name: definition.name,
                    pattern: definition.pattern,
                    other: other.clone(),
                });
            }

            // Admin routes are post-login routes
            if definition.admin_only {
                definition.post_login_required = true;
            }

            signatures.insert(pattern.signature(case_insensitive), definition.name.clone());
            by_name.insert(definition.name.clone(), routes.len());
            routes.push(RegisteredRoute { definition, pattern });
        }

        let defaults: Vec<usize> = routes
            .iter()
            .enumerate()
            .filter(|(_, route)| route.definition.is_default)
            .map(|(idx, _)| idx)
            .collect();

        let default_index = match defaults.as_slice() {
            [single] => *single,
            other => {
                return Err(ConfigError::MissingOrMultipleDefaults { found: other.len() });
            }
        };

        debug!(
            routes = routes.len(),
            default = %routes[default_index].definition.name,
            "route registry built"
        );

        Ok(Self {
            routes,
            by_name,
            default_index,
            case_insensitive,
        })
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteDefinition> {
        self.by_name.get(name).map(|&idx| &self.routes[idx].definition)
    }

    /// Parsed pattern of the named route
    pub fn pattern_for(&self, name: &str) -> Option<&RoutePattern> {
        self.by_name.get(name).map(|&idx| &self.routes[idx].pattern)
    }

    pub fn default_route(&self) -> &RouteDefinition {
        &self.routes[self.default_index].definition
    }

    /// Matches a URL against the registered patterns in registration order
    ///
    /// Fragment prefixes (`...#`, `#!`) and query strings are stripped and the
    /// path normalized first. The first structural match wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use pwguard_router::{RouteDefinition, RouteRegistry};
    ///
    /// let registry = RouteRegistry::register(vec![
    ///     RouteDefinition::new("search", "/search").with_post_login().as_default(),
    ///     RouteDefinition::new("edit-entry", "/edit/:id").with_post_login(),
    /// ])
    /// .unwrap();
    ///
    /// let m = registry.match_url("http://localhost/#/edit/9?tab=notes").unwrap();
    /// assert_eq!(m.route.name, "edit-entry");
    /// assert_eq!(m.params.get("id"), Some(&"9".to_string()));
    /// ```
    pub fn match_url(&self, url: &str) -> Option<RouteMatch<'_>> {
        let parts = split_url(url);

        self.routes.iter().find_map(|route| {
            match_path(&route.pattern, &parts.path, self.case_insensitive).map(|params| RouteMatch {
                route: &route.definition,
                params,
            })
        })
    }

    /// Definitions in registration order
    pub fn routes(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.routes.iter().map(|route| &route.definition)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Always false for a registered table; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}
