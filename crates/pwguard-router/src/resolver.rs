//! Bidirectional mapping between route names and URLs

use std::sync::Arc;

use crate::error::RouteError;
use crate::expand::expand;
use crate::location::LocationProvider;
use crate::registry::RouteRegistry;
use crate::route::RouteDefinition;
use crate::ParamMap;

/// Fragment prefix used for client-addressable links
pub const DEFAULT_HREF_PREFIX: &str = "#";

/// Builds paths and links by route name, and classifies URLs by route
#[derive(Debug, Clone)]
pub struct RouteResolver {
    registry: Arc<RouteRegistry>,
    href_prefix: String,
}

impl RouteResolver {
    pub fn new(registry: Arc<RouteRegistry>) -> Self {
        Self::with_href_prefix(registry, DEFAULT_HREF_PREFIX)
    }

    /// Uses a different anchor convention for links, e.g. `#!`
    pub fn with_href_prefix(registry: Arc<RouteRegistry>, href_prefix: impl Into<String>) -> Self {
        Self {
            registry,
            href_prefix: href_prefix.into(),
        }
    }

    pub fn registry(&self) -> &Arc<RouteRegistry> {
        &self.registry
    }

    pub fn href_prefix(&self) -> &str {
        &self.href_prefix
    }

    /// Expands the named route's pattern with `params`
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use pwguard_router::{ParamMap, RouteDefinition, RouteError, RouteRegistry, RouteResolver};
    ///
    /// let registry = RouteRegistry::register(vec![
    ///     RouteDefinition::new("search", "/search").with_post_login().as_default(),
    ///     RouteDefinition::new("edit-entry", "/edit/:id").with_post_login(),
    /// ])
    /// .unwrap();
    /// let resolver = RouteResolver::new(Arc::new(registry));
    ///
    /// assert_eq!(resolver.path_for_params("edit-entry", &[("id", "3")]).unwrap(), "/edit/3");
    /// assert!(matches!(resolver.path_for("edit-entry", &ParamMap::new()), Err(RouteError::BadParams(_))));
    /// assert!(matches!(resolver.path_for("nope", &ParamMap::new()), Err(RouteError::UnknownRoute(_))));
    /// ```
    pub fn path_for(&self, name: &str, params: &ParamMap) -> Result<String, RouteError> {
        let route = self
            .registry
            .by_name(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;
        Ok(expand(&route.pattern, params)?)
    }

    /// [`path_for`](Self::path_for) with parameters given as pairs
    pub fn path_for_params(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let params: ParamMap = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.path_for(name, &params)
    }

    /// Client-addressable link: the path behind the fragment prefix
    ///
    /// `hrefFor("profile")` with the default prefix is `#/profile`.
    pub fn href_for(&self, name: &str, params: &ParamMap) -> Result<String, RouteError> {
        self.path_for(name, params)
            .map(|path| format!("{}{}", self.href_prefix, path))
    }

    /// Classifies a URL by route, discarding extracted parameters
    pub fn route_for_url(&self, url: &str) -> Option<&RouteDefinition> {
        self.registry.match_url(url).map(|m| m.route)
    }

    /// Name of the route the live location points at
    pub fn current_route_name(&self, location: &impl LocationProvider) -> Option<String> {
        self.route_for_url(&location.current_url())
            .map(|route| route.name.clone())
    }

    /// Whether the live location resolves to the named route
    pub fn route_is_active(&self, name: &str, location: &impl LocationProvider) -> bool {
        self.current_route_name(location).as_deref() == Some(name)
    }
}
