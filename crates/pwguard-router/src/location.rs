//! Location provider seam
//!
//! The routing core reads the browser location to classify it and writes to
//! it to redirect. It never subscribes to location changes itself; the owning
//! shell calls [`crate::Navigator::on_route_change`] when the location moves.

/// Supplies the current URL and accepts new paths
pub trait LocationProvider {
    /// Current location. May carry a fragment prefix and a query string.
    fn current_url(&self) -> String;

    /// Points the location at `path` (a route path, optionally with a query)
    fn navigate(&mut self, path: &str);
}

/// In-memory location provider
///
/// Keeps the current URL and every path navigated to. Useful for tests and
/// for driving the router outside a browser.
///
/// # Examples
///
/// ```
/// use pwguard_router::{LocationProvider, MemoryLocation};
///
/// let mut location = MemoryLocation::new("#/login");
/// location.navigate("/search");
///
/// assert_eq!(location.current_url(), "/search");
/// assert_eq!(location.history(), ["/search"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    url: String,
    history: Vec<String>,
}

impl MemoryLocation {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            history: Vec::new(),
        }
    }

    /// Paths navigated to, oldest first. The initial URL is not included.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Replaces the URL the way a user typing into the address bar would,
    /// without recording it as a redirect
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }
}

impl LocationProvider for MemoryLocation {
    fn current_url(&self) -> String {
        self.url.clone()
    }

    fn navigate(&mut self, path: &str) {
        self.url = path.to_string();
        self.history.push(path.to_string());
    }
}
