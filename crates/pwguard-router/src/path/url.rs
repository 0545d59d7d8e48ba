//! Splitting browser locations into route path and query string
//!
//! The application addresses views through the URL fragment, so a live
//! location looks like `https://host/app#/search?q=mail` or, with a hash-bang
//! prefix, `https://host/app#!/search`. Route matching only cares about the
//! path after the last `#`.

use std::borrow::Cow;

use super::normalize_path;

/// A location reduced to its route-relevant parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts<'a> {
    /// Canonical route path, e.g. `/search`
    pub path: Cow<'a, str>,
    /// Query string without the leading `?`, if one was present
    pub query: Option<&'a str>,
}

impl UrlParts<'_> {
    /// Whether a non-empty query string was present
    pub fn has_query(&self) -> bool {
        self.query.is_some_and(|q| !q.is_empty())
    }
}

/// Strips fragment-prefix and query-string decoration from a URL
///
/// # Examples
///
/// ```
/// use pwguard_router::path::split_url;
///
/// let parts = split_url("https://example.com/app#/search?q=bank");
/// assert_eq!(parts.path, "/search");
/// assert_eq!(parts.query, Some("q=bank"));
///
/// assert_eq!(split_url("#!/profile").path, "/profile");
/// assert_eq!(split_url("/admin/users/").path, "/admin/users");
/// ```
pub fn split_url(url: &str) -> UrlParts<'_> {
    let after_fragment = url
        .rfind('#')
        .map(|idx| &url[idx + 1..])
        .unwrap_or(url);
    let after_fragment = after_fragment.strip_prefix('!').unwrap_or(after_fragment);

    let (raw_path, query) = match after_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (after_fragment, None),
    };

    UrlParts {
        path: normalize_path(raw_path),
        query,
    }
}
