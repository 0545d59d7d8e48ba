//! Expansion of route patterns into concrete paths

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ExpansionError;
use crate::route::pattern::{classify_segment, PatternSegment};
use crate::ParamMap;

/// Any `:identifier` token left in an expanded path
static UNRESOLVED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").expect("placeholder regex is valid"));

/// Expands `pattern` with `params`
///
/// - `:name`, `:name?` and `:name*` segments take `params[name]` when present,
///   percent-encoded (variadic values keep their `/` separators)
/// - an optional placeholder with no value disappears along with its `/`
/// - anything still shaped like `:identifier` afterwards is an error, which
///   catches both missing required values and misspelled placeholder names
///
/// # Examples
///
/// ```
/// use pwguard_router::{expand, ExpansionError, ParamMap};
///
/// let params = ParamMap::from([("id".to_string(), "5".to_string())]);
/// assert_eq!(expand("/edit/:id", &params).unwrap(), "/edit/5");
///
/// assert_eq!(expand("/new-entry/:fromID?", &ParamMap::new()).unwrap(), "/new-entry");
///
/// assert_eq!(
///     expand(":id/:name", &params),
///     Err(ExpansionError::UnresolvedPlaceholder("name".to_string()))
/// );
/// ```
pub fn expand(pattern: &str, params: &ParamMap) -> Result<String, ExpansionError> {
    let expanded = pattern
        .split('/')
        .filter_map(|segment| substitute(segment, params))
        .collect::<Vec<_>>()
        .join("/");

    if let Some(captures) = UNRESOLVED.captures(&expanded) {
        return Err(ExpansionError::UnresolvedPlaceholder(captures[1].to_string()));
    }

    if expanded.is_empty() && pattern.starts_with('/') {
        Ok("/".to_string())
    } else {
        Ok(expanded)
    }
}

/// Returns the text for one segment, or `None` to drop it
///
/// Empty values count as missing: an optional segment is dropped, a required
/// or variadic one is left as its placeholder so the unresolved check fires.
fn substitute(segment: &str, params: &ParamMap) -> Option<String> {
    let value = |name: &str| params.get(name).filter(|v| !v.is_empty());

    match classify_segment(segment) {
        PatternSegment::Static(text) => Some(text),
        PatternSegment::Required(name) => Some(
            value(name.as_str())
                .map(|value| urlencoding::encode(value).into_owned())
                .unwrap_or_else(|| segment.to_string()),
        ),
        PatternSegment::Optional(name) => {
            value(name.as_str()).map(|value| urlencoding::encode(value).into_owned())
        }
        PatternSegment::Variadic(name) => Some(
            value(name.as_str())
                .map(|value| {
                    value
                        .split('/')
                        .filter(|part| !part.is_empty())
                        .map(|part| urlencoding::encode(part).into_owned())
                        .collect::<Vec<_>>()
                        .join("/")
                })
                .filter(|joined| !joined.is_empty())
                .unwrap_or_else(|| segment.to_string()),
        ),
    }
}
