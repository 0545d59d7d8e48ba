//! Segment-by-segment matching of a canonical path against a parsed pattern
//!
//! The walk is recursive over both segment slices. Optional and variadic
//! placeholders backtrack: an optional placeholder first tries to consume a
//! segment and then to be skipped, a variadic one tries the longest run first.

use std::borrow::Cow;

use super::pattern::{PatternSegment, RoutePattern};
use crate::ParamMap;

/// Matches `path` (already canonical) against `pattern`
///
/// Returns the extracted, percent-decoded parameters on success.
///
/// # Examples
///
/// ```
/// use pwguard_router::route::{matcher::match_path, pattern::RoutePattern};
///
/// let pattern = RoutePattern::parse("/edit/:id").unwrap();
/// let params = match_path(&pattern, "/edit/42", false).unwrap();
/// assert_eq!(params.get("id"), Some(&"42".to_string()));
///
/// assert!(match_path(&pattern, "/edit", false).is_none());
/// ```
pub fn match_path(pattern: &RoutePattern, path: &str, case_insensitive: bool) -> Option<ParamMap> {
    let path_segments = crate::path::segments(path);
    match_segments(
        pattern.segments(),
        &path_segments,
        ParamMap::new(),
        case_insensitive,
    )
}

fn match_segments(
    pattern: &[PatternSegment],
    path: &[&str],
    params: ParamMap,
    case_insensitive: bool,
) -> Option<ParamMap> {
    // Base case: consumed all pattern segments
    let Some((head, rest)) = pattern.split_first() else {
        return path.is_empty().then_some(params);
    };

    match head {
        PatternSegment::Static(literal) => {
            let (first, remaining) = path.split_first()?;
            let matches = if case_insensitive {
                literal.eq_ignore_ascii_case(first)
            } else {
                literal == *first
            };
            if !matches {
                return None;
            }
            match_segments(rest, remaining, params, case_insensitive)
        }
        PatternSegment::Required(name) => {
            let (first, remaining) = path.split_first()?;
            let params = with_param(params, name, decode(first).into_owned());
            match_segments(rest, remaining, params, case_insensitive)
        }
        PatternSegment::Optional(name) => path
            .split_first()
            .and_then(|(first, remaining)| {
                let consumed = with_param(params.clone(), name, decode(first).into_owned());
                match_segments(rest, remaining, consumed, case_insensitive)
            })
            .or_else(|| match_segments(rest, path, params, case_insensitive)),
        PatternSegment::Variadic(name) => (1..=path.len()).rev().find_map(|taken| {
            let value = path[..taken]
                .iter()
                .map(|segment| decode(segment))
                .collect::<Vec<_>>()
                .join("/");
            let params = with_param(params.clone(), name, value);
            match_segments(rest, &path[taken..], params, case_insensitive)
        }),
    }
}

fn with_param(mut params: ParamMap, name: &str, value: String) -> ParamMap {
    params.insert(name.to_string(), value);
    params
}

/// Percent-decodes a segment, keeping it verbatim when it is not valid UTF-8
fn decode(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}
