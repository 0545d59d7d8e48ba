/// Pattern parsing for route templates
///
/// Route patterns are written the way the application's links are, e.g.
/// `/edit/:id` or `/new-entry/:fromID?`. Each segment is classified into a
/// typed [`PatternSegment`]; parsing is pure.

use std::collections::HashSet;

use crate::error::PatternError;
use crate::path::is_valid_path;

/// Represents the different kinds of route pattern segments
///
/// # Examples
///
/// ```
/// use pwguard_router::route::pattern::{classify_segment, PatternSegment};
///
/// assert!(matches!(classify_segment("search"), PatternSegment::Static(_)));
/// assert!(matches!(classify_segment(":id"), PatternSegment::Required(_)));
/// assert!(matches!(classify_segment(":fromID?"), PatternSegment::Optional(_)));
/// assert!(matches!(classify_segment(":rest*"), PatternSegment::Variadic(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternSegment {
    /// Literal text segment
    Static(String),
    /// Required parameter: `:id`
    Required(String),
    /// Optional parameter: `:id?`
    Optional(String),
    /// Variadic parameter spanning one or more segments: `:path*`
    Variadic(String),
}

impl PatternSegment {
    /// Placeholder name, or `None` for static segments
    pub fn param_name(&self) -> Option<&str> {
        match self {
            PatternSegment::Static(_) => None,
            PatternSegment::Required(name)
            | PatternSegment::Optional(name)
            | PatternSegment::Variadic(name) => Some(name),
        }
    }

    /// Structural shape of the segment with the placeholder name erased
    fn shape(&self) -> &str {
        match self {
            PatternSegment::Static(text) => text,
            PatternSegment::Required(_) => ":",
            PatternSegment::Optional(_) => ":?",
            PatternSegment::Variadic(_) => ":*",
        }
    }
}

/// Classifies a single segment (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Not a placeholder**: anything not starting with `:` is static
/// 2. **Optional**: `:name?`
/// 3. **Variadic**: `:name*`
/// 4. **Required**: `:name`
pub fn classify_segment(segment: &str) -> PatternSegment {
    match segment.strip_prefix(':') {
        None => PatternSegment::Static(segment.to_string()),
        Some(param) => {
            if let Some(name) = param.strip_suffix('?') {
                PatternSegment::Optional(name.to_string())
            } else if let Some(name) = param.strip_suffix('*') {
                PatternSegment::Variadic(name.to_string())
            } else {
                PatternSegment::Required(param.to_string())
            }
        }
    }
}

/// Whether `name` is a valid placeholder identifier: `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Whether `text` contains `:` directly followed by an identifier start
fn embeds_placeholder(text: &str) -> bool {
    text.split(':')
        .skip(1)
        .any(|rest| rest.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_'))
}

/// A parsed route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<PatternSegment>,
}

impl RoutePattern {
    /// Parses and validates a pattern string
    ///
    /// # Examples
    ///
    /// ```
    /// use pwguard_router::route::pattern::RoutePattern;
    ///
    /// let pattern = RoutePattern::parse("/new-entry/:fromID?").unwrap();
    /// assert_eq!(pattern.placeholders().collect::<Vec<_>>(), vec!["fromID"]);
    /// assert!(pattern.required_placeholders().next().is_none());
    ///
    /// assert!(RoutePattern::parse("search").is_err());
    /// ```
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if !source.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash);
        }
        if !is_valid_path(source) {
            return Err(PatternError::EmptySegment);
        }

        let segments: Vec<PatternSegment> = crate::path::segments(source)
            .into_iter()
            .map(classify_segment)
            .collect();

        // A `:name` token inside a literal would survive expansion unresolved
        if let Some(text) = segments.iter().find_map(|segment| match segment {
            PatternSegment::Static(text) if embeds_placeholder(text) => Some(text),
            _ => None,
        }) {
            return Err(PatternError::EmbeddedPlaceholder(text.clone()));
        }

        let mut seen = HashSet::new();
        for name in segments.iter().filter_map(PatternSegment::param_name) {
            if !is_identifier(name) {
                return Err(PatternError::InvalidPlaceholder(name.to_string()));
            }
            if !seen.insert(name) {
                return Err(PatternError::DuplicatePlaceholder(name.to_string()));
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// All placeholder names in order of appearance
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(PatternSegment::param_name)
    }

    /// Placeholders that must be supplied to build a path
    pub fn required_placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            PatternSegment::Required(name) | PatternSegment::Variadic(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Structural signature with placeholder names erased
    ///
    /// Two patterns with the same signature match exactly the same URLs, so
    /// the registry refuses to hold both. Static segments are compared
    /// case-insensitively when `case_insensitive` is set.
    pub fn signature(&self, case_insensitive: bool) -> String {
        let joined = self
            .segments
            .iter()
            .map(PatternSegment::shape)
            .collect::<Vec<_>>()
            .join("/");
        if case_insensitive {
            format!("/{}", joined.to_ascii_lowercase())
        } else {
            format!("/{}", joined)
        }
    }
}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
