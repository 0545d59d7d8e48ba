//! Error types for route registration, link building and session checks

use thiserror::Error;

/// Malformed route pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern must start with '/'")]
    MissingLeadingSlash,

    #[error("pattern contains an empty segment")]
    EmptySegment,

    #[error("placeholder `{0}` is not a valid identifier")]
    InvalidPlaceholder(String),

    #[error("placeholder `{0}` appears more than once")]
    DuplicatePlaceholder(String),

    #[error("static segment `{0}` embeds a placeholder; placeholders must be whole segments")]
    EmbeddedPlaceholder(String),
}

/// Startup-time configuration failure. Not recoverable: initialization must abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("route name `{0}` is registered more than once")]
    DuplicateName(String),

    #[error("route `{name}` pattern `{pattern}` is indistinguishable from route `{other}`")]
    AmbiguousPattern {
        name: String,
        pattern: String,
        other: String,
    },

    #[error("exactly one default route is required, found {found}")]
    MissingOrMultipleDefaults { found: usize },

    #[error("route `{name}` has an invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        name: String,
        pattern: String,
        #[source]
        source: PatternError,
    },

    #[error("{role} route `{name}` is not registered")]
    UnknownRedirectTarget { role: &'static str, name: String },

    #[error("{role} route `{name}` cannot serve as a redirect target: {reason}")]
    UnreachableRedirectTarget {
        role: &'static str,
        name: String,
        reason: &'static str,
    },
}

/// Parameter substitution failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    #[error("placeholder `{0}` has no value")]
    UnresolvedPlaceholder(String),
}

/// Caller-time failure building a path or link. Callers log it and fall back
/// to the default route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no route named `{0}`")]
    UnknownRoute(String),

    #[error(transparent)]
    BadParams(#[from] ExpansionError),
}

/// The session check could not produce a session state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session check failed: {0}")]
    Unavailable(String),

    #[error("malformed session response: {0}")]
    MalformedResponse(String),
}
