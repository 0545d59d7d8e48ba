//! Session snapshots and the asynchronous session check
//!
//! The backend is the sole authority on who is logged in. On load the client
//! posts to the "logged-in user" endpoint and gets back a document like
//!
//! ```json
//! {"loggedIn": true, "user": {"email": "ann@example.com", "admin": false}}
//! ```
//!
//! which is reduced to a [`SessionState`] for the navigation guard.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::SessionError;

/// Read-only session snapshot consumed by the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    AuthenticatedUser { is_admin: bool },
}

impl SessionState {
    pub fn user() -> Self {
        SessionState::AuthenticatedUser { is_admin: false }
    }

    pub fn admin() -> Self {
        SessionState::AuthenticatedUser { is_admin: true }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::AuthenticatedUser { .. })
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, SessionState::AuthenticatedUser { is_admin: true })
    }

    /// Session for an optional user record. A user without an email does not
    /// count as logged in.
    pub fn from_user(user: Option<&SessionUser>) -> Self {
        match user {
            Some(user) if !user.email.trim().is_empty() => {
                SessionState::AuthenticatedUser { is_admin: user.admin }
            }
            _ => SessionState::Anonymous,
        }
    }
}

/// The logged-in user as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub admin: bool,
}

/// Body of the backend's session-check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCheckResponse {
    #[serde(default)]
    pub logged_in: bool,

    #[serde(default)]
    pub user: Option<SessionUser>,
}

impl SessionCheckResponse {
    pub fn from_json(body: &str) -> Result<Self, SessionError> {
        serde_json::from_str(body).map_err(|err| SessionError::MalformedResponse(err.to_string()))
    }

    pub fn into_session_state(self) -> SessionState {
        if self.logged_in {
            SessionState::from_user(self.user.as_ref())
        } else {
            SessionState::Anonymous
        }
    }
}

/// Asynchronous source of session truth (typically an HTTP call)
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Ask the backend who is logged in
    async fn check_session(&self) -> Result<SessionState, SessionError>;

    /// Provider name for diagnostics
    fn name(&self) -> &'static str;
}

/// In-memory session provider with a settable outcome
///
/// Stands in for the backend in tests and offline tooling.
#[derive(Debug)]
pub struct StaticSessionProvider {
    outcome: RwLock<Result<SessionState, SessionError>>,
}

impl StaticSessionProvider {
    pub fn new(state: SessionState) -> Self {
        Self {
            outcome: RwLock::new(Ok(state)),
        }
    }

    /// A provider whose checks fail, as when the backend is unreachable
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outcome: RwLock::new(Err(SessionError::Unavailable(reason.into()))),
        }
    }

    pub async fn set_state(&self, state: SessionState) {
        *self.outcome.write().await = Ok(state);
    }

    pub async fn set_error(&self, error: SessionError) {
        *self.outcome.write().await = Err(error);
    }
}

impl Default for StaticSessionProvider {
    fn default() -> Self {
        Self::new(SessionState::Anonymous)
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn check_session(&self) -> Result<SessionState, SessionError> {
        self.outcome.read().await.clone()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
