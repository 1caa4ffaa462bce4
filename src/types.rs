//! Session types: in-memory record, wire payloads, and errors.
//!
//! `User` and `Team` are application-defined records. Only the fields the
//! gates inspect (`nick`, `admin`) are typed; everything else the backend
//! sends is carried through untouched.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by session resource calls.
///
/// The backend makes no finer distinction than "the call failed", so the
/// variants only separate where the failure happened.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A configuration value was rejected.
    #[error("config error: {0}")]
    Config(String),

    /// The HTTP request could not be sent or the body could not be read.
    #[error("session request failed: {0}")]
    Transport(String),

    /// The session endpoint returned a non-success HTTP status.
    #[error("session endpoint returned status {status}")]
    Status { status: u16, body: String },

    /// The response body was not a valid session payload.
    #[error("session response parse failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// USER / TEAM
// =============================================================================

/// The authenticated user as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Login nickname.
    #[serde(default)]
    pub nick: String,
    /// Whether the user may open admin views.
    #[serde(default)]
    pub admin: bool,
    /// Remaining backend fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    #[must_use]
    pub fn new(nick: impl Into<String>) -> Self {
        Self { nick: nick.into(), admin: false, extra: Map::new() }
    }

    #[must_use]
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }
}

/// The user's team. Opaque to the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Team {
    pub fields: Map<String, Value>,
}

impl Team {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl From<Map<String, Value>> for Team {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

// =============================================================================
// WIRE PAYLOADS
// =============================================================================

/// Body returned by the session endpoint on login and refresh.
///
/// Missing and `null` fields both mean "no active session".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub team: Option<Team>,
}

/// Login form body sent on create.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// In-memory session record. `user` and `team` always move together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub user: Option<User>,
    pub team: Option<Team>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.admin)
    }

    /// Overwrite both fields from a server response.
    pub(crate) fn replace(&mut self, payload: SessionPayload) {
        self.user = payload.user;
        self.team = payload.team;
    }

    pub(crate) fn clear(&mut self) {
        self.user = None;
        self.team = None;
    }
}

impl From<SessionPayload> for Session {
    fn from(payload: SessionPayload) -> Self {
        Self { user: payload.user, team: payload.team }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
