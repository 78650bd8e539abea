//! Authentication context.
//!
//! A [`Session`] is produced by a successful login and handed explicitly to
//! whatever needs the caller's identity. [`AuthContext`] owns the lifecycle:
//! set at login, cleared at logout.

use serde::{Deserialize, Serialize};
use crate::id::UserId;

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Records and submits own hours
    Employee,
    /// Reviews everyone's submissions
    Manager,
}

impl Role {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Manager => "Manager",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Username and password for login.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated user.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    /// Granted role
    pub role: Role,
    /// Authenticated user
    pub user_id: UserId,
    /// Display name
    pub user_name: String,
}

impl Session {
    /// Create a session from a login response.
    pub fn new(token: impl Into<String>, role: Role, user_id: UserId, user_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            role,
            user_id,
            user_name: user_name.into(),
        }
    }

    /// Bearer token for backend requests.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("role", &self.role)
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .finish_non_exhaustive()
    }
}

/// Holder of the current session, if any.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    session: Option<Session>,
}

impl AuthContext {
    /// Create an empty (logged out) context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the session from a successful login, replacing any previous one.
    pub fn login(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Forget the current session.
    pub fn logout(&mut self) -> Option<Session> {
        self.session.take()
    }

    /// Current session.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Current session if it carries `role`.
    pub fn session_for(&self, role: Role) -> Option<&Session> {
        self.session.as_ref().filter(|s| s.role == role)
    }
}
