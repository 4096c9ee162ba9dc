//! Authentication types for the domain layer.
//!
//! A [`Principal`] is the authenticated caller of a request, resolved from the
//! session cookie by the `SessionAuthority`. It has **no transport
//! dependencies**: the HTTP middleware, WebSocket upgrade, and tests all work
//! with the same type.
//!
//! # Example
//!
//! ```ignore
//! // In HTTP middleware, after the session authority resolved the cookie:
//! if let Some(principal) = authority.resolve_current_user(&mut jar).await? {
//!     request.extensions_mut().insert(principal);
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Role, UserId};

/// Authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The user's identifier; also the raw session cookie value.
    pub id: UserId,

    /// The single role stored on the user record.
    pub role: Role,

    /// Display name.
    pub name: String,

    /// Contact email address.
    pub email: String,

    /// Institution or company, if the user filled it in.
    pub affiliation: Option<String>,

    /// Free-form profile text.
    pub bio: Option<String>,
}

impl Principal {
    /// Creates a principal with empty optional profile fields.
    pub fn new(id: UserId, role: Role, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            role,
            name: name.into(),
            email: email.into(),
            affiliation: None,
            bio: None,
        }
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// Authentication and authorization failures.
///
/// `Unauthenticated` and `StaleSession` are both reported to clients as 401;
/// they are kept apart so logs and responses can say why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No session cookie was presented where one is required.
    #[error("Authentication required")]
    Unauthenticated,

    /// A session cookie was presented but its user no longer exists.
    #[error("Session is no longer valid")]
    StaleSession,

    /// The principal lacks the role or ownership the operation needs.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The user lookup itself failed (database unreachable, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should sign in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::Unauthenticated | AuthError::StaleSession)
    }

    /// Returns true if this is a transient error that may succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
