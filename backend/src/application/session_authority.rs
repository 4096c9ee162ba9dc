//! Session authority - resolves the session cookie to a principal.
//!
//! The session cookie's value is the user's id, unsigned and without an
//! embedded expiry. Presence of the cookie proves nothing: every call looks
//! the user up again, and a cookie naming a user that no longer exists is
//! deleted so the client stops presenting it.

use std::sync::Arc;

use crate::domain::foundation::{AuthError, Principal, UserId};
use crate::domain::user::UserRecord;
use crate::ports::{CookieJar, UserRepository};

/// Name of the session cookie, shared by the read and login/logout paths.
pub const SESSION_COOKIE: &str = "user-token";

/// Outcome of a session lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLookup {
    /// No session cookie was presented.
    Anonymous,
    /// A cookie was presented but named no existing user; it has been cleared.
    Stale,
    Authenticated(Principal),
}

impl SessionLookup {
    pub fn into_principal(self) -> Option<Principal> {
        match self {
            SessionLookup::Authenticated(principal) => Some(principal),
            SessionLookup::Anonymous | SessionLookup::Stale => None,
        }
    }
}

/// Maps a request's session cookie to an authenticated principal.
///
/// Holds no per-request state and caches nothing, so one instance is shared
/// by every request.
#[derive(Clone)]
pub struct SessionAuthority {
    users: Arc<dyn UserRepository>,
    cookie_name: String,
}

impl SessionAuthority {
    pub fn new(users: Arc<dyn UserRepository>, cookie_name: impl Into<String>) -> Self {
        Self {
            users,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Resolves the cookie to a principal, or `None` if there is no session.
    ///
    /// A missing or dangling cookie is not an error. A dangling cookie is
    /// deleted through `jar`.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if the user lookup itself fails
    pub async fn resolve_current_user(
        &self,
        jar: &mut dyn CookieJar,
    ) -> Result<Option<Principal>, AuthError> {
        Ok(self.lookup(jar).await?.into_principal())
    }

    /// Like [`resolve_current_user`](Self::resolve_current_user), but keeps
    /// apart "no cookie" and "stale cookie".
    pub async fn lookup(&self, jar: &mut dyn CookieJar) -> Result<SessionLookup, AuthError> {
        let Some(token) = jar.get(&self.cookie_name) else {
            return Ok(SessionLookup::Anonymous);
        };

        let record = match UserId::new(token) {
            Ok(user_id) => self
                .users
                .find_by_id(&user_id)
                .await
                .map_err(|e| AuthError::service_unavailable(e.to_string()))?,
            Err(_) => None,
        };

        match record {
            Some(record) => Ok(SessionLookup::Authenticated(record.into())),
            None => {
                tracing::info!(cookie = %self.cookie_name, "Clearing session cookie for unknown user");
                jar.delete(&self.cookie_name);
                Ok(SessionLookup::Stale)
            }
        }
    }

    /// Signs in the account registered under `email`.
    ///
    /// Credentials are checked upstream of this service; an address that
    /// names no account is reported as `Unauthenticated`.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if no user has this email
    /// - `ServiceUnavailable` if the user lookup itself fails
    pub async fn sign_in(
        &self,
        jar: &mut dyn CookieJar,
        email: &str,
    ) -> Result<Principal, AuthError> {
        let record = self
            .users
            .find_by_email(email.trim())
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?
            .ok_or(AuthError::Unauthenticated)?;

        self.establish(jar, &record);
        tracing::info!(user_id = %record.id, "Session established");
        Ok(record.into())
    }

    /// Starts a session for `user` by writing the session cookie.
    pub fn establish(&self, jar: &mut dyn CookieJar, user: &UserRecord) {
        jar.set(&self.cookie_name, user.id.as_str());
    }

    /// Ends the session by deleting the session cookie.
    pub fn sign_out(&self, jar: &mut dyn CookieJar) {
        jar.delete(&self.cookie_name);
    }
}
