//! User repository port.
//!
//! The session authority's only view of identity: a lookup keyed by the
//! session cookie's raw value, plus the email lookup used at sign-in.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserRecord;

/// Read access to user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id.
    ///
    /// Returns `None` if no such user exists.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError>;

    /// Find a user by exact email address.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError>;
}
