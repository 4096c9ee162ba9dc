//! Mock user directory for testing.
//!
//! Implements the `UserRepository` port over an in-memory map, so the
//! session authority and HTTP layer can be exercised without a database.
//!
//! # Example
//!
//! ```ignore
//! use symposium::adapters::auth::MockUserRepository;
//! use symposium::domain::user::UserRecord;
//!
//! let users = MockUserRepository::new().with_user(UserRecord::new(
//!     UserId::new("ada").unwrap(),
//!     Role::Organizer,
//!     "Ada Lovelace",
//!     "ada@example.com",
//! ));
//!
//! assert!(users.find_by_id(&UserId::new("ada").unwrap()).await?.is_some());
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Role, UserId};
use crate::domain::user::UserRecord;
use crate::ports::UserRepository;

/// In-memory user directory.
///
/// Users can be added and removed at runtime through `&self`, which lets a
/// test delete a user while a session cookie still names them.
#[derive(Debug, Default)]
pub struct MockUserRepository {
    users: RwLock<HashMap<UserId, UserRecord>>,
    /// Optional error returned by every lookup (for error testing)
    force_error: RwLock<Option<DomainError>>,
}

impl MockUserRepository {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user record.
    pub fn with_user(self, user: UserRecord) -> Self {
        self.add_user(user);
        self
    }

    /// Adds a user with generated profile fields.
    pub fn with_test_user(self, user_id: impl Into<String>, role: Role) -> Self {
        let user_id = user_id.into();
        let user = UserRecord::new(
            UserId::new(&user_id).unwrap(),
            role,
            format!("Test User {}", user_id),
            format!("{}@test.example.com", user_id),
        );
        self.with_user(user)
    }

    /// Forces every lookup to fail with `error`.
    pub fn with_error(self, error: DomainError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Clears the forced error.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Registers a user at runtime.
    pub fn add_user(&self, user: UserRecord) {
        self.users.write().unwrap().insert(user.id.clone(), user);
    }

    /// Deletes a user, leaving any cookie that names them dangling.
    pub fn remove_user(&self, user_id: &UserId) {
        self.users.write().unwrap().remove(user_id);
    }

    pub fn user_count(&self) -> usize {
        self.users.read().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}
