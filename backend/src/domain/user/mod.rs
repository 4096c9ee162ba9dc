//! User records as stored by the persistence layer.
//!
//! The session authority treats users as an opaque lookup keyed by the
//! session cookie's value; this module only describes the row shape and how
//! it becomes a [`Principal`].

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Principal, Role, UserId};

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub affiliation: Option<String>,
    pub bio: Option<String>,
}

impl UserRecord {
    /// Creates a record with empty profile fields.
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

    /// Builder: set the affiliation.
    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }

    /// Builder: set the bio.
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }
}

impl From<UserRecord> for Principal {
    fn from(record: UserRecord) -> Self {
        Principal {
            id: record.id,
            role: record.role,
            name: record.name,
            email: record.email,
            affiliation: record.affiliation,
            bio: record.bio,
        }
    }
}
