//! Ownership trait for user-owned resources.
//!
//! An event has a single owning organizer. Implementing [`OwnedByUser`]
//! lets the authorization helpers answer "does this principal own it"
//! without handlers comparing user ids by hand.
//!
//! # Example
//!
//! ```ignore
//! impl OwnedByUser for Event {
//!     fn owner_id(&self) -> &UserId {
//!         &self.organizer_id
//!     }
//! }
//!
//! // In a handler:
//! let decision = require_owner(&principal, &event);  // denied unless owner
//! ```

use super::UserId;

/// Trait for aggregates that have a single owner.
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this resource.
    fn owner_id(&self) -> &UserId;

    /// Checks if the given user is the owner.
    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }
}
