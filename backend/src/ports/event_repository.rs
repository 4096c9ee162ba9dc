//! Event repository port.
//!
//! Session changes are written as [`SessionDiff`]s so implementations can
//! touch only the affected rows.

use async_trait::async_trait;

use crate::domain::event::{Event, SessionDiff};
use crate::domain::foundation::{DomainError, EventId};

/// Repository port for Event aggregate persistence.
///
/// Concurrent writers are not coordinated: the last committed update wins.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Save a new event together with its sessions.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create_event(&self, event: &Event) -> Result<(), DomainError>;

    /// Apply session diffs to an existing event.
    ///
    /// # Errors
    ///
    /// - `EventNotFound` if the event doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_event_sessions(
        &self,
        event_id: &EventId,
        diffs: &[SessionDiff],
    ) -> Result<(), DomainError>;

    /// Find an event with its sessions, ordered by position.
    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, DomainError>;
}
