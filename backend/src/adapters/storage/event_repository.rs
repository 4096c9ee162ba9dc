//! In-memory event repository.
//!
//! Used by tests and by database-less runs. Applies session diffs the same
//! way the postgres adapter does, so handlers behave identically on both.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::event::{Event, EventSession, SessionDiff};
use crate::domain::foundation::{DomainError, ErrorCode, EventId, Timestamp};
use crate::ports::EventRepository;

#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<EventId, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events (for test assertions).
    pub fn event_count(&self) -> usize {
        self.events.read().map(|events| events.len()).unwrap_or(0)
    }
}

fn poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "event store lock poisoned")
}

fn apply_diffs(sessions: &mut Vec<EventSession>, diffs: &[SessionDiff]) -> Result<(), DomainError> {
    for diff in diffs {
        match diff {
            SessionDiff::Removed(id) => sessions.retain(|s| s.id != *id),
            SessionDiff::Updated(session) => {
                let existing = sessions
                    .iter_mut()
                    .find(|s| s.id == session.id)
                    .ok_or_else(|| {
                        DomainError::database(format!("Session {} does not exist", session.id))
                    })?;
                *existing = session.clone();
            }
            SessionDiff::Added(session) => sessions.push(session.clone()),
        }
    }
    sessions.sort_by_key(|s| s.start);
    Ok(())
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create_event(&self, event: &Event) -> Result<(), DomainError> {
        let mut events = self.events.write().map_err(|_| poisoned())?;
        if events.contains_key(event.id()) {
            return Err(DomainError::database(format!(
                "Event {} already exists",
                event.id()
            )));
        }
        events.insert(*event.id(), event.clone());
        Ok(())
    }

    async fn update_event_sessions(
        &self,
        event_id: &EventId,
        diffs: &[SessionDiff],
    ) -> Result<(), DomainError> {
        let mut events = self.events.write().map_err(|_| poisoned())?;
        let stored = events.get(event_id).ok_or_else(|| {
            DomainError::new(ErrorCode::EventNotFound, format!("Event {} not found", event_id))
        })?;

        let mut sessions = stored.sessions().to_vec();
        apply_diffs(&mut sessions, diffs)?;

        let updated = Event::reconstitute(
            *stored.id(),
            stored.organizer_id().clone(),
            stored.title().to_string(),
            stored.description().to_string(),
            stored.location().map(str::to_string),
            sessions,
            *stored.created_at(),
            Timestamp::now(),
        );
        events.insert(*event_id, updated);
        Ok(())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, DomainError> {
        let events = self.events.read().map_err(|_| poisoned())?;
        Ok(events.get(id).cloned())
    }
}
