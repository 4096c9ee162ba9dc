//! GetEventHandler - Query handler for reading an event with its sessions.

use std::sync::Arc;

use crate::domain::event::{Event, EventError};
use crate::domain::foundation::EventId;
use crate::ports::EventRepository;

#[derive(Debug, Clone)]
pub struct GetEventQuery {
    pub event_id: EventId,
}

/// Handler for retrieving events. Any signed-in user may read an event.
pub struct GetEventHandler {
    repository: Arc<dyn EventRepository>,
}

impl GetEventHandler {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetEventQuery) -> Result<Event, EventError> {
        self.repository
            .find_by_id(&query.event_id)
            .await?
            .ok_or(EventError::NotFound(query.event_id))
    }
}
