//! CreateEventHandler - Command handler for creating events.

use std::sync::Arc;

use crate::application::handlers::log_authorization;
use crate::domain::event::{Event, EventError};
use crate::domain::foundation::{require_role, CommandMetadata, EventId, Role};
use crate::domain::scheduling::{IntervalSet, SessionDraft};
use crate::ports::EventRepository;

/// Command to create a new event with its sessions.
#[derive(Debug, Clone)]
pub struct CreateEventCommand {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub sessions: Vec<SessionDraft>,
}

/// Handler for creating events.
pub struct CreateEventHandler {
    repository: Arc<dyn EventRepository>,
}

impl CreateEventHandler {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: CreateEventCommand,
        metadata: CommandMetadata,
    ) -> Result<Event, EventError> {
        // 1. Only organizers create events
        let access = require_role(&metadata.principal, Role::Organizer, "create event");
        log_authorization(&access);
        access.into_result()?;

        // 2. Replay the submitted sessions through the validator and commit gate
        let sessions = IntervalSet::from_drafts(&cmd.sessions).map_err(|issues| {
            tracing::debug!(
                correlation_id = %metadata.correlation_id(),
                rejected = issues.len(),
                "Rejected event sessions"
            );
            EventError::SessionsRejected(issues)
        })?;

        // 3. Build and persist the aggregate
        let event = Event::create(
            EventId::new(),
            metadata.principal.id.clone(),
            cmd.title,
            cmd.description,
            cmd.location,
            &sessions,
        )?;

        self.repository.create_event(&event).await?;

        tracing::info!(
            correlation_id = %metadata.correlation_id(),
            event_id = %event.id(),
            sessions = event.sessions().len(),
            "Event created"
        );

        Ok(event)
    }
}
