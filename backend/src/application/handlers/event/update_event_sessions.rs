//! UpdateEventSessionsHandler - Command handler for replacing an event's sessions.

use std::sync::Arc;

use crate::application::handlers::log_authorization;
use crate::domain::event::{Event, EventError, SessionDiff};
use crate::domain::foundation::{require_owner, CommandMetadata, EventId};
use crate::domain::scheduling::{IntervalSet, SessionDraft};
use crate::ports::EventRepository;

/// Command to replace the sessions of an event.
///
/// Drafts carrying a `session_id` update that session; drafts without one
/// add a session; stored sessions missing from the list are removed.
#[derive(Debug, Clone)]
pub struct UpdateEventSessionsCommand {
    pub event_id: EventId,
    pub sessions: Vec<SessionDraft>,
}

/// Result of a successful session update.
#[derive(Debug, Clone)]
pub struct UpdateEventSessionsResult {
    pub event: Event,
    pub diffs: Vec<SessionDiff>,
}

/// Handler for replacing event sessions.
pub struct UpdateEventSessionsHandler {
    repository: Arc<dyn EventRepository>,
}

impl UpdateEventSessionsHandler {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: UpdateEventSessionsCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateEventSessionsResult, EventError> {
        // 1. Load the event
        let mut event = self
            .repository
            .find_by_id(&cmd.event_id)
            .await?
            .ok_or(EventError::NotFound(cmd.event_id))?;

        // 2. Only the organizer who owns it may edit
        let access = require_owner(&metadata.principal, &event);
        log_authorization(&access);
        access.into_result()?;

        // 3. Validate the full submitted set server-side
        let sessions = IntervalSet::from_drafts(&cmd.sessions).map_err(|issues| {
            tracing::debug!(
                correlation_id = %metadata.correlation_id(),
                event_id = %cmd.event_id,
                rejected = issues.len(),
                "Rejected session update"
            );
            EventError::SessionsRejected(issues)
        })?;

        // 4. Diff against stored sessions and persist only the changes
        let diffs = event.replace_sessions(&sessions)?;
        if !diffs.is_empty() {
            self.repository
                .update_event_sessions(&cmd.event_id, &diffs)
                .await?;
        }

        tracing::info!(
            correlation_id = %metadata.correlation_id(),
            event_id = %cmd.event_id,
            changes = diffs.len(),
            "Event sessions updated"
        );

        Ok(UpdateEventSessionsResult { event, diffs })
    }
}
