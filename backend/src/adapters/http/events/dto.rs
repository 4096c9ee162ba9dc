//! HTTP DTOs for event endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::event::{Event, EventSession, SessionDiff};
use crate::domain::foundation::{EventSessionId, Timestamp};
use crate::domain::scheduling::{
    Diagnostic, Endpoint, IntervalSet, SessionDraft, SessionSlot, SlotStatus, TimeInterval,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create an event with its sessions.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub sessions: Vec<SessionDraft>,
}

/// Request to replace an event's sessions.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSessionsRequest {
    pub sessions: Vec<SessionDraft>,
}

/// One row of the session form as the client currently holds it.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotState {
    #[serde(default)]
    pub session_id: Option<EventSessionId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub start: Option<Timestamp>,
    #[serde(default)]
    pub end: Option<Timestamp>,
    #[serde(default)]
    pub status: SlotStatus,
}

impl SlotState {
    fn into_slot(self) -> SessionSlot {
        let interval = TimeInterval::from_parts(self.start, self.end, self.title.trim());
        SessionSlot::reconstitute(
            self.session_id,
            interval,
            self.title,
            self.description,
            self.capacity,
            self.status,
        )
    }
}

/// A single field edit on the session form.
///
/// `index == sessions.len()` edits a row that does not exist yet.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateEditRequest {
    #[serde(default)]
    pub sessions: Vec<SlotState>,
    pub index: usize,
    pub field: Endpoint,
    pub value: Timestamp,
}

impl ValidateEditRequest {
    pub fn interval_set(&self) -> IntervalSet {
        IntervalSet::reconstitute(self.sessions.iter().cloned().map(SlotState::into_slot).collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct EventSessionResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub capacity: u32,
    pub start: String,
    pub end: String,
}

impl From<&EventSession> for EventSessionResponse {
    fn from(session: &EventSession) -> Self {
        Self {
            id: session.id.to_string(),
            title: session.title.clone(),
            description: session.description.clone(),
            capacity: session.capacity,
            start: session.start.as_datetime().to_rfc3339(),
            end: session.end.as_datetime().to_rfc3339(),
        }
    }
}

/// Event details for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub organizer_id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub sessions: Vec<EventSessionResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id().to_string(),
            organizer_id: event.organizer_id().to_string(),
            title: event.title().to_string(),
            description: event.description().to_string(),
            location: event.location().map(str::to_string),
            sessions: event.sessions().iter().map(Into::into).collect(),
            created_at: event.created_at().as_datetime().to_rfc3339(),
            updated_at: event.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Response for a session update: the event and what changed.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateSessionsResponse {
    pub event: EventResponse,
    pub changes: Vec<SessionDiff>,
}

/// One row of the form after an accepted edit.
#[derive(Debug, Clone, Serialize)]
pub struct SlotResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub title: String,
    pub description: String,
    pub capacity: u32,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub status: SlotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}

impl From<&SessionSlot> for SlotResponse {
    fn from(slot: &SessionSlot) -> Self {
        Self {
            session_id: slot.session_id().map(|id| id.to_string()),
            title: slot.title().to_string(),
            description: slot.description().to_string(),
            capacity: slot.capacity(),
            start: slot.interval().start(),
            end: slot.interval().end(),
            status: slot.status(),
            diagnostic: slot.diagnostic().cloned(),
        }
    }
}

/// Outcome of validating one edit.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidateEditResponse {
    Accepted {
        sessions: Vec<SlotResponse>,
        all_sessions_saved: bool,
    },
    Rejected {
        diagnostic: Diagnostic,
    },
}
