//! Stored event sessions and the diffs used to persist changes.

use serde::{Deserialize, Serialize};

use super::EventError;
use crate::domain::foundation::{EventSessionId, Timestamp};
use crate::domain::scheduling::SessionSlot;

/// One committed session of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSession {
    pub id: EventSessionId,
    pub title: String,
    pub description: String,
    pub capacity: u32,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl EventSession {
    /// Builds a stored session from a slot that passed the commit gate.
    pub(crate) fn from_slot(id: EventSessionId, slot: &SessionSlot) -> Result<Self, EventError> {
        let (start, end) = slot
            .interval()
            .bounds()
            .ok_or_else(|| EventError::validation("sessions", "session has no time range"))?;
        Ok(Self {
            id,
            title: slot.title().trim().to_string(),
            description: slot.description().trim().to_string(),
            capacity: slot.capacity(),
            start,
            end,
        })
    }
}

/// A single change to an event's sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "session", rename_all = "snake_case")]
pub enum SessionDiff {
    Added(EventSession),
    Updated(EventSession),
    Removed(EventSessionId),
}

impl SessionDiff {
    /// The session this diff touches.
    pub fn session_id(&self) -> EventSessionId {
        match self {
            SessionDiff::Added(session) | SessionDiff::Updated(session) => session.id,
            SessionDiff::Removed(id) => *id,
        }
    }
}
