//! Event aggregate.
//!
//! An event is owned by the organizer who created it and carries an ordered
//! list of sessions. Sessions are only ever written from an
//! [`IntervalSet`] that passed the commit gate, so a stored event never
//! holds overlapping or inverted sessions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{EventError, EventSession, SessionDiff};
use crate::domain::foundation::{
    Authorizable, EventId, EventSessionId, OwnedByUser, Timestamp, UserId,
};
use crate::domain::scheduling::{IntervalSet, SessionSlot, SlotStatus, TimeInterval};

/// Maximum length for event title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Event aggregate.
///
/// # Invariants
///
/// - `title` is 1-200 characters, non-empty
/// - `sessions` is overlap-free and every session has `start < end`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    organizer_id: UserId,
    title: String,
    description: String,
    location: Option<String>,
    sessions: Vec<EventSession>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Event {
    /// Creates an event from a committed interval set.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the title is empty or too long
    /// - `SessionsRejected` if any slot fails the commit gate
    pub fn create(
        id: EventId,
        organizer_id: UserId,
        title: String,
        description: String,
        location: Option<String>,
        sessions: &IntervalSet,
    ) -> Result<Self, EventError> {
        Self::validate_title(&title)?;
        let sessions = committed_sessions(sessions, &[])?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            organizer_id,
            title,
            description,
            location,
            sessions,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute an event from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: EventId,
        organizer_id: UserId,
        title: String,
        description: String,
        location: Option<String>,
        sessions: Vec<EventSession>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            organizer_id,
            title,
            description,
            location,
            sessions,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn organizer_id(&self) -> &UserId {
        &self.organizer_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn sessions(&self) -> &[EventSession] {
        &self.sessions
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sessions
    // ─────────────────────────────────────────────────────────────────────────

    /// The stored sessions as a fully saved interval set, ready for editing.
    pub fn session_set(&self) -> IntervalSet {
        let slots = self
            .sessions
            .iter()
            .map(|session| {
                SessionSlot::reconstitute(
                    Some(session.id),
                    TimeInterval::bounded(session.start, session.end, session.title.clone()),
                    session.title.clone(),
                    session.description.clone(),
                    session.capacity,
                    SlotStatus::Saved,
                )
            })
            .collect();
        IntervalSet::reconstitute(slots)
    }

    /// Replaces the sessions with a committed interval set.
    ///
    /// Returns the diffs against the previous sessions, removals first,
    /// in the order the persistence layer should apply them.
    ///
    /// # Errors
    ///
    /// - `SessionsRejected` if any slot fails the commit gate
    /// - `UnknownSession` if a slot references a session of another event
    /// - `DuplicateSession` if two slots reference the same session
    pub fn replace_sessions(&mut self, sessions: &IntervalSet) -> Result<Vec<SessionDiff>, EventError> {
        let next = committed_sessions(sessions, &self.sessions)?;

        let mut diffs: Vec<SessionDiff> = self
            .sessions
            .iter()
            .filter(|old| !next.iter().any(|new| new.id == old.id))
            .map(|old| SessionDiff::Removed(old.id))
            .collect();

        for session in &next {
            match self.sessions.iter().find(|old| old.id == session.id) {
                None => diffs.push(SessionDiff::Added(session.clone())),
                Some(old) if old != session => diffs.push(SessionDiff::Updated(session.clone())),
                Some(_) => {}
            }
        }

        self.sessions = next;
        if !diffs.is_empty() {
            self.updated_at = Timestamp::now();
        }
        Ok(diffs)
    }

    fn validate_title(title: &str) -> Result<(), EventError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(EventError::validation("title", "Title cannot be empty"));
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(EventError::validation(
                "title",
                format!("Title cannot exceed {} characters", MAX_TITLE_LENGTH),
            ));
        }
        Ok(())
    }
}

/// Turns a set that passed the commit gate into stored sessions.
///
/// Slots without an id get a fresh one; slots with an id must refer to one
/// of `existing`, and to a different one than every other slot.
fn committed_sessions(
    set: &IntervalSet,
    existing: &[EventSession],
) -> Result<Vec<EventSession>, EventError> {
    let issues = set.commit_issues();
    if !issues.is_empty() {
        return Err(EventError::SessionsRejected(issues));
    }

    let mut claimed = HashSet::new();
    set.slots()
        .iter()
        .map(|slot| {
            let id = match slot.session_id() {
                Some(id) if !existing.iter().any(|s| s.id == id) => {
                    return Err(EventError::UnknownSession(id))
                }
                Some(id) if !claimed.insert(id) => return Err(EventError::DuplicateSession(id)),
                Some(id) => id,
                None => EventSessionId::new(),
            };
            EventSession::from_slot(id, slot)
        })
        .collect()
}

impl OwnedByUser for Event {
    fn owner_id(&self) -> &UserId {
        &self.organizer_id
    }
}

impl Authorizable for Event {
    const RESOURCE_TYPE: &'static str = "Event";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}
