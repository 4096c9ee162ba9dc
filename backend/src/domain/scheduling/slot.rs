//! One row of the session form: an interval plus its companion fields.

use serde::{Deserialize, Serialize};

use super::{CommitBlocker, Diagnostic, SlotStatus, TimeInterval};
use crate::domain::foundation::{EventSessionId, StateMachine, Timestamp, ValidationError};

/// A session slot inside an [`IntervalSet`](super::IntervalSet).
///
/// Slots are only mutated through the set so that every endpoint change
/// goes through the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSlot {
    /// Persisted session this slot edits, if any.
    session_id: Option<EventSessionId>,
    interval: TimeInterval,
    title: String,
    description: String,
    capacity: u32,
    status: SlotStatus,
    diagnostic: Option<Diagnostic>,
}

impl SessionSlot {
    /// A freshly opened, empty row.
    pub fn empty() -> Self {
        Self {
            session_id: None,
            interval: TimeInterval::unset(""),
            title: String::new(),
            description: String::new(),
            capacity: 0,
            status: SlotStatus::Empty,
            diagnostic: None,
        }
    }

    /// Rebuilds a slot from stored values without validation.
    pub fn reconstitute(
        session_id: Option<EventSessionId>,
        interval: TimeInterval,
        title: String,
        description: String,
        capacity: u32,
        status: SlotStatus,
    ) -> Self {
        Self {
            session_id,
            interval,
            title,
            description,
            capacity,
            status,
            diagnostic: None,
        }
    }

    pub fn session_id(&self) -> Option<EventSessionId> {
        self.session_id
    }

    pub fn interval(&self) -> &TimeInterval {
        &self.interval
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn status(&self) -> SlotStatus {
        self.status
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_ref()
    }

    /// Everything that keeps this slot from passing the commit gate.
    pub fn commit_blockers(&self) -> Vec<CommitBlocker> {
        let mut blockers = self.readiness_blockers();
        if self.status != SlotStatus::Saved {
            blockers.push(CommitBlocker::NotConfirmed);
        }
        blockers
    }

    /// Blockers other than the confirmation itself.
    pub(crate) fn readiness_blockers(&self) -> Vec<CommitBlocker> {
        let mut blockers = Vec::new();
        if self.interval.start().is_none() {
            blockers.push(CommitBlocker::MissingStart);
        }
        if self.interval.end().is_none() {
            blockers.push(CommitBlocker::MissingEnd);
        }
        if self.title.trim().is_empty() {
            blockers.push(CommitBlocker::MissingTitle);
        }
        if self.description.trim().is_empty() {
            blockers.push(CommitBlocker::MissingDescription);
        }
        if self.capacity == 0 {
            blockers.push(CommitBlocker::ZeroCapacity);
        }
        if self.diagnostic.is_some() {
            blockers.push(CommitBlocker::OpenDiagnostic);
        }
        blockers
    }

    pub(crate) fn set_session_id(&mut self, id: Option<EventSessionId>) {
        self.session_id = id;
    }

    pub(crate) fn set_details(&mut self, title: String, description: String, capacity: u32) {
        self.interval.set_owner_label(title.trim());
        self.title = title;
        self.description = description;
        self.capacity = capacity;
    }

    pub(crate) fn set_endpoint(&mut self, which: super::Endpoint, value: Timestamp) {
        self.interval.set_endpoint(which, value);
    }

    pub(crate) fn attach_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostic = Some(diagnostic);
    }

    pub(crate) fn clear_diagnostic(&mut self) {
        self.diagnostic = None;
    }

    pub(crate) fn diagnostic_mut(&mut self) -> Option<&mut Diagnostic> {
        self.diagnostic.as_mut()
    }

    /// Moves the slot into `Draft` after an accepted change.
    pub(crate) fn mark_edited(&mut self) -> Result<(), ValidationError> {
        if self.status != SlotStatus::Draft {
            self.status = self.status.transition_to(SlotStatus::Draft)?;
        }
        Ok(())
    }

    /// Moves a `Draft` slot into `Saved`.
    pub(crate) fn mark_saved(&mut self) -> Result<(), ValidationError> {
        if self.status != SlotStatus::Saved {
            self.status = self.status.transition_to(SlotStatus::Saved)?;
        }
        Ok(())
    }
}

impl Default for SessionSlot {
    fn default() -> Self {
        Self::empty()
    }
}

/// A submitted session, as received from a client form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDraft {
    /// Set when the draft edits an already persisted session.
    #[serde(default)]
    pub session_id: Option<EventSessionId>,
    pub title: String,
    pub description: String,
    pub capacity: u32,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_reports_every_blocker() {
        let blockers = SessionSlot::empty().commit_blockers();

        assert_eq!(
            blockers,
            vec![
                CommitBlocker::MissingStart,
                CommitBlocker::MissingEnd,
                CommitBlocker::MissingTitle,
                CommitBlocker::MissingDescription,
                CommitBlocker::ZeroCapacity,
                CommitBlocker::NotConfirmed,
            ]
        );
    }

    #[test]
    fn whitespace_title_counts_as_missing() {
        let mut slot = SessionSlot::empty();
        slot.set_details("   ".to_string(), "Talk".to_string(), 10);

        assert!(slot.commit_blockers().contains(&CommitBlocker::MissingTitle));
        assert!(!slot.commit_blockers().contains(&CommitBlocker::MissingDescription));
    }

    #[test]
    fn details_set_owner_label() {
        let mut slot = SessionSlot::empty();
        slot.set_details(" Keynote ".to_string(), "Opening".to_string(), 100);

        assert_eq!(slot.interval().owner_label(), "Keynote");
    }

    #[test]
    fn cannot_save_without_a_draft() {
        let mut slot = SessionSlot::empty();
        assert!(slot.mark_saved().is_err());

        slot.mark_edited().unwrap();
        slot.mark_saved().unwrap();
        assert_eq!(slot.status(), SlotStatus::Saved);
    }
}
