//! The ordered set of session slots that belongs to one event.

use serde::{Deserialize, Serialize};

use super::{
    validate_interval_edit, CommitBlocker, Diagnostic, DiagnosticKind, Endpoint,
    IncompleteInterval, SchedulingError, SessionDraft, SessionSlot, SlotStatus, ValidationResult,
};
use crate::domain::foundation::{Timestamp, ValidationError};

/// Session slots of a single event, indexed by position.
///
/// # Invariants
///
/// - Every bounded interval has `start < end`
/// - No two bounded intervals overlap (touching boundaries are allowed)
/// - Endpoint values only enter the set through [`validate_interval_edit`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSet {
    slots: Vec<SessionSlot>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a set from stored slots without validation.
    pub fn reconstitute(slots: Vec<SessionSlot>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[SessionSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&SessionSlot> {
        self.slots.get(index)
    }

    /// Opens a new empty row at the end of the set, returning its index.
    pub fn open_slot(&mut self) -> usize {
        self.slots.push(SessionSlot::empty());
        self.slots.len() - 1
    }

    /// Validates and applies an endpoint edit in place.
    ///
    /// On rejection the endpoint values are left alone and the diagnostic is
    /// attached to the slot (opening the row first if `index == len`), so it
    /// blocks the commit gate until a later edit is accepted.
    pub fn edit_endpoint(
        &mut self,
        index: usize,
        field: Endpoint,
        value: Timestamp,
    ) -> Result<Option<Diagnostic>, SchedulingError> {
        match validate_interval_edit(self, index, field, value)? {
            ValidationResult::Accepted { updated_set } => {
                *self = updated_set;
                Ok(None)
            }
            ValidationResult::Rejected { diagnostic } => {
                if index == self.slots.len() {
                    self.open_slot();
                }
                self.slot_mut(index)?.attach_diagnostic(diagnostic.clone());
                Ok(Some(diagnostic))
            }
        }
    }

    /// Sets the companion fields of a slot.
    ///
    /// A `Saved` slot drops back to `Draft`; an `Empty` slot stays empty
    /// until an endpoint is accepted.
    pub fn set_details(
        &mut self,
        index: usize,
        title: impl Into<String>,
        description: impl Into<String>,
        capacity: u32,
    ) -> Result<(), SchedulingError> {
        let slot = self.slot_mut(index)?;
        slot.set_details(title.into(), description.into(), capacity);
        if slot.status() == SlotStatus::Saved {
            slot.mark_edited()?;
        }
        Ok(())
    }

    /// The user confirms a slot: `Draft → Saved`.
    ///
    /// # Errors
    ///
    /// - `Incomplete` if endpoints or companion fields are missing, or a
    ///   diagnostic is still open
    pub fn confirm(&mut self, index: usize) -> Result<(), SchedulingError> {
        let slot = self.slot_mut(index)?;
        let blockers = slot.readiness_blockers();
        if !blockers.is_empty() {
            return Err(SchedulingError::Incomplete(IncompleteInterval {
                index,
                blockers,
                diagnostic: slot.diagnostic().cloned(),
            }));
        }
        slot.mark_saved()?;
        Ok(())
    }

    /// The user reopens a saved slot for editing: `Saved → Draft`.
    pub fn begin_edit(&mut self, index: usize) -> Result<(), SchedulingError> {
        let slot = self.slot_mut(index)?;
        if slot.status() == SlotStatus::Empty {
            return Err(ValidationError::invalid_format(
                "state_transition",
                "an empty session has nothing to edit",
            )
            .into());
        }
        slot.mark_edited()?;
        Ok(())
    }

    /// Deletes a slot; later slots shift down by one.
    ///
    /// Conflict diagnostics on other slots are re-pointed at the shifted
    /// indices, and dropped if they referred to the removed slot.
    pub fn remove(&mut self, index: usize) -> Result<SessionSlot, SchedulingError> {
        if index >= self.slots.len() {
            return Err(SchedulingError::out_of_bounds(index, self.slots.len()));
        }
        let removed = self.slots.remove(index);

        for slot in &mut self.slots {
            let Some(diagnostic) = slot.diagnostic_mut() else {
                continue;
            };
            if diagnostic.kind != DiagnosticKind::Conflict {
                continue;
            }
            match diagnostic.conflicting_index {
                Some(i) if i == index => slot.clear_diagnostic(),
                Some(i) if i > index => diagnostic.conflicting_index = Some(i - 1),
                _ => {}
            }
        }

        Ok(removed)
    }

    /// Per-index commit-gate failures, in index order.
    pub fn commit_issues(&self) -> Vec<IncompleteInterval> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let blockers = slot.commit_blockers();
                (!blockers.is_empty()).then(|| IncompleteInterval {
                    index,
                    blockers,
                    diagnostic: slot.diagnostic().cloned(),
                })
            })
            .collect()
    }

    /// True when every slot is complete, diagnostic-free, and saved.
    ///
    /// An empty set passes.
    pub fn all_sessions_saved(&self) -> bool {
        self.slots
            .iter()
            .all(|slot| slot.commit_blockers().is_empty())
    }

    /// Replays submitted sessions through the validator and the commit gate.
    ///
    /// Each draft is opened as a new row, its companion fields are set, then
    /// its start and end are edited in that order and the row is confirmed.
    /// Conflicts are therefore reported on the later of two overlapping
    /// drafts, naming the earlier one.
    pub fn from_drafts(drafts: &[SessionDraft]) -> Result<Self, Vec<IncompleteInterval>> {
        let mut set = IntervalSet::new();

        for draft in drafts {
            let index = set.open_slot();
            set.replay_draft(index, draft).map_err(|err| match err {
                SchedulingError::Incomplete(issue) => vec![issue],
                _ => vec![IncompleteInterval {
                    index,
                    blockers: vec![CommitBlocker::NotConfirmed],
                    diagnostic: None,
                }],
            })?;
        }

        let issues = set.commit_issues();
        if issues.is_empty() {
            Ok(set)
        } else {
            Err(issues)
        }
    }

    fn replay_draft(&mut self, index: usize, draft: &SessionDraft) -> Result<(), SchedulingError> {
        self.slot_mut(index)?.set_session_id(draft.session_id);
        self.set_details(index, &draft.title, &draft.description, draft.capacity)?;

        let mut rejected = false;
        if let Some(start) = draft.start {
            rejected = self.edit_endpoint(index, Endpoint::Start, start)?.is_some();
        }
        if let (false, Some(end)) = (rejected, draft.end) {
            self.edit_endpoint(index, Endpoint::End, end)?;
        }

        // Incomplete rows stay in Draft and surface through commit_issues.
        match self.confirm(index) {
            Ok(()) | Err(SchedulingError::Incomplete(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Applies an already validated endpoint value.
    pub(crate) fn apply_accepted(
        &mut self,
        index: usize,
        field: Endpoint,
        value: Timestamp,
    ) -> Result<(), SchedulingError> {
        if index == self.slots.len() {
            self.open_slot();
        }
        let slot = self.slot_mut(index)?;
        slot.set_endpoint(field, value);
        slot.clear_diagnostic();
        slot.mark_edited()?;
        Ok(())
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut SessionSlot, SchedulingError> {
        let len = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or_else(|| SchedulingError::out_of_bounds(index, len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hhmm: &str) -> Timestamp {
        Timestamp::parse_rfc3339(&format!("2024-11-15T{}:00Z", hhmm)).unwrap()
    }

    fn draft(title: &str, start: &str, end: &str) -> SessionDraft {
        SessionDraft {
            session_id: None,
            title: title.to_string(),
            description: format!("About {}", title),
            capacity: 30,
            start: Some(at(start)),
            end: Some(at(end)),
        }
    }

    fn saved_slot(set: &mut IntervalSet, title: &str, start: &str, end: &str) -> usize {
        let index = set.open_slot();
        set.set_details(index, title, "A talk", 20).unwrap();
        assert!(set.edit_endpoint(index, Endpoint::Start, at(start)).unwrap().is_none());
        assert!(set.edit_endpoint(index, Endpoint::End, at(end)).unwrap().is_none());
        set.confirm(index).unwrap();
        index
    }

    // ════════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn confirm_requires_companion_fields() {
        let mut set = IntervalSet::new();
        set.edit_endpoint(0, Endpoint::Start, at("09:00")).unwrap();
        set.edit_endpoint(0, Endpoint::End, at("10:00")).unwrap();

        let err = set.confirm(0).unwrap_err();

        match err {
            SchedulingError::Incomplete(issue) => {
                assert_eq!(issue.index, 0);
                assert!(issue.blockers.contains(&CommitBlocker::MissingTitle));
                assert!(issue.blockers.contains(&CommitBlocker::ZeroCapacity));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(set.slot(0).unwrap().status(), SlotStatus::Draft);
    }

    #[test]
    fn editing_a_saved_slot_demotes_it_to_draft() {
        let mut set = IntervalSet::new();
        saved_slot(&mut set, "Keynote", "09:00", "10:00");
        assert!(set.all_sessions_saved());

        set.edit_endpoint(0, Endpoint::End, at("10:30")).unwrap();

        assert_eq!(set.slot(0).unwrap().status(), SlotStatus::Draft);
        assert!(!set.all_sessions_saved());
    }

    #[test]
    fn begin_edit_reopens_saved_slot() {
        let mut set = IntervalSet::new();
        saved_slot(&mut set, "Keynote", "09:00", "10:00");

        set.begin_edit(0).unwrap();

        assert_eq!(set.slot(0).unwrap().status(), SlotStatus::Draft);
        set.confirm(0).unwrap();
        assert!(set.all_sessions_saved());
    }

    #[test]
    fn begin_edit_on_empty_slot_is_invalid() {
        let mut set = IntervalSet::new();
        set.open_slot();

        assert!(matches!(
            set.begin_edit(0),
            Err(SchedulingError::InvalidTransition(_))
        ));
        assert_eq!(set.slot(0).unwrap().status(), SlotStatus::Empty);
    }

    #[test]
    fn rejected_edit_keeps_status_and_blocks_commit() {
        let mut set = IntervalSet::new();
        saved_slot(&mut set, "Keynote", "09:00", "10:00");
        saved_slot(&mut set, "Panel", "10:00", "11:00");

        let diagnostic = set.edit_endpoint(1, Endpoint::Start, at("09:30")).unwrap();

        assert_eq!(diagnostic.unwrap().conflicting_index, Some(0));
        let slot = set.slot(1).unwrap();
        assert_eq!(slot.status(), SlotStatus::Saved);
        assert_eq!(slot.interval().start(), Some(at("10:00")));
        assert!(slot.diagnostic().is_some());
        assert!(!set.all_sessions_saved());
        assert!(set.confirm(1).is_err());
    }

    #[test]
    fn accepted_edit_clears_previous_diagnostic() {
        let mut set = IntervalSet::new();
        saved_slot(&mut set, "Keynote", "09:00", "10:00");
        saved_slot(&mut set, "Panel", "10:00", "11:00");
        set.edit_endpoint(1, Endpoint::Start, at("09:30")).unwrap();

        assert!(set.edit_endpoint(1, Endpoint::Start, at("10:15")).unwrap().is_none());

        assert!(set.slot(1).unwrap().diagnostic().is_none());
        set.confirm(1).unwrap();
        assert!(set.all_sessions_saved());
    }

    #[test]
    fn rejected_new_row_is_opened_with_diagnostic() {
        let mut set = IntervalSet::new();
        saved_slot(&mut set, "Keynote", "09:00", "10:00");

        let diagnostic = set.edit_endpoint(1, Endpoint::Start, at("09:15")).unwrap();

        assert!(diagnostic.is_some());
        assert_eq!(set.len(), 2);
        assert_eq!(set.slot(1).unwrap().status(), SlotStatus::Empty);
        assert!(set.slot(1).unwrap().interval().start().is_none());
    }

    #[test]
    fn remove_shrinks_set_and_stops_considering_slot() {
        let mut set = IntervalSet::new();
        saved_slot(&mut set, "Keynote", "09:00", "10:00");
        saved_slot(&mut set, "Panel", "11:00", "12:00");

        let removed = set.remove(0).unwrap();

        assert_eq!(removed.title(), "Keynote");
        assert_eq!(set.len(), 1);
        assert!(set.edit_endpoint(0, Endpoint::Start, at("09:00")).unwrap().is_none());
    }

    #[test]
    fn remove_repoints_conflict_diagnostics() {
        let mut set = IntervalSet::new();
        saved_slot(&mut set, "Intro", "08:00", "09:00");
        saved_slot(&mut set, "Keynote", "09:00", "10:00");
        saved_slot(&mut set, "Panel", "10:00", "11:00");
        set.edit_endpoint(2, Endpoint::Start, at("09:30")).unwrap();

        set.remove(0).unwrap();
        assert_eq!(
            set.slot(1).unwrap().diagnostic().unwrap().conflicting_index,
            Some(0)
        );

        set.remove(0).unwrap();
        assert!(set.slot(0).unwrap().diagnostic().is_none());
    }

    #[test]
    fn remove_out_of_bounds_fails() {
        let mut set = IntervalSet::new();
        assert_eq!(set.remove(0).unwrap_err(), SchedulingError::out_of_bounds(0, 0));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Commit gate
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn empty_set_passes_commit_gate() {
        assert!(IntervalSet::new().all_sessions_saved());
    }

    #[test]
    fn back_to_back_saved_sessions_pass_commit_gate() {
        let mut set = IntervalSet::new();
        saved_slot(&mut set, "Keynote", "09:00", "10:00");
        saved_slot(&mut set, "Panel", "10:00", "11:00");

        assert!(set.all_sessions_saved());
        assert!(set.commit_issues().is_empty());
    }

    #[test]
    fn draft_slot_blocks_commit_gate() {
        let mut set = IntervalSet::new();
        saved_slot(&mut set, "Keynote", "09:00", "10:00");
        set.edit_endpoint(1, Endpoint::Start, at("10:00")).unwrap();

        let issues = set.commit_issues();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].index, 1);
        assert!(issues[0].blockers.contains(&CommitBlocker::MissingEnd));
        assert!(issues[0].blockers.contains(&CommitBlocker::NotConfirmed));
    }

    #[test]
    fn clearing_capacity_on_saved_slot_blocks_commit_gate() {
        let mut set = IntervalSet::new();
        saved_slot(&mut set, "Keynote", "09:00", "10:00");

        set.set_details(0, "Keynote", "A talk", 0).unwrap();

        assert_eq!(set.slot(0).unwrap().status(), SlotStatus::Draft);
        assert!(!set.all_sessions_saved());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Replay of submitted drafts
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn valid_drafts_replay_into_saved_set() {
        let set = IntervalSet::from_drafts(&[
            draft("Keynote", "09:00", "10:00"),
            draft("Panel", "10:00", "11:00"),
        ])
        .unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.all_sessions_saved());
        assert_eq!(set.slot(1).unwrap().interval().owner_label(), "Panel");
    }

    #[test]
    fn overlapping_drafts_are_rejected_on_later_index() {
        let issues = IntervalSet::from_drafts(&[
            draft("Keynote", "09:00", "10:00"),
            draft("Panel", "09:30", "10:30"),
        ])
        .unwrap_err();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].index, 1);
        let diagnostic = issues[0].diagnostic.as_ref().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::Conflict);
        assert_eq!(diagnostic.conflicting_index, Some(0));
        assert!(diagnostic.message.contains("Keynote"));
    }

    #[test]
    fn inverted_draft_is_a_time_range_issue() {
        let issues = IntervalSet::from_drafts(&[draft("Keynote", "10:00", "09:00")]).unwrap_err();

        let diagnostic = issues[0].diagnostic.as_ref().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::TimeRange);
        assert!(issues[0].blockers.contains(&CommitBlocker::OpenDiagnostic));
    }

    #[test]
    fn draft_missing_fields_lists_them() {
        let mut incomplete = draft("", "09:00", "10:00");
        incomplete.description = String::new();
        incomplete.capacity = 0;
        incomplete.end = None;

        let issues = IntervalSet::from_drafts(&[incomplete]).unwrap_err();

        assert_eq!(
            issues[0].blockers,
            vec![
                CommitBlocker::MissingEnd,
                CommitBlocker::MissingTitle,
                CommitBlocker::MissingDescription,
                CommitBlocker::ZeroCapacity,
                CommitBlocker::NotConfirmed,
            ]
        );
    }
}
