//! Per-endpoint validation of interval edits.
//!
//! [`validate_interval_edit`] is the only way an endpoint value enters an
//! [`IntervalSet`]. It runs two checks, in order:
//!
//! 1. **Range**: against the other endpoint of the same slot, if set.
//!    A start must be strictly before the end, an end strictly after the
//!    start.
//! 2. **Overlap**: against every other slot whose interval is fully
//!    bounded, scanning in ascending index order. The first conflict wins,
//!    so the diagnostic always names the lowest conflicting index.
//!
//! The input set is never mutated; an accepted edit returns a new set.

use super::{Diagnostic, Endpoint, IntervalSet, SchedulingError, TimeInterval};
use crate::domain::foundation::Timestamp;

/// Outcome of [`validate_interval_edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The edit was merged; the slot's diagnostic is cleared.
    Accepted { updated_set: IntervalSet },
    /// The edit was refused; the set is unchanged.
    Rejected { diagnostic: Diagnostic },
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted { .. })
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            ValidationResult::Accepted { .. } => None,
            ValidationResult::Rejected { diagnostic } => Some(diagnostic),
        }
    }
}

/// Validates setting `field` of the slot at `index` to `value`.
///
/// `index == set.len()` targets a new row that is appended on acceptance.
///
/// # Errors
///
/// - `IndexOutOfBounds` if `index > set.len()`
pub fn validate_interval_edit(
    set: &IntervalSet,
    index: usize,
    field: Endpoint,
    value: Timestamp,
) -> Result<ValidationResult, SchedulingError> {
    if index > set.len() {
        return Err(SchedulingError::out_of_bounds(index, set.len()));
    }

    let mut candidate = set
        .slot(index)
        .map(|slot| slot.interval().clone())
        .unwrap_or_else(|| TimeInterval::unset(""));

    if let Some(other) = candidate.endpoint(field.other()) {
        let ordered = match field {
            Endpoint::Start => value < other,
            Endpoint::End => value > other,
        };
        if !ordered {
            return Ok(ValidationResult::Rejected {
                diagnostic: Diagnostic::time_range(field),
            });
        }
    }

    candidate.set_endpoint(field, value);

    if let Some(conflicting) = first_conflict(set, index, &candidate) {
        let label = set
            .slot(conflicting)
            .map(|slot| slot.interval().owner_label())
            .unwrap_or_default();
        return Ok(ValidationResult::Rejected {
            diagnostic: Diagnostic::conflict(field, index, conflicting, label),
        });
    }

    let mut updated_set = set.clone();
    updated_set.apply_accepted(index, field, value)?;
    Ok(ValidationResult::Accepted { updated_set })
}

/// Lowest index `i != index` whose bounded interval conflicts with `candidate`.
fn first_conflict(set: &IntervalSet, index: usize, candidate: &TimeInterval) -> Option<usize> {
    set.slots()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .find_map(|(i, slot)| {
            let (start, end) = slot.interval().bounds()?;
            candidate.conflicts_with(start, end).then_some(i)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduling::{DiagnosticKind, SlotStatus};

    fn at(hhmm: &str) -> Timestamp {
        Timestamp::parse_rfc3339(&format!("2024-11-15T{}:00Z", hhmm)).unwrap()
    }

    fn accept(set: &IntervalSet, index: usize, field: Endpoint, hhmm: &str) -> IntervalSet {
        match validate_interval_edit(set, index, field, at(hhmm)).unwrap() {
            ValidationResult::Accepted { updated_set } => updated_set,
            ValidationResult::Rejected { diagnostic } => {
                panic!("expected accepted edit, got {:?}", diagnostic)
            }
        }
    }

    fn reject(set: &IntervalSet, index: usize, field: Endpoint, hhmm: &str) -> Diagnostic {
        match validate_interval_edit(set, index, field, at(hhmm)).unwrap() {
            ValidationResult::Rejected { diagnostic } => diagnostic,
            ValidationResult::Accepted { .. } => panic!("expected rejected edit"),
        }
    }

    fn with_intervals(bounds: &[(&str, &str)]) -> IntervalSet {
        let mut set = IntervalSet::new();
        for (i, (start, end)) in bounds.iter().enumerate() {
            set = accept(&set, i, Endpoint::Start, start);
            set = accept(&set, i, Endpoint::End, end);
        }
        set
    }

    // ════════════════════════════════════════════════════════════════════════
    // Range check
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn start_on_empty_set_is_accepted_as_draft() {
        let set = accept(&IntervalSet::new(), 0, Endpoint::Start, "09:00");

        assert_eq!(set.len(), 1);
        let slot = set.slot(0).unwrap();
        assert_eq!(slot.status(), SlotStatus::Draft);
        assert_eq!(slot.interval().start(), Some(at("09:00")));
        assert!(slot.interval().end().is_none());
        assert!(slot.diagnostic().is_none());
    }

    #[test]
    fn end_before_start_is_a_time_range_error() {
        let set = accept(&IntervalSet::new(), 0, Endpoint::Start, "10:00");

        let diagnostic = reject(&set, 0, Endpoint::End, "09:00");

        assert_eq!(diagnostic.kind, DiagnosticKind::TimeRange);
        assert_eq!(diagnostic.field, Endpoint::End);
        assert!(diagnostic.conflicting_index.is_none());
    }

    #[test]
    fn zero_length_interval_is_rejected_from_either_side() {
        let set = with_intervals(&[("10:00", "11:00")]);

        assert_eq!(reject(&set, 0, Endpoint::End, "10:00").kind, DiagnosticKind::TimeRange);
        assert_eq!(reject(&set, 0, Endpoint::Start, "11:00").kind, DiagnosticKind::TimeRange);
    }

    #[test]
    fn range_check_runs_before_overlap_check() {
        let set = with_intervals(&[("09:00", "10:00"), ("11:00", "12:00")]);

        // 09:30 would also fall inside slot 0.
        let diagnostic = reject(&set, 1, Endpoint::End, "09:30");
        assert_eq!(diagnostic.kind, DiagnosticKind::TimeRange);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Overlap check
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn overlapping_start_names_conflicting_index() {
        let set = with_intervals(&[("09:00", "10:00")]);
        let set = accept(&set, 1, Endpoint::End, "10:30");

        let diagnostic = reject(&set, 1, Endpoint::Start, "09:30");

        assert_eq!(diagnostic.kind, DiagnosticKind::Conflict);
        assert_eq!(diagnostic.conflicting_index, Some(0));
    }

    #[test]
    fn back_to_back_sessions_are_legal() {
        let set = with_intervals(&[("09:00", "10:00"), ("10:00", "11:00")]);

        assert_eq!(set.len(), 2);
        assert!(set.slots().iter().all(|slot| slot.diagnostic().is_none()));
    }

    #[test]
    fn lowest_conflicting_index_is_reported() {
        let set = with_intervals(&[("09:00", "10:00"), ("13:00", "14:00"), ("10:30", "11:30")]);

        // 09:30 to 14:00 covers slots 0 and 2.
        let diagnostic = reject(&set, 1, Endpoint::Start, "09:30");

        assert_eq!(diagnostic.conflicting_index, Some(0));
        assert_eq!(diagnostic.message, "Session 2 overlaps with session 1");
    }

    #[test]
    fn new_row_conflicts_report_lowest_of_several() {
        let set = with_intervals(&[("08:00", "09:00"), ("10:00", "11:00"), ("11:00", "12:00")]);
        let set = accept(&set, 3, Endpoint::End, "12:30");

        let diagnostic = reject(&set, 3, Endpoint::Start, "10:30");

        assert_eq!(diagnostic.conflicting_index, Some(1));
    }

    #[test]
    fn slots_without_both_endpoints_are_ignored() {
        let set = accept(&IntervalSet::new(), 0, Endpoint::Start, "09:00");

        let set = accept(&set, 1, Endpoint::Start, "09:00");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn editing_a_slot_ignores_its_own_interval() {
        let set = with_intervals(&[("09:00", "10:00")]);

        let set = accept(&set, 0, Endpoint::End, "09:30");
        assert_eq!(set.slot(0).unwrap().interval().end(), Some(at("09:30")));
    }

    #[test]
    fn rejected_edit_leaves_set_unchanged() {
        let set = with_intervals(&[("09:00", "10:00"), ("10:00", "11:00")]);
        let before = set.clone();

        let result = validate_interval_edit(&set, 1, Endpoint::Start, at("09:45")).unwrap();

        assert!(!result.is_accepted());
        assert_eq!(set, before);
    }

    #[test]
    fn accepted_edit_never_touches_other_indices() {
        let set = with_intervals(&[("09:00", "10:00"), ("11:00", "12:00")]);

        let updated = accept(&set, 1, Endpoint::End, "12:30");

        assert_eq!(updated.slot(0), set.slot(0));
    }

    #[test]
    fn index_past_the_end_is_a_structural_error() {
        let err = validate_interval_edit(&IntervalSet::new(), 1, Endpoint::Start, at("09:00"))
            .unwrap_err();

        assert_eq!(err, SchedulingError::out_of_bounds(1, 0));
    }
}
