//! Commit status of a single slot in an interval set.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Per-slot commit status.
///
/// ```text
/// Empty ──endpoint accepted──▶ Draft ──confirm──▶ Saved
///                                ▲                  │
///                                └──────edit────────┘
/// ```
///
/// Removing a slot deletes it from the set rather than transitioning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    #[default]
    Empty,
    Draft,
    Saved,
}

impl StateMachine for SlotStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SlotStatus::*;
        matches!((self, target), (Empty, Draft) | (Draft, Saved) | (Saved, Draft))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SlotStatus::*;
        match self {
            Empty => vec![Draft],
            Draft => vec![Saved],
            Saved => vec![Draft],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_authoring_lifecycle() {
        let status = SlotStatus::Empty;
        let status = status.transition_to(SlotStatus::Draft).unwrap();
        let status = status.transition_to(SlotStatus::Saved).unwrap();
        let status = status.transition_to(SlotStatus::Draft).unwrap();
        assert_eq!(status, SlotStatus::Draft);
    }

    #[test]
    fn cannot_save_an_empty_slot() {
        assert!(SlotStatus::Empty.transition_to(SlotStatus::Saved).is_err());
    }

    #[test]
    fn no_status_is_terminal() {
        for status in [SlotStatus::Empty, SlotStatus::Draft, SlotStatus::Saved] {
            assert!(!status.is_terminal());
        }
    }

    #[test]
    fn valid_transitions_agree_with_can_transition_to() {
        for from in [SlotStatus::Empty, SlotStatus::Draft, SlotStatus::Saved] {
            for to in from.valid_transitions() {
                assert!(from.can_transition_to(&to));
            }
        }
    }
}
