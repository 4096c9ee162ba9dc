//! Scheduling errors and commit-gate reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::Diagnostic;
use crate::domain::foundation::ValidationError;

/// Something that keeps a slot from passing the commit gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommitBlocker {
    MissingStart,
    MissingEnd,
    MissingTitle,
    MissingDescription,
    ZeroCapacity,
    /// A rejected edit left a diagnostic on the slot.
    OpenDiagnostic,
    /// Complete, but the user has not confirmed the slot.
    NotConfirmed,
}

impl fmt::Display for CommitBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommitBlocker::MissingStart => "start time is missing",
            CommitBlocker::MissingEnd => "end time is missing",
            CommitBlocker::MissingTitle => "title is missing",
            CommitBlocker::MissingDescription => "description is missing",
            CommitBlocker::ZeroCapacity => "capacity must be greater than zero",
            CommitBlocker::OpenDiagnostic => "time range has an open error",
            CommitBlocker::NotConfirmed => "session is not saved",
        };
        f.write_str(s)
    }
}

/// Per-index commit-gate failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncompleteInterval {
    pub index: usize,
    pub blockers: Vec<CommitBlocker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}

impl fmt::Display for IncompleteInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reasons: Vec<String> = self.blockers.iter().map(ToString::to_string).collect();
        write!(f, "session {}: {}", self.index + 1, reasons.join(", "))
    }
}

/// Structural errors from interval set operations.
///
/// Rejected edits are not errors: they come back as a
/// [`ValidationResult::Rejected`](super::ValidationResult) value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("Session index {index} is out of bounds for {len} sessions")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Cannot save {0}")]
    Incomplete(IncompleteInterval),

    #[error(transparent)]
    InvalidTransition(#[from] ValidationError),
}

impl SchedulingError {
    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        SchedulingError::IndexOutOfBounds { index, len }
    }
}
