//! Diagnostics produced by rejected interval edits.

use serde::{Deserialize, Serialize};

use super::Endpoint;

/// Why an edit was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// The edited endpoint is on the wrong side of the other endpoint.
    TimeRange,
    /// The edited interval overlaps another interval in the set.
    Conflict,
}

/// A single, specific message attached to one slot of an interval set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// The edited endpoint.
    pub field: Endpoint,
    /// Zero-based index of the conflicting slot, for `Conflict` only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_index: Option<usize>,
}

impl Diagnostic {
    /// The edited endpoint does not keep `start < end`.
    pub fn time_range(field: Endpoint) -> Self {
        let message = match field {
            Endpoint::Start => "Start time must be before end time",
            Endpoint::End => "End time must be after start time",
        };
        Self {
            kind: DiagnosticKind::TimeRange,
            message: message.to_string(),
            field,
            conflicting_index: None,
        }
    }

    /// The edited slot overlaps the slot at `conflicting_index`.
    ///
    /// Sessions are named by their 1-based position in the message.
    pub fn conflict(
        field: Endpoint,
        edited_index: usize,
        conflicting_index: usize,
        conflicting_label: &str,
    ) -> Self {
        let message = if conflicting_label.trim().is_empty() {
            format!(
                "Session {} overlaps with session {}",
                edited_index + 1,
                conflicting_index + 1
            )
        } else {
            format!(
                "Session {} overlaps with session {} ({})",
                edited_index + 1,
                conflicting_index + 1,
                conflicting_label
            )
        };
        Self {
            kind: DiagnosticKind::Conflict,
            message,
            field,
            conflicting_index: Some(conflicting_index),
        }
    }
}
