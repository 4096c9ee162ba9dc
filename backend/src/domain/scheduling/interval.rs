//! Time intervals as edited in the session form.
//!
//! An interval is authored one endpoint at a time, so either bound may be
//! unset. Once both are set, `start < end` holds for every interval that
//! made it into an [`IntervalSet`](super::IntervalSet).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Timestamp;

/// Which endpoint of an interval an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// The endpoint on the other side of the interval.
    pub fn other(self) -> Endpoint {
        match self {
            Endpoint::Start => Endpoint::End,
            Endpoint::End => Endpoint::Start,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Start => "start",
            Endpoint::End => "end",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A possibly half-specified `[start, end)` interval.
///
/// `owner_label` names the session the interval belongs to and is only used
/// in diagnostic messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
    owner_label: String,
}

impl TimeInterval {
    /// Creates an interval with no endpoints set.
    pub fn unset(owner_label: impl Into<String>) -> Self {
        Self {
            start: None,
            end: None,
            owner_label: owner_label.into(),
        }
    }

    /// Creates an interval with both endpoints set, without validation.
    pub fn bounded(start: Timestamp, end: Timestamp, owner_label: impl Into<String>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            owner_label: owner_label.into(),
        }
    }

    /// Creates an interval from whichever endpoints are known.
    pub fn from_parts(
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        owner_label: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            owner_label: owner_label.into(),
        }
    }

    pub fn start(&self) -> Option<Timestamp> {
        self.start
    }

    pub fn end(&self) -> Option<Timestamp> {
        self.end
    }

    pub fn owner_label(&self) -> &str {
        &self.owner_label
    }

    /// Returns the value of one endpoint.
    pub fn endpoint(&self, which: Endpoint) -> Option<Timestamp> {
        match which {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    /// Both endpoints, if both are set.
    pub fn bounds(&self) -> Option<(Timestamp, Timestamp)> {
        Some((self.start?, self.end?))
    }

    /// Returns true when both endpoints are set.
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub(crate) fn set_endpoint(&mut self, which: Endpoint, value: Timestamp) {
        match which {
            Endpoint::Start => self.start = Some(value),
            Endpoint::End => self.end = Some(value),
        }
    }

    pub(crate) fn set_owner_label(&mut self, label: impl Into<String>) {
        self.owner_label = label.into();
    }

    /// Tests this interval against a fully bounded `[other_start, other_end)`.
    ///
    /// With both endpoints set this is half-open intersection, so intervals
    /// that only touch at a boundary do not conflict. With a single endpoint
    /// set, a start conflicts if it falls inside `[other_start, other_end)`
    /// and an end conflicts if it falls inside `(other_start, other_end]`.
    pub fn conflicts_with(&self, other_start: Timestamp, other_end: Timestamp) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start < other_end && end > other_start,
            (Some(start), None) => other_start <= start && start < other_end,
            (None, Some(end)) => other_start < end && end <= other_end,
            (None, None) => false,
        }
    }
}
