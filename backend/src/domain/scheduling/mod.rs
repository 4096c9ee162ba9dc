//! Scheduling module - event session intervals and their validation.
//!
//! An event's sessions are authored as an [`IntervalSet`]: an ordered list
//! of slots, each holding a [`TimeInterval`] plus title, description and
//! capacity. Every endpoint change passes through
//! [`validate_interval_edit`], which rejects inverted ranges and overlaps
//! with a single [`Diagnostic`]. A set may only be persisted once
//! [`IntervalSet::all_sessions_saved`] holds.

mod diagnostic;
mod errors;
mod interval;
mod interval_set;
mod slot;
mod slot_status;
mod validator;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use errors::{CommitBlocker, IncompleteInterval, SchedulingError};
pub use interval::{Endpoint, TimeInterval};
pub use interval_set::IntervalSet;
pub use slot::{SessionDraft, SessionSlot};
pub use slot_status::SlotStatus;
pub use validator::{validate_interval_edit, ValidationResult};
