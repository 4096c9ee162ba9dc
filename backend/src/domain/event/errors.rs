//! Event-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, EventId, EventSessionId};
use crate::domain::scheduling::{IncompleteInterval, SchedulingError};

/// Event-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(EventId),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// One or more sessions failed the commit gate.
    #[error("{} session(s) cannot be saved", .0.len())]
    SessionsRejected(Vec<IncompleteInterval>),

    #[error("Session {0} does not belong to this event")]
    UnknownSession(EventSessionId),

    /// Two submitted sessions claim the same stored session.
    #[error("Session {0} is submitted more than once")]
    DuplicateSession(EventSessionId),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl EventError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        EventError::Forbidden(reason.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EventError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EventError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            EventError::NotFound(_) => ErrorCode::EventNotFound,
            EventError::Forbidden(_) => ErrorCode::Forbidden,
            EventError::ValidationFailed { .. }
            | EventError::SessionsRejected(_)
            | EventError::UnknownSession(_)
            | EventError::DuplicateSession(_) => ErrorCode::ValidationFailed,
            EventError::Scheduling(SchedulingError::InvalidTransition(_)) => {
                ErrorCode::InvalidStateTransition
            }
            EventError::Scheduling(_) => ErrorCode::ValidationFailed,
            EventError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for EventError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => EventError::Forbidden(err.message),
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                EventError::ValidationFailed {
                    field: err
                        .details
                        .get("field")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: err.message,
                }
            }
            _ => EventError::Infrastructure(err.to_string()),
        }
    }
}
