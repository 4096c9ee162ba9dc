//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod event;

pub use event::{
    CreateEventCommand, CreateEventHandler, GetEventHandler, GetEventQuery,
    UpdateEventSessionsCommand, UpdateEventSessionsHandler, UpdateEventSessionsResult,
};

use crate::domain::foundation::AuthorizationResult;

/// Logs an authorization decision at a level matching its outcome.
pub(crate) fn log_authorization(result: &AuthorizationResult) {
    if result.is_granted() {
        tracing::debug!(subject = %result.subject, user_id = %result.user_id, "Access granted");
    } else {
        tracing::warn!(
            subject = %result.subject,
            user_id = %result.user_id,
            reason = result.denial_reason.as_deref().unwrap_or_default(),
            "Access denied"
        );
    }
}
