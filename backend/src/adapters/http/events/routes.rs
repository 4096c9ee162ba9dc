//! HTTP routes for event endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    create_event, get_event, update_event_sessions, validate_session_edit, EventHandlers,
};

/// Creates the event router, to be nested under `/api/events`.
pub fn event_routes(handlers: EventHandlers) -> Router {
    Router::new()
        .route("/", post(create_event))
        .route("/sessions/validate", post(validate_session_edit))
        .route("/:id", get(get_event))
        .route("/:id/sessions", put(update_event_sessions))
        .with_state(handlers)
}
