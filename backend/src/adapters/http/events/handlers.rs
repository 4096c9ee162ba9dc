//! HTTP handlers for event endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use tower_http::request_id::RequestId;

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::event::{
    CreateEventCommand, CreateEventHandler, GetEventHandler, GetEventQuery,
    UpdateEventSessionsCommand, UpdateEventSessionsHandler,
};
use crate::domain::event::EventError;
use crate::domain::foundation::{CommandMetadata, EventId, Principal};
use crate::domain::scheduling::{validate_interval_edit, SchedulingError, ValidationResult};

use super::dto::{
    CreateEventRequest, EventResponse, UpdateSessionsRequest, UpdateSessionsResponse,
    ValidateEditRequest, ValidateEditResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct EventHandlers {
    create_handler: Arc<CreateEventHandler>,
    update_sessions_handler: Arc<UpdateEventSessionsHandler>,
    get_handler: Arc<GetEventHandler>,
}

impl EventHandlers {
    pub fn new(
        create_handler: Arc<CreateEventHandler>,
        update_sessions_handler: Arc<UpdateEventSessionsHandler>,
        get_handler: Arc<GetEventHandler>,
    ) -> Self {
        Self {
            create_handler,
            update_sessions_handler,
            get_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/events - Create an event (organizers only)
pub async fn create_event(
    State(handlers): State<EventHandlers>,
    RequireAuth(user): RequireAuth,
    request_id: Option<Extension<RequestId>>,
    Json(req): Json<CreateEventRequest>,
) -> Response {
    let cmd = CreateEventCommand {
        title: req.title,
        description: req.description,
        location: req.location,
        sessions: req.sessions,
    };
    let metadata = command_metadata(user, request_id);

    match handlers.create_handler.handle(cmd, metadata).await {
        Ok(event) => (StatusCode::CREATED, Json(EventResponse::from(&event))).into_response(),
        Err(e) => handle_event_error(e),
    }
}

/// GET /api/events/:id - Event with its sessions
pub async fn get_event(
    State(handlers): State<EventHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(event_id): Path<String>,
) -> Response {
    let event_id = match parse_event_id(&event_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(GetEventQuery { event_id }).await {
        Ok(event) => (StatusCode::OK, Json(EventResponse::from(&event))).into_response(),
        Err(e) => handle_event_error(e),
    }
}

/// PUT /api/events/:id/sessions - Replace an event's sessions (owner only)
pub async fn update_event_sessions(
    State(handlers): State<EventHandlers>,
    RequireAuth(user): RequireAuth,
    request_id: Option<Extension<RequestId>>,
    Path(event_id): Path<String>,
    Json(req): Json<UpdateSessionsRequest>,
) -> Response {
    let event_id = match parse_event_id(&event_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = UpdateEventSessionsCommand {
        event_id,
        sessions: req.sessions,
    };
    let metadata = command_metadata(user, request_id);

    match handlers.update_sessions_handler.handle(cmd, metadata).await {
        Ok(result) => {
            let response = UpdateSessionsResponse {
                event: EventResponse::from(&result.event),
                changes: result.diffs,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_event_error(e),
    }
}

/// Commands issued over HTTP log under the request's `x-request-id`.
fn command_metadata(user: Principal, request_id: Option<Extension<RequestId>>) -> CommandMetadata {
    let metadata = CommandMetadata::new(user).with_source("http");
    match request_id
        .as_ref()
        .and_then(|Extension(id)| id.header_value().to_str().ok())
    {
        Some(id) => metadata.with_correlation_id(id),
        None => metadata,
    }
}

/// POST /api/events/sessions/validate - Check one edit of the session form
///
/// A rejected edit is a normal outcome and returns 200 with the diagnostic.
pub async fn validate_session_edit(
    RequireAuth(_user): RequireAuth,
    Json(req): Json<ValidateEditRequest>,
) -> Response {
    let set = req.interval_set();

    match validate_interval_edit(&set, req.index, req.field, req.value) {
        Ok(ValidationResult::Accepted { updated_set }) => {
            let response = ValidateEditResponse::Accepted {
                all_sessions_saved: updated_set.all_sessions_saved(),
                sessions: updated_set.slots().iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(ValidationResult::Rejected { diagnostic }) => {
            (StatusCode::OK, Json(ValidateEditResponse::Rejected { diagnostic })).into_response()
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
            .into_response(),
    }
}

fn parse_event_id(raw: &str) -> Result<EventId, Response> {
    raw.parse::<EventId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid event ID")),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_event_error(error: EventError) -> Response {
    match error {
        EventError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Event", &id.to_string())),
        )
            .into_response(),
        EventError::Forbidden(reason) => {
            (StatusCode::FORBIDDEN, Json(ErrorResponse::forbidden(reason))).into_response()
        }
        EventError::ValidationFailed { field, message } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!(
                "Validation failed for {}: {}",
                field, message
            ))),
        )
            .into_response(),
        EventError::SessionsRejected(issues) => {
            let message = format!("{} session(s) cannot be saved", issues.len());
            let details = serde_json::to_value(&issues).unwrap_or_default();
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::unprocessable(message, details)),
            )
                .into_response()
        }
        EventError::UnknownSession(id) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::unprocessable(
                format!("Session {} does not belong to this event", id),
                serde_json::json!({ "sessionId": id.to_string() }),
            )),
        )
            .into_response(),
        EventError::DuplicateSession(id) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::unprocessable(
                format!("Session {} is submitted more than once", id),
                serde_json::json!({ "sessionId": id.to_string() }),
            )),
        )
            .into_response(),
        EventError::Scheduling(SchedulingError::Incomplete(issue)) => {
            let details = serde_json::to_value([&issue]).unwrap_or_default();
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::unprocessable(issue.to_string(), details)),
            )
                .into_response()
        }
        EventError::Scheduling(other) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(other.to_string())),
        )
            .into_response(),
        EventError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "Event request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("An internal error occurred")),
            )
                .into_response()
        }
    }
}
