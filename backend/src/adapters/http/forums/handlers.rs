//! HTTP handlers for forum chat polling.
//!
//! Clients that cannot hold a WebSocket open poll `messages?since=` with the
//! cursor from their previous response.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::websocket::ChatMessagePayload;
use crate::application::ChatClient;
use crate::domain::forum::{ChatError, MessageCursor};
use crate::domain::foundation::ForumId;

use super::dto::{MessageListResponse, MessagesQuery, PostMessageRequest};

/// GET /api/forums/:id/messages?since= - Messages after a cursor
pub async fn list_messages(
    State(chat): State<ChatClient>,
    RequireAuth(_user): RequireAuth,
    Path(forum_id): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> Response {
    let forum_id = match parse_forum_id(&forum_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let since = match query.since.as_deref().map(str::parse::<MessageCursor>).transpose() {
        Ok(since) => since,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(
                    "since must be a cursor or an RFC 3339 timestamp",
                )),
            )
                .into_response()
        }
    };

    match chat.history_since(forum_id, since).await {
        Ok(messages) => {
            let cursor = messages
                .last()
                .map(MessageCursor::of)
                .or(since)
                .map(|cursor| cursor.to_string());
            let response = MessageListResponse {
                messages: messages.into_iter().map(ChatMessagePayload::from).collect(),
                cursor,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_chat_error(e),
    }
}

/// POST /api/forums/:id/messages - Post without a live connection
pub async fn post_message(
    State(chat): State<ChatClient>,
    RequireAuth(user): RequireAuth,
    Path(forum_id): Path<String>,
    Json(req): Json<PostMessageRequest>,
) -> Response {
    let forum_id = match parse_forum_id(&forum_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match chat.post(forum_id, &user, &req.body).await {
        Ok(message) => {
            (StatusCode::CREATED, Json(ChatMessagePayload::from(message))).into_response()
        }
        Err(e) => handle_chat_error(e),
    }
}

fn parse_forum_id(raw: &str) -> Result<ForumId, Response> {
    raw.parse::<ForumId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid forum ID")),
        )
            .into_response()
    })
}

fn handle_chat_error(error: ChatError) -> Response {
    match error {
        ChatError::EmptyMessage | ChatError::MessageTooLong { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(error.to_string())),
        )
            .into_response(),
        ChatError::Store(msg) => {
            tracing::error!(error = %msg, "Forum history request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("An internal error occurred")),
            )
                .into_response()
        }
        ChatError::Disconnected | ChatError::ReconnectExhausted { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::service_unavailable(error.to_string())),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_maps_to_400() {
        assert_eq!(
            handle_chat_error(ChatError::EmptyMessage).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn store_error_maps_to_500() {
        assert_eq!(
            handle_chat_error(ChatError::Store("timeout".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
