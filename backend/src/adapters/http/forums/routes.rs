//! HTTP routes for forum endpoints.

use axum::{routing::get, Router};

use super::handlers::{list_messages, post_message};
use crate::adapters::websocket::websocket_router;
use crate::application::ChatClient;

/// Creates the forum router, to be nested under `/api/forums`.
///
/// Includes the live WebSocket endpoint.
pub fn forum_routes(chat: ChatClient) -> Router {
    Router::new()
        .route("/:forum_id/messages", get(list_messages).post(post_message))
        .with_state(chat.clone())
        .merge(websocket_router(chat))
}
