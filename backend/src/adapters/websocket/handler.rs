//! WebSocket upgrade handler for live forum chat.
//!
//! Connection lifecycle:
//! 1. The session middleware has already resolved the cookie; `RequireAuth`
//!    rejects anonymous upgrades with 401
//! 2. Upgrade and open a [`ChatConnection`](crate::application::ChatConnection)
//! 3. Forward backlog and live messages to the socket
//! 4. Post `send` frames through the [`ChatClient`]
//! 5. Disconnect when either side goes away

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::ChatClient;
use crate::domain::forum::ChatError;
use crate::domain::foundation::{ForumId, Principal, Timestamp};

use super::messages::{ClientMessage, ConnectedMessage, ErrorMessage, PongMessage, ServerMessage};

/// Outgoing frames queued for the socket writer.
const OUTBOX_CAPACITY: usize = 64;

/// Handle WebSocket upgrade requests for a forum.
///
/// Route: `GET /api/forums/:forum_id/live`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(forum_id): Path<String>,
    State(chat): State<ChatClient>,
    RequireAuth(principal): RequireAuth,
) -> Response {
    let forum_id: ForumId = match forum_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid forum ID")),
            )
                .into_response()
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, forum_id, principal, chat))
}

/// Runs for the lifetime of one socket.
///
/// Three tasks cooperate: a writer that owns the sink, a forwarder that owns
/// the chat connection, and a reader that handles client frames. The first
/// to finish ends the others.
async fn handle_socket(socket: WebSocket, forum_id: ForumId, principal: Principal, chat: ChatClient) {
    let (sink, mut stream) = socket.split();
    let (outbox, outbox_rx) = mpsc::channel::<ServerMessage>(OUTBOX_CAPACITY);

    let mut connection = match chat.connect(forum_id).await {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!(forum_id = %forum_id, error = %e, "Failed to open chat connection");
            let mut sink = sink;
            let _ = send_message(&mut sink, &ServerMessage::Error(ErrorMessage::from_chat_error(&e))).await;
            return;
        }
    };

    let connected = ServerMessage::Connected(ConnectedMessage {
        forum_id: forum_id.to_string(),
        user_id: principal.id.to_string(),
        timestamp: Timestamp::now().as_datetime().to_rfc3339(),
    });
    if outbox.send(connected).await.is_err() {
        return;
    }

    let mut writer = tokio::spawn(write_loop(sink, outbox_rx));

    let mut forwarder = {
        let outbox = outbox.clone();
        tokio::spawn(async move {
            loop {
                match connection.recv().await {
                    Ok(message) => {
                        if outbox.send(ServerMessage::Message(message.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(ChatError::Disconnected) => break,
                    Err(e) => {
                        tracing::warn!(forum_id = %forum_id, error = %e, "Chat connection failed");
                        let _ = outbox
                            .send(ServerMessage::Error(ErrorMessage::from_chat_error(&e)))
                            .await;
                        break;
                    }
                }
            }
            connection.disconnect();
        })
    };

    let mut reader = tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            match result {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Send { body }) => {
                        if let Err(e) = chat.post(forum_id, &principal, &body).await {
                            tracing::debug!(forum_id = %forum_id, error = %e, "Rejected chat post");
                            let reply = ServerMessage::Error(ErrorMessage::from_chat_error(&e));
                            if outbox.send(reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Ok(ClientMessage::Ping) => {
                        if outbox.send(ServerMessage::Pong(PongMessage::now())).await.is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        let reply = ServerMessage::Error(ErrorMessage::new(
                            "INVALID_MESSAGE",
                            "Unrecognised message",
                        ));
                        if outbox.send(reply).await.is_err() {
                            break;
                        }
                    }
                },
                Ok(Message::Binary(_)) => {
                    tracing::warn!(forum_id = %forum_id, "Received unsupported binary message");
                }
                // Protocol pings and pongs are answered by axum.
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::debug!(forum_id = %forum_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(forum_id = %forum_id, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut writer => {
            forwarder.abort();
            reader.abort();
        }
        _ = &mut forwarder => {
            reader.abort();
            // Let the writer flush the final error frame, if any.
            let _ = writer.await;
        }
        _ = &mut reader => {
            forwarder.abort();
            writer.abort();
        }
    }

    tracing::debug!(forum_id = %forum_id, "Chat socket closed");
}

async fn write_loop(mut sink: SplitSink<WebSocket, Message>, mut outbox: mpsc::Receiver<ServerMessage>) {
    while let Some(message) = outbox.recv().await {
        if let Err(e) = send_message(&mut sink, &message).await {
            tracing::debug!("Send error, closing connection: {}", e);
            break;
        }
    }
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sink: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    sink.send(Message::Text(json)).await
}

/// Router for the live chat endpoint, to be nested under `/api/forums`.
pub fn websocket_router(chat: ChatClient) -> Router {
    Router::new()
        .route("/:forum_id/live", get(ws_handler))
        .with_state(chat)
}
