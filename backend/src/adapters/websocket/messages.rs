//! WebSocket message protocol for forum chat.
//!
//! - Server → Client: connection status, chat messages, errors, pongs
//! - Client → Server: chat posts, pings

use serde::{Deserialize, Serialize};

use crate::domain::forum::{ChatError, ForumMessage};
use crate::domain::foundation::Timestamp;

// ============================================
// Server → Client Messages
// ============================================

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established and backlog about to follow.
    Connected(ConnectedMessage),

    /// A forum message, from the backlog or live.
    Message(ChatMessagePayload),

    Error(ErrorMessage),

    Pong(PongMessage),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub forum_id: String,
    pub user_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagePayload {
    pub id: String,
    pub forum_id: String,
    pub author_id: String,
    pub author_name: String,
    pub body: String,
    pub sent_at: String,
}

impl From<ForumMessage> for ChatMessagePayload {
    fn from(message: ForumMessage) -> Self {
        Self {
            id: message.id.to_string(),
            forum_id: message.forum_id.to_string(),
            author_id: message.author_id.to_string(),
            author_name: message.author_name,
            body: message.body,
            sent_at: message.sent_at.as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorMessage {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: now_rfc3339(),
        }
    }

    pub fn from_chat_error(err: &ChatError) -> Self {
        let code = match err {
            ChatError::EmptyMessage => "EMPTY_MESSAGE",
            ChatError::MessageTooLong { .. } => "MESSAGE_TOO_LONG",
            ChatError::Disconnected => "DISCONNECTED",
            ChatError::ReconnectExhausted { .. } => "RECONNECT_EXHAUSTED",
            ChatError::Store(_) => "STORE_ERROR",
        };
        let message = match err {
            ChatError::Store(_) => "Message history is unavailable".to_string(),
            other => other.to_string(),
        };
        Self::new(code, message)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

impl PongMessage {
    pub fn now() -> Self {
        Self {
            timestamp: now_rfc3339(),
        }
    }
}

// ============================================
// Client → Server Messages
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Post a message to the forum.
    Send { body: String },

    Ping,
}

fn now_rfc3339() -> String {
    Timestamp::now().as_datetime().to_rfc3339()
}
