//! HTTP DTOs for forum endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::websocket::ChatMessagePayload;

/// Query parameters for polling forum history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesQuery {
    /// A `cursor` from an earlier response, or an RFC 3339 timestamp.
    /// Only messages after it are returned.
    #[serde(default)]
    pub since: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageRequest {
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<ChatMessagePayload>,
    /// Pass back as `since` to fetch the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}
