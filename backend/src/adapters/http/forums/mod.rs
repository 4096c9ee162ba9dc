//! HTTP adapter for forum endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{MessageListResponse, MessagesQuery, PostMessageRequest};
pub use routes::forum_routes;
