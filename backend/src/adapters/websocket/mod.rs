//! WebSocket adapters for live forum chat.
//!
//! ```text
//! ChatClient ──publish──▶ RoomManager ──broadcast──▶ RoomSubscription ──▶ ChatConnection
//!                         Room: forum-123                                       │
//!                         Room: forum-456                          ws handler ◀─┘
//! ```
//!
//! - [`rooms`] - Broadcast rooms; the `ChatTransport` implementation
//! - [`messages`] - WebSocket message protocol types
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod handler;
pub mod messages;
pub mod rooms;

pub use handler::{websocket_router, ws_handler};
pub use messages::{ChatMessagePayload, ClientMessage, ServerMessage};
pub use rooms::{RoomManager, RoomSubscription, DEFAULT_CHANNEL_CAPACITY};
