//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports:
//! session resolution, event commands, and the forum chat client.

pub mod chat;
pub mod handlers;
mod session_authority;

pub use chat::{ChatClient, ChatConnection};
pub use handlers::{
    CreateEventCommand, CreateEventHandler, GetEventHandler, GetEventQuery,
    UpdateEventSessionsCommand, UpdateEventSessionsHandler, UpdateEventSessionsResult,
};
pub use session_authority::{SessionAuthority, SessionLookup, SESSION_COOKIE};
