//! Event command and query handlers.

mod create_event;
mod get_event;
mod update_event_sessions;

pub use create_event::{CreateEventCommand, CreateEventHandler};
pub use get_event::{GetEventHandler, GetEventQuery};
pub use update_event_sessions::{
    UpdateEventSessionsCommand, UpdateEventSessionsHandler, UpdateEventSessionsResult,
};
