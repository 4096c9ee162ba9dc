//! HTTP adapter for event endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreateEventRequest, EventResponse, EventSessionResponse, SlotResponse, SlotState,
    UpdateSessionsRequest, UpdateSessionsResponse, ValidateEditRequest, ValidateEditResponse,
};
pub use handlers::EventHandlers;
pub use routes::event_routes;
