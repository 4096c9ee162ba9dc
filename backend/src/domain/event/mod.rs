//! Event module - events organized by users with the organizer role.

mod aggregate;
mod errors;
mod session;

pub use aggregate::{Event, MAX_TITLE_LENGTH};
pub use errors::EventError;
pub use session::{EventSession, SessionDiff};
