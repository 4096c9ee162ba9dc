//! Forum module - messages posted to a forum and relayed live.

mod cursor;
mod errors;
mod message;

pub use cursor::MessageCursor;
pub use errors::ChatError;
pub use message::{ForumMessage, MAX_MESSAGE_LENGTH};
