//! Forum chat errors.

use thiserror::Error;

use super::MAX_MESSAGE_LENGTH;
use crate::domain::foundation::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message is {length} characters, the limit is {}", MAX_MESSAGE_LENGTH)]
    MessageTooLong { length: usize },

    /// The connection handle was used after `disconnect`.
    #[error("Chat connection is closed")]
    Disconnected,

    #[error("Gave up reconnecting after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },

    #[error("Message store error: {0}")]
    Store(String),
}

impl From<DomainError> for ChatError {
    fn from(err: DomainError) -> Self {
        ChatError::Store(err.to_string())
    }
}
