//! Forum message history port.
//!
//! Backs both the REST polling endpoint and the refetch a chat connection
//! performs after it lost messages.

use async_trait::async_trait;

use crate::domain::forum::{ForumMessage, MessageCursor};
use crate::domain::foundation::{DomainError, ForumId};

#[async_trait]
pub trait ForumMessageStore: Send + Sync {
    /// Persist a message.
    async fn append(&self, message: &ForumMessage) -> Result<(), DomainError>;

    /// Messages of a forum positioned strictly after `after` (all if
    /// `None`), in `(sent_at, id)` order, at most `limit`.
    async fn list_since(
        &self,
        forum_id: &ForumId,
        after: Option<MessageCursor>,
        limit: usize,
    ) -> Result<Vec<ForumMessage>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forum_message_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ForumMessageStore) {}
    }
}
