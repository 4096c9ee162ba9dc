//! In-memory forum message history.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::forum::{ForumMessage, MessageCursor};
use crate::domain::foundation::{DomainError, ErrorCode, ForumId};
use crate::ports::ForumMessageStore;

/// Keeps every forum's messages in send order.
#[derive(Debug, Default)]
pub struct InMemoryForumMessageStore {
    forums: RwLock<HashMap<ForumId, Vec<ForumMessage>>>,
}

impl InMemoryForumMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_count(&self, forum_id: &ForumId) -> usize {
        self.forums
            .read()
            .map(|forums| forums.get(forum_id).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

fn poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "forum store lock poisoned")
}

#[async_trait]
impl ForumMessageStore for InMemoryForumMessageStore {
    async fn append(&self, message: &ForumMessage) -> Result<(), DomainError> {
        let mut forums = self.forums.write().map_err(|_| poisoned())?;
        let messages = forums.entry(message.forum_id).or_default();
        // Keep (sent_at, id) order even if clocks hand out equal stamps.
        let position = messages
            .partition_point(|m| (m.sent_at, m.id) <= (message.sent_at, message.id));
        messages.insert(position, message.clone());
        Ok(())
    }

    async fn list_since(
        &self,
        forum_id: &ForumId,
        after: Option<MessageCursor>,
        limit: usize,
    ) -> Result<Vec<ForumMessage>, DomainError> {
        let forums = self.forums.read().map_err(|_| poisoned())?;
        let Some(messages) = forums.get(forum_id) else {
            return Ok(Vec::new());
        };

        Ok(messages
            .iter()
            .filter(|m| after.map_or(true, |after| after.precedes(m)))
            .take(limit)
            .cloned()
            .collect())
    }
}
