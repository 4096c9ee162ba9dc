//! Live chat transport port.
//!
//! A pub/sub fan-out keyed by forum. Delivery is best effort: a slow
//! subscriber may miss messages and is told how many via
//! [`ChatEvent::Lagged`].

use async_trait::async_trait;

use crate::domain::forum::ForumMessage;
use crate::domain::foundation::ForumId;

/// What a subscription yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Message(ForumMessage),
    /// The subscriber fell behind and `n` messages were dropped.
    Lagged(u64),
    /// The room closed; no further messages will arrive.
    Closed,
}

/// A live subscription to one forum.
#[async_trait]
pub trait ChatSubscription: Send {
    /// Waits for the next event.
    async fn next(&mut self) -> ChatEvent;
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Starts receiving messages posted to `forum_id` from now on.
    async fn subscribe(&self, forum_id: &ForumId) -> Box<dyn ChatSubscription>;

    /// Fans a message out to current subscribers of its forum.
    ///
    /// Returns how many subscribers received it.
    async fn publish(&self, message: &ForumMessage) -> usize;
}
