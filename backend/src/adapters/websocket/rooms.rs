//! Forum rooms for live chat fan-out.
//!
//! Each forum with at least one listener has a broadcast channel. Posting
//! sends the message to every open subscription of that forum only.
//!
//! ```text
//! Room: forum-123      Room: forum-456
//! ├── subscription-a   ├── subscription-d
//! ├── subscription-b   └── subscription-e
//! └── subscription-c
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use crate::domain::forum::ForumMessage;
use crate::domain::foundation::ForumId;
use crate::ports::{ChatEvent, ChatSubscription, ChatTransport};

/// Default buffer size for each room's broadcast channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 128;

/// Manages broadcast rooms keyed by forum.
///
/// A subscriber that falls more than `channel_capacity` messages behind
/// sees [`ChatEvent::Lagged`] and is expected to refetch from history.
pub struct RoomManager {
    rooms: RwLock<HashMap<ForumId, broadcast::Sender<ForumMessage>>>,
    channel_capacity: usize,
}

impl RoomManager {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            channel_capacity: channel_capacity.max(1),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Joins a forum room, creating it if needed.
    pub async fn join(&self, forum_id: &ForumId) -> broadcast::Receiver<ForumMessage> {
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(*forum_id)
            .or_insert_with(|| broadcast::channel(self.channel_capacity).0)
            .subscribe()
    }

    /// Sends to every subscriber of the message's forum.
    ///
    /// Returns the number of subscribers reached. A room nobody listens to
    /// any more is removed.
    pub async fn broadcast(&self, message: &ForumMessage) -> usize {
        let forum_id = message.forum_id;
        let delivered = {
            let rooms = self.rooms.read().await;
            match rooms.get(&forum_id) {
                Some(sender) => sender.send(message.clone()).ok(),
                None => return 0,
            }
        };

        match delivered {
            Some(count) => count,
            None => {
                let mut rooms = self.rooms.write().await;
                if rooms.get(&forum_id).is_some_and(|s| s.receiver_count() == 0) {
                    rooms.remove(&forum_id);
                    tracing::debug!(forum_id = %forum_id, "Removed empty forum room");
                }
                0
            }
        }
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// A subscription to one forum room.
pub struct RoomSubscription {
    receiver: broadcast::Receiver<ForumMessage>,
}

#[async_trait]
impl ChatSubscription for RoomSubscription {
    async fn next(&mut self) -> ChatEvent {
        match self.receiver.recv().await {
            Ok(message) => ChatEvent::Message(message),
            Err(broadcast::error::RecvError::Lagged(missed)) => ChatEvent::Lagged(missed),
            Err(broadcast::error::RecvError::Closed) => ChatEvent::Closed,
        }
    }
}

#[async_trait]
impl ChatTransport for RoomManager {
    async fn subscribe(&self, forum_id: &ForumId) -> Box<dyn ChatSubscription> {
        Box::new(RoomSubscription {
            receiver: self.join(forum_id).await,
        })
    }

    async fn publish(&self, message: &ForumMessage) -> usize {
        self.broadcast(message).await
    }
}
