//! Chat connection lifecycle.
//!
//! ```text
//! connect ──▶ backlog from history ──▶ live messages ──▶ disconnect
//!                                        │      ▲
//!                           lag / closed ▼      │
//!                          resubscribe + refetch since last seen
//! ```
//!
//! The subscription is opened before the backlog is fetched, so a message
//! posted in between shows up in both; it is delivered once.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::domain::forum::{ChatError, ForumMessage, MessageCursor};
use crate::domain::foundation::{ForumId, ForumMessageId, Principal, Timestamp};
use crate::ports::{ChatEvent, ChatSubscription, ChatTransport, ForumMessageStore};

/// Entry point for forum chat.
#[derive(Clone)]
pub struct ChatClient {
    transport: Arc<dyn ChatTransport>,
    history: Arc<dyn ForumMessageStore>,
    history_page_size: usize,
    max_reconnect_attempts: u32,
}

impl ChatClient {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        history: Arc<dyn ForumMessageStore>,
        history_page_size: usize,
        max_reconnect_attempts: u32,
    ) -> Self {
        Self {
            transport,
            history,
            history_page_size,
            max_reconnect_attempts,
        }
    }

    /// Opens a connection to one forum.
    ///
    /// The first messages returned by [`ChatConnection::recv`] are the
    /// forum's whole history, oldest first.
    pub async fn connect(&self, forum_id: ForumId) -> Result<ChatConnection, ChatError> {
        let subscription = self.transport.subscribe(&forum_id).await;
        let backlog = self.history_after(forum_id, None).await?;

        tracing::debug!(forum_id = %forum_id, backlog = backlog.len(), "Chat connected");

        Ok(ChatConnection {
            client: self.clone(),
            forum_id,
            subscription: Some(subscription),
            pending: backlog.into(),
            cursor: DeliveryCursor::default(),
            failed_attempts: 0,
        })
    }

    /// Persists a message, then fans it out to live subscribers.
    pub async fn post(
        &self,
        forum_id: ForumId,
        author: &Principal,
        body: &str,
    ) -> Result<ForumMessage, ChatError> {
        let message = ForumMessage::compose(forum_id, author, body)?;
        self.history.append(&message).await?;
        let receivers = self.transport.publish(&message).await;
        tracing::debug!(forum_id = %forum_id, receivers, "Forum message posted");
        Ok(message)
    }

    /// One page of messages after `after`, for polling clients.
    pub async fn history_since(
        &self,
        forum_id: ForumId,
        after: Option<MessageCursor>,
    ) -> Result<Vec<ForumMessage>, ChatError> {
        Ok(self
            .history
            .list_since(&forum_id, after, self.history_page_size)
            .await?)
    }

    /// Every message after `after`, fetched page by page until a short
    /// page comes back.
    async fn history_after(
        &self,
        forum_id: ForumId,
        mut after: Option<MessageCursor>,
    ) -> Result<Vec<ForumMessage>, ChatError> {
        let page_size = self.history_page_size.max(1);
        let mut messages = Vec::new();
        loop {
            let page = self.history.list_since(&forum_id, after, page_size).await?;
            let complete = page.len() < page_size;
            if let Some(last) = page.last() {
                after = Some(MessageCursor::of(last));
            }
            messages.extend(page);
            if complete {
                return Ok(messages);
            }
        }
    }
}

/// Tracks the newest delivered message so refetches and live messages
/// don't deliver it twice.
#[derive(Debug, Default)]
struct DeliveryCursor {
    last_seen: Option<Timestamp>,
    ids_at_last_seen: HashSet<ForumMessageId>,
}

impl DeliveryCursor {
    fn is_new(&self, message: &ForumMessage) -> bool {
        match self.last_seen {
            None => true,
            Some(last) if message.sent_at > last => true,
            Some(last) if message.sent_at == last => !self.ids_at_last_seen.contains(&message.id),
            Some(_) => false,
        }
    }

    fn record(&mut self, message: &ForumMessage) {
        if self.last_seen != Some(message.sent_at) {
            self.last_seen = Some(message.sent_at);
            self.ids_at_last_seen.clear();
        }
        self.ids_at_last_seen.insert(message.id);
    }
}

/// An open connection to one forum.
pub struct ChatConnection {
    client: ChatClient,
    forum_id: ForumId,
    subscription: Option<Box<dyn ChatSubscription>>,
    pending: VecDeque<ForumMessage>,
    cursor: DeliveryCursor,
    failed_attempts: u32,
}

impl ChatConnection {
    pub fn forum_id(&self) -> ForumId {
        self.forum_id
    }

    pub fn is_connected(&self) -> bool {
        self.subscription.is_some()
    }

    /// Waits for the next message, in order and without duplicates.
    ///
    /// # Errors
    ///
    /// - `Disconnected` after [`disconnect`](Self::disconnect)
    /// - `ReconnectExhausted` if the transport kept failing
    /// - `Store` if the history refetch failed
    pub async fn recv(&mut self) -> Result<ForumMessage, ChatError> {
        loop {
            if self.subscription.is_none() {
                return Err(ChatError::Disconnected);
            }

            if let Some(message) = self.pending.pop_front() {
                if self.cursor.is_new(&message) {
                    self.cursor.record(&message);
                    return Ok(message);
                }
                continue;
            }

            let event = match self.subscription.as_mut() {
                Some(subscription) => subscription.next().await,
                None => return Err(ChatError::Disconnected),
            };

            match event {
                ChatEvent::Message(message) => {
                    self.failed_attempts = 0;
                    if self.cursor.is_new(&message) {
                        self.cursor.record(&message);
                        return Ok(message);
                    }
                }
                ChatEvent::Lagged(missed) => {
                    tracing::warn!(forum_id = %self.forum_id, missed, "Chat subscriber lagged");
                    self.recover().await?;
                }
                ChatEvent::Closed => {
                    tracing::info!(forum_id = %self.forum_id, "Chat room closed");
                    self.recover().await?;
                }
            }
        }
    }

    /// Posts a message to this connection's forum.
    pub async fn send(&self, author: &Principal, body: &str) -> Result<ForumMessage, ChatError> {
        if !self.is_connected() {
            return Err(ChatError::Disconnected);
        }
        self.client.post(self.forum_id, author, body).await
    }

    /// Closes the connection. Further `recv` and `send` calls fail.
    pub fn disconnect(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!(forum_id = %self.forum_id, "Chat disconnected");
        }
        self.pending.clear();
    }

    /// Resubscribes and queues everything sent since the last delivered
    /// message.
    async fn recover(&mut self) -> Result<(), ChatError> {
        self.failed_attempts += 1;
        if self.failed_attempts > self.client.max_reconnect_attempts {
            let attempts = self.client.max_reconnect_attempts;
            self.disconnect();
            return Err(ChatError::ReconnectExhausted { attempts });
        }

        self.subscription = Some(self.client.transport.subscribe(&self.forum_id).await);
        // Start at the last delivered instant; its other messages may be unseen.
        let from = self.cursor.last_seen.map(MessageCursor::start_of);
        let missed = self.client.history_after(self.forum_id, from).await?;

        tracing::debug!(
            forum_id = %self.forum_id,
            attempt = self.failed_attempts,
            refetched = missed.len(),
            "Chat resubscribed"
        );

        self.pending.extend(missed);
        Ok(())
    }
}
