//! In-memory storage adapters.
//!
//! Back the event and forum ports when no database is configured, and in
//! tests.

mod event_repository;
mod forum_message_store;

pub use event_repository::InMemoryEventRepository;
pub use forum_message_store::InMemoryForumMessageStore;
