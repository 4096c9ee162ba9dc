//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Identity
//!
//! - `UserRepository` - User lookup for session resolution
//! - `CookieJar` - Request-scoped cookie store owned by the HTTP layer
//!
//! ## Events
//!
//! - `EventRepository` - Events and their sessions, written as diffs
//!
//! ## Forum chat
//!
//! - `ForumMessageStore` - Message history and polling fallback
//! - `ChatTransport` - Live fan-out per forum

mod chat_transport;
mod cookie_jar;
mod event_repository;
mod forum_message_store;
mod user_repository;

pub use chat_transport::{ChatEvent, ChatSubscription, ChatTransport};
pub use cookie_jar::CookieJar;
pub use event_repository::EventRepository;
pub use forum_message_store::ForumMessageStore;
pub use user_repository::UserRepository;
