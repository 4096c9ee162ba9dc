//! Forum chat client.
//!
//! A [`ChatClient`] is built once with its transport and history store and
//! handed to whoever needs live chat. Each [`ChatClient::connect`] returns
//! an owned [`ChatConnection`] with an explicit `disconnect`.

mod connection;

pub use connection::{ChatClient, ChatConnection};
