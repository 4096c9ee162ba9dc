//! Symposium - research events platform backend
//!
//! Two pieces carry the weight of this crate:
//!
//! - The session authority, which turns the `user-token` cookie into a
//!   [`Principal`](domain::foundation::Principal) and clears cookies that
//!   name users who no longer exist
//! - The session-overlap validator, which checks each edit of an event's
//!   session list and gates the final commit
//!
//! Around them sit event storage, forum chat, and the axum HTTP surface.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
