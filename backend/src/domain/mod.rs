//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, roles, principals, errors)
//! - `user` - User records as stored by persistence
//! - `scheduling` - Event session intervals, overlap validation, commit gate
//! - `event` - Event aggregate and its stored sessions
//! - `forum` - Forum messages for live chat

pub mod event;
pub mod forum;
pub mod foundation;
pub mod scheduling;
pub mod user;
