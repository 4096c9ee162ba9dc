//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - In-memory user directory
//! - `http` - axum REST API and cookie session middleware
//! - `postgres` - PostgreSQL repositories
//! - `storage` - In-memory event and forum stores
//! - `websocket` - Forum chat rooms and the live socket

pub mod auth;
pub mod http;
pub mod postgres;
pub mod storage;
pub mod websocket;
