//! HTTP middleware for axum.
//!
//! - `auth` - Cookie session middleware and extractors

pub mod auth;

pub use auth::{
    session_middleware, AuthRejection, OptionalAuth, RequireAuth, SessionState, StaleSession,
};
