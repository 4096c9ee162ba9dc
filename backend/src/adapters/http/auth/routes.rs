//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{current_user, login, logout};
use crate::adapters::http::middleware::SessionState;

/// Creates the auth router, to be nested under `/api/auth`.
pub fn auth_routes(state: SessionState) -> Router {
    Router::new()
        .route("/me", get(current_user))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .with_state(state)
}
