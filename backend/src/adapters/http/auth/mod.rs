//! HTTP adapter for session endpoints.

mod handlers;
mod routes;

pub use handlers::{current_user, login, logout, CurrentUserResponse, LoginRequest};
pub use routes::auth_routes;
