//! HTTP adapters - REST API implementations.
//!
//! Each area has its own adapter module; [`router`] assembles them behind
//! the cookie session middleware.

pub mod auth;
pub mod cookies;
pub mod error;
pub mod events;
pub mod forums;
pub mod middleware;
pub mod router;

pub use cookies::{CookiePolicy, HeaderCookieJar};
pub use error::ErrorResponse;
pub use router::{api_router, with_http_layers, AppState};
