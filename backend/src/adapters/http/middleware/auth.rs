//! Cookie session middleware and extractors for axum.
//!
//! This module provides:
//! - `session_middleware` - Layer that resolves the session cookie and injects the principal into extensions
//! - `RequireAuth` - Extractor that requires authentication
//! - `OptionalAuth` - Extractor for optional authentication
//!
//! # Architecture
//!
//! ```text
//! Request → session_middleware → SessionAuthority::lookup(cookie jar)
//!                │                        ↓
//!                │            Principal (or stale marker) → extensions
//!                ↓
//!           Handler → RequireAuth reads extensions
//!                ↓
//! Response ← Set-Cookie for any jar change (stale cookie deletion)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/api/protected", get(protected_handler))
//!     .layer(middleware::from_fn_with_state(session_state, session_middleware));
//!
//! async fn protected_handler(RequireAuth(user): RequireAuth) -> String {
//!     format!("Hello, {}!", user.name)
//! }
//! ```

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::cookies::{CookiePolicy, HeaderCookieJar};
use crate::adapters::http::error::ErrorResponse;
use crate::application::{SessionAuthority, SessionLookup};
use crate::domain::foundation::{AuthError, Principal};

/// State for the session middleware.
#[derive(Clone)]
pub struct SessionState {
    pub authority: SessionAuthority,
    pub cookie_policy: CookiePolicy,
}

impl SessionState {
    pub fn new(authority: SessionAuthority, cookie_policy: CookiePolicy) -> Self {
        Self {
            authority,
            cookie_policy,
        }
    }

    /// A fresh jar over this request's cookies, using the configured policy.
    pub fn jar(&self, headers: &axum::http::HeaderMap) -> HeaderCookieJar {
        HeaderCookieJar::from_headers(headers, self.cookie_policy.clone())
    }
}

/// Marker placed in extensions when the request's cookie named no user.
#[derive(Debug, Clone, Copy)]
pub struct StaleSession;

/// Session middleware that resolves the `user-token` cookie.
///
/// This middleware:
/// 1. Builds a cookie jar from the `Cookie` headers
/// 2. Resolves it with the `SessionAuthority`
/// 3. On success, injects `Principal` into request extensions
/// 4. On a stale cookie, injects [`StaleSession`] and deletes the cookie
/// 5. On missing cookie, continues without injecting (for optional auth routes)
/// 6. On lookup failure, returns 503 and leaves the cookie alone
pub async fn session_middleware(
    State(state): State<SessionState>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut jar = state.jar(request.headers());

    match state.authority.lookup(&mut jar).await {
        Ok(SessionLookup::Authenticated(principal)) => {
            request.extensions_mut().insert(principal);
        }
        Ok(SessionLookup::Stale) => {
            request.extensions_mut().insert(StaleSession);
        }
        Ok(SessionLookup::Anonymous) => {}
        Err(e) => {
            tracing::error!(error = %e, "Session lookup failed");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::service_unavailable(
                    "Authentication service unavailable",
                )),
            )
                .into_response();
        }
    }

    let mut response = next.run(request).await;
    if let Err(e) = jar.write_to(response.headers_mut()) {
        tracing::error!(error = %e, "Failed to write session cookie");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal("Failed to write session cookie")),
        )
            .into_response();
    }
    response
}

/// Extractor that requires authentication.
///
/// If no principal is in the request extensions, returns 401.
///
/// # Example
///
/// ```ignore
/// async fn my_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Principal);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            if let Some(principal) = parts.extensions.get::<Principal>() {
                return Ok(RequireAuth(principal.clone()));
            }
            if parts.extensions.get::<StaleSession>().is_some() {
                return Err(AuthRejection::from(AuthError::StaleSession));
            }
            Err(AuthRejection::from(AuthError::Unauthenticated))
        })
    }
}

/// Extractor for optional authentication.
///
/// Returns `None` for anonymous and stale sessions, `Some(user)` if
/// authenticated.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<Principal>);

impl<S> axum::extract::FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user = parts.extensions.get::<Principal>().cloned();
            Ok(OptionalAuth(user))
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No session cookie was presented.
    Unauthenticated,
    /// The session cookie named a user that no longer exists.
    StaleSession,
}

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::StaleSession => AuthRejection::StaleSession,
            _ => AuthRejection::Unauthenticated,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (message, code) = match self {
            AuthRejection::Unauthenticated => ("Authentication required", "UNAUTHENTICATED"),
            AuthRejection::StaleSession => ("Session is no longer valid", "STALE_SESSION"),
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": message,
                "code": code
            })),
        )
            .into_response()
    }
}
