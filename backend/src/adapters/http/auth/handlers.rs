//! HTTP handlers for the current session.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::adapters::http::cookies::HeaderCookieJar;
use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::middleware::{RequireAuth, SessionState};
use crate::domain::foundation::{AuthError, Principal, Role};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// The signed-in user's profile.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub role: Role,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl From<Principal> for CurrentUserResponse {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id.to_string(),
            role: principal.role,
            name: principal.name,
            email: principal.email,
            affiliation: principal.affiliation,
            bio: principal.bio,
        }
    }
}

/// GET /api/auth/me - Current principal
pub async fn current_user(RequireAuth(user): RequireAuth) -> Json<CurrentUserResponse> {
    Json(user.into())
}

/// POST /api/auth/login - Start a session for a registered email
pub async fn login(
    State(state): State<SessionState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Response {
    let mut jar = state.jar(&headers);

    match state.authority.sign_in(&mut jar, &request.email).await {
        Ok(principal) => with_cookies(&jar, Json(CurrentUserResponse::from(principal))),
        Err(AuthError::ServiceUnavailable(e)) => {
            tracing::error!(error = %e, "Sign-in lookup failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::service_unavailable(
                    "Authentication service unavailable",
                )),
            )
                .into_response()
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::unauthorized("Unknown account")),
        )
            .into_response(),
    }
}

/// POST /api/auth/logout - Delete the session cookie
///
/// Succeeds whether or not a session was present.
pub async fn logout(State(state): State<SessionState>, headers: HeaderMap) -> Response {
    let mut jar = state.jar(&headers);
    state.authority.sign_out(&mut jar);

    with_cookies(&jar, StatusCode::NO_CONTENT)
}

fn with_cookies(jar: &HeaderCookieJar, body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
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
