//! Application router: every HTTP adapter behind the session middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapters::http::auth::auth_routes;
use crate::adapters::http::cookies::CookiePolicy;
use crate::adapters::http::events::{event_routes, EventHandlers};
use crate::adapters::http::forums::forum_routes;
use crate::adapters::http::middleware::{session_middleware, SessionState};
use crate::application::handlers::event::{
    CreateEventHandler, GetEventHandler, UpdateEventSessionsHandler,
};
use crate::application::{ChatClient, SessionAuthority};
use crate::config::{AppConfig, ServerConfig};
use crate::ports::{ChatTransport, EventRepository, ForumMessageStore, UserRepository};

/// Everything the HTTP layer needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionState,
    pub events: EventHandlers,
    pub chat: ChatClient,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        history: Arc<dyn ForumMessageStore>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        let authority = SessionAuthority::new(users, config.session.cookie_name.clone());
        let session = SessionState::new(authority, CookiePolicy::from(&config.session));

        let events = EventHandlers::new(
            Arc::new(CreateEventHandler::new(events.clone())),
            Arc::new(UpdateEventSessionsHandler::new(events.clone())),
            Arc::new(GetEventHandler::new(events)),
        );

        let chat = ChatClient::new(
            transport,
            history,
            config.chat.history_page_size,
            config.chat.max_reconnect_attempts,
        );

        Self {
            session,
            events,
            chat,
        }
    }
}

/// The API routes with the session middleware applied.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes(state.session.clone()))
        .nest("/api/events", event_routes(state.events))
        .nest("/api/forums", forum_routes(state.chat))
        .layer(middleware::from_fn_with_state(state.session, session_middleware))
}

/// Adds tracing, request ids, timeouts and CORS around `router`.
pub fn with_http_layers(router: Router, server: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let router = router
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    if origins.is_empty() {
        return router;
    }

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60));
    router.layer(cors)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockUserRepository;
    use crate::adapters::storage::{InMemoryEventRepository, InMemoryForumMessageStore};
    use crate::adapters::websocket::RoomManager;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(
            &AppConfig::default(),
            Arc::new(MockUserRepository::new()),
            Arc::new(InMemoryEventRepository::new()),
            Arc::new(InMemoryForumMessageStore::new()),
            Arc::new(RoomManager::default()),
        )
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = with_http_layers(api_router(state()), &ServerConfig::default());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origin() {
        let server = ServerConfig {
            cors_origins: Some("https://symposium.example".to_string()),
            ..ServerConfig::default()
        };
        let app = with_http_layers(api_router(state()), &server);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/events")
                    .header(header::ORIGIN, "https://symposium.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://symposium.example"
        );
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }
}
