//! Integration tests for the HTTP surface.
//!
//! Drives the assembled router with in-memory adapters:
//! 1. Login, cookie session resolution, stale-cookie clearing and logout
//! 2. Event creation and session updates, including role and owner checks
//! 3. The per-edit validation endpoint
//! 4. Forum message polling

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use symposium::adapters::auth::MockUserRepository;
use symposium::adapters::http::{api_router, AppState};
use symposium::adapters::storage::{InMemoryEventRepository, InMemoryForumMessageStore};
use symposium::adapters::websocket::RoomManager;
use symposium::config::AppConfig;
use symposium::domain::foundation::{ForumId, Role, UserId};
use symposium::domain::user::UserRecord;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    users: Arc<MockUserRepository>,
    events: Arc<InMemoryEventRepository>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    fn with_config(config: AppConfig) -> Self {
        let users = Arc::new(
            MockUserRepository::new()
                .with_user(
                    UserRecord::new(
                        UserId::new("org-ada").unwrap(),
                        Role::Organizer,
                        "Ada Lovelace",
                        "ada@example.com",
                    )
                    .with_affiliation("Analytical Engines Ltd"),
                )
                .with_test_user("org-grace", Role::Organizer)
                .with_test_user("researcher", Role::User)
                .with_test_user("admin", Role::Admin),
        );
        let events = Arc::new(InMemoryEventRepository::new());

        let state = AppState::new(
            &config,
            users.clone(),
            events.clone(),
            Arc::new(InMemoryForumMessageStore::new()),
            Arc::new(RoomManager::default()),
        );

        Self {
            router: api_router(state),
            users,
            events,
        }
    }

    async fn send(&self, method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::COOKIE, format!("user-token={}", user));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string())
}

fn session(title: &str, start: &str, end: &str) -> Value {
    json!({
        "title": title,
        "description": format!("{} description", title),
        "capacity": 50,
        "start": format!("2026-03-02T{}:00Z", start),
        "end": format!("2026-03-02T{}:00Z", end),
    })
}

fn event_request(sessions: Vec<Value>) -> Value {
    json!({
        "title": "Spring Symposium",
        "description": "Two days of talks",
        "location": "Hall A",
        "sessions": sessions,
    })
}

// =============================================================================
// Session authority over HTTP
// =============================================================================

#[tokio::test]
async fn me_returns_principal_for_valid_cookie() {
    let app = TestApp::new();

    let response = app.send(Method::GET, "/api/auth/me", Some("org-ada"), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());
    let body = json_body(response).await;
    assert_eq!(body["id"], "org-ada");
    assert_eq!(body["role"], "ORGANIZER");
    assert_eq!(body["affiliation"], "Analytical Engines Ltd");
}

#[tokio::test]
async fn me_without_cookie_is_401() {
    let app = TestApp::new();

    let response = app.send(Method::GET, "/api/auth/me", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn deleted_user_cookie_is_cleared_then_absent() {
    let app = TestApp::new();
    app.users.remove_user(&UserId::new("researcher").unwrap());

    let first = app.send(Method::GET, "/api/auth/me", Some("researcher"), None).await;

    assert_eq!(first.status(), StatusCode::UNAUTHORIZED);
    let cleared = set_cookie(&first).unwrap();
    assert!(cleared.starts_with("user-token=;"));
    assert!(cleared.contains("Max-Age=0"));
    assert_eq!(json_body(first).await["code"], "STALE_SESSION");

    // The browser honoured the deletion and sends no cookie.
    let second = app.send(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&second).is_none());
}

#[tokio::test]
async fn login_sets_the_cookie_the_next_request_uses() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": " ada@example.com " })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response).unwrap();
    assert!(cookie.contains("HttpOnly"));
    assert_eq!(json_body(response).await["id"], "org-ada");

    let pair = cookie.split(';').next().unwrap().to_string();
    let me = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(json_body(me).await["id"], "org-ada");
}

#[tokio::test]
async fn login_with_unknown_email_is_401_without_cookie() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response).is_none());
}

#[tokio::test]
async fn login_replaces_a_stale_cookie() {
    let app = TestApp::new();
    app.users.remove_user(&UserId::new("researcher").unwrap());

    let response = app
        .send(
            Method::POST,
            "/api/auth/login",
            Some("researcher"),
            Some(json!({ "email": "ada@example.com" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies: Vec<_> = response.headers().get_all(header::SET_COOKIE).iter().collect();
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].to_str().unwrap().starts_with("user-token=org-ada"));
}

#[tokio::test]
async fn logout_deletes_cookie() {
    let app = TestApp::new();

    let response = app.send(Method::POST, "/api/auth/logout", Some("org-ada"), None).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(set_cookie(&response).unwrap().starts_with("user-token=;"));
}

// =============================================================================
// Events
// =============================================================================

#[tokio::test]
async fn organizer_creates_event_with_sessions() {
    let app = TestApp::new();
    let request = event_request(vec![
        session("Keynote", "09:00", "10:00"),
        session("Panel", "10:00", "11:00"),
    ]);

    let response = app.send(Method::POST, "/api/events", Some("org-ada"), Some(request)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["organizer_id"], "org-ada");
    assert_eq!(body["sessions"].as_array().unwrap().len(), 2);
    assert_eq!(app.events.event_count(), 1);
}

#[tokio::test]
async fn non_organizers_cannot_create_events() {
    let app = TestApp::new();

    for user in ["researcher", "admin"] {
        let response = app
            .send(Method::POST, "/api/events", Some(user), Some(event_request(vec![])))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{} should be refused", user);
    }
    assert_eq!(app.events.event_count(), 0);
}

#[tokio::test]
async fn anonymous_create_is_401() {
    let app = TestApp::new();

    let response = app
        .send(Method::POST, "/api/events", None, Some(event_request(vec![])))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn overlapping_sessions_are_rejected_with_per_index_details() {
    let app = TestApp::new();
    let request = event_request(vec![
        session("Keynote", "09:00", "10:00"),
        session("Workshop", "09:30", "10:30"),
    ]);

    let response = app.send(Method::POST, "/api/events", Some("org-ada"), Some(request)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    let issue = &body["details"][0];
    assert_eq!(issue["index"], 1);
    assert_eq!(issue["diagnostic"]["kind"], "conflict");
    assert_eq!(issue["diagnostic"]["conflictingIndex"], 0);
    assert_eq!(
        issue["diagnostic"]["message"],
        "Session 2 overlaps with session 1 (Keynote)"
    );
    assert_eq!(app.events.event_count(), 0);
}

#[tokio::test]
async fn incomplete_session_is_rejected() {
    let app = TestApp::new();
    let request = event_request(vec![json!({
        "title": "Untimed",
        "description": "No times yet",
        "capacity": 10,
        "start": "2026-03-02T09:00:00Z",
    })]);

    let response = app.send(Method::POST, "/api/events", Some("org-ada"), Some(request)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["details"][0]["blockers"]
        .as_array()
        .unwrap()
        .contains(&json!("missingEnd")));
}

#[tokio::test]
async fn owner_updates_sessions_and_gets_diffs() {
    let app = TestApp::new();
    let created = app
        .send(
            Method::POST,
            "/api/events",
            Some("org-ada"),
            Some(event_request(vec![session("Keynote", "09:00", "10:00")])),
        )
        .await;
    let created = json_body(created).await;
    let event_id = created["id"].as_str().unwrap().to_string();
    let keynote_id = created["sessions"][0]["id"].as_str().unwrap().to_string();

    let mut moved = session("Keynote", "13:00", "14:00");
    moved["session_id"] = json!(keynote_id);
    let update = json!({ "sessions": [moved, session("Lunch", "12:00", "13:00")] });

    let response = app
        .send(
            Method::PUT,
            &format!("/api/events/{}/sessions", event_id),
            Some("org-ada"),
            Some(update),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let ops: Vec<&str> = body["changes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["op"].as_str().unwrap())
        .collect();
    assert_eq!(ops, vec!["updated", "added"]);

    let fetched = json_body(
        app.send(Method::GET, &format!("/api/events/{}", event_id), Some("researcher"), None)
            .await,
    )
    .await;
    let titles: Vec<&str> = fetched["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Lunch", "Keynote"]);
}

#[tokio::test]
async fn one_session_submitted_twice_is_422() {
    let app = TestApp::new();
    let created = json_body(
        app.send(
            Method::POST,
            "/api/events",
            Some("org-ada"),
            Some(event_request(vec![session("Keynote", "09:00", "10:00")])),
        )
        .await,
    )
    .await;
    let event_id = created["id"].as_str().unwrap().to_string();
    let keynote_id = created["sessions"][0]["id"].clone();

    let mut morning = session("Keynote", "09:00", "10:00");
    morning["session_id"] = keynote_id.clone();
    let mut afternoon = session("Keynote again", "14:00", "15:00");
    afternoon["session_id"] = keynote_id;
    let uri = format!("/api/events/{}/sessions", event_id);

    let response = app
        .send(
            Method::PUT,
            &uri,
            Some("org-ada"),
            Some(json!({ "sessions": [morning, afternoon] })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let fetched = json_body(
        app.send(Method::GET, &format!("/api/events/{}", event_id), Some("org-ada"), None)
            .await,
    )
    .await;
    assert_eq!(fetched["sessions"].as_array().unwrap().len(), 1);
    assert_eq!(fetched["sessions"][0]["title"], "Keynote");
}

#[tokio::test]
async fn other_organizer_cannot_update_sessions() {
    let app = TestApp::new();
    let created = json_body(
        app.send(
            Method::POST,
            "/api/events",
            Some("org-ada"),
            Some(event_request(vec![session("Keynote", "09:00", "10:00")])),
        )
        .await,
    )
    .await;
    let event_id = created["id"].as_str().unwrap();

    let response = app
        .send(
            Method::PUT,
            &format!("/api/events/{}/sessions", event_id),
            Some("org-grace"),
            Some(json!({ "sessions": [] })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_event_is_404_and_bad_id_is_400() {
    let app = TestApp::new();

    let missing = app
        .send(
            Method::GET,
            "/api/events/00000000-0000-4000-8000-000000000000",
            Some("org-ada"),
            None,
        )
        .await;
    let malformed = app.send(Method::GET, "/api/events/not-a-uuid", Some("org-ada"), None).await;

    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Per-edit validation
// =============================================================================

#[tokio::test]
async fn validate_accepts_touching_sessions() {
    let app = TestApp::new();
    let request = json!({
        "sessions": [
            {"title": "Keynote", "start": "2026-03-02T09:00:00Z", "end": "2026-03-02T10:00:00Z", "status": "saved"},
            {"title": "Panel", "start": "2026-03-02T10:00:00Z", "status": "draft"}
        ],
        "index": 1,
        "field": "end",
        "value": "2026-03-02T11:00:00Z"
    });

    let response = app
        .send(Method::POST, "/api/events/sessions/validate", Some("org-ada"), Some(request))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["outcome"], "accepted");
    assert_eq!(body["sessions"][1]["end"], "2026-03-02T11:00:00Z");
    assert_eq!(body["all_sessions_saved"], false);
}

#[tokio::test]
async fn validate_reports_time_range_before_conflict() {
    let app = TestApp::new();
    let request = json!({
        "sessions": [
            {"title": "Keynote", "start": "2026-03-02T09:00:00Z", "end": "2026-03-02T10:00:00Z", "status": "saved"},
            {"title": "Panel", "start": "2026-03-02T11:00:00Z", "status": "draft"}
        ],
        "index": 1,
        "field": "end",
        "value": "2026-03-02T09:30:00Z"
    });

    let body = json_body(
        app.send(Method::POST, "/api/events/sessions/validate", Some("org-ada"), Some(request))
            .await,
    )
    .await;

    assert_eq!(body["outcome"], "rejected");
    assert_eq!(body["diagnostic"]["kind"], "timeRange");
    assert_eq!(body["diagnostic"]["message"], "End time must be after start time");
}

#[tokio::test]
async fn validate_new_row_against_existing() {
    let app = TestApp::new();
    let request = json!({
        "sessions": [
            {"title": "Keynote", "start": "2026-03-02T09:00:00Z", "end": "2026-03-02T10:00:00Z", "status": "saved"}
        ],
        "index": 1,
        "field": "start",
        "value": "2026-03-02T09:15:00Z"
    });

    let body = json_body(
        app.send(Method::POST, "/api/events/sessions/validate", Some("org-ada"), Some(request))
            .await,
    )
    .await;

    assert_eq!(body["outcome"], "rejected");
    assert_eq!(body["diagnostic"]["conflictingIndex"], 0);
}

#[tokio::test]
async fn validate_index_past_new_row_is_400() {
    let app = TestApp::new();
    let request = json!({
        "sessions": [],
        "index": 3,
        "field": "start",
        "value": "2026-03-02T09:00:00Z"
    });

    let response = app
        .send(Method::POST, "/api/events/sessions/validate", Some("org-ada"), Some(request))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Forum polling
// =============================================================================

#[tokio::test]
async fn posted_messages_are_polled_after_cursor() {
    let app = TestApp::new();
    let forum = ForumId::new();
    let uri = format!("/api/forums/{}/messages", forum);

    let posted = app
        .send(Method::POST, &uri, Some("researcher"), Some(json!({ "body": "  hello  " })))
        .await;
    assert_eq!(posted.status(), StatusCode::CREATED);
    assert_eq!(json_body(posted).await["body"], "hello");

    let page = json_body(app.send(Method::GET, &uri, Some("org-ada"), None).await).await;
    assert_eq!(page["messages"].as_array().unwrap().len(), 1);
    let cursor = page["cursor"].as_str().unwrap().to_string();

    let after = json_body(
        app.send(
            Method::GET,
            &format!("{}?since={}", uri, cursor.replace('+', "%2B")),
            Some("org-ada"),
            None,
        )
        .await,
    )
    .await;
    assert!(after["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn polling_pages_through_history_longer_than_a_page() {
    let mut config = AppConfig::default();
    config.chat.history_page_size = 2;
    let app = TestApp::with_config(config);
    let forum = ForumId::new();
    let uri = format!("/api/forums/{}/messages", forum);
    for i in 0..5 {
        let body = json!({ "body": format!("m{}", i) });
        app.send(Method::POST, &uri, Some("researcher"), Some(body)).await;
    }

    let mut bodies = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page_uri = match &cursor {
            Some(cursor) => format!("{}?since={}", uri, cursor),
            None => uri.clone(),
        };
        let page = json_body(app.send(Method::GET, &page_uri, Some("org-ada"), None).await).await;
        let messages = page["messages"].as_array().unwrap();
        if messages.is_empty() {
            break;
        }
        assert!(messages.len() <= 2);
        bodies.extend(messages.iter().map(|m| m["body"].as_str().unwrap().to_string()));
        cursor = page["cursor"].as_str().map(str::to_string);
    }

    assert_eq!(bodies, vec!["m0", "m1", "m2", "m3", "m4"]);
}

#[tokio::test]
async fn garbage_cursor_is_400() {
    let app = TestApp::new();
    let uri = format!("/api/forums/{}/messages?since=yesterday", ForumId::new());

    let response = app.send(Method::GET, &uri, Some("org-ada"), None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_message_is_400() {
    let app = TestApp::new();
    let uri = format!("/api/forums/{}/messages", ForumId::new());

    let response = app
        .send(Method::POST, &uri, Some("researcher"), Some(json!({ "body": "   " })))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
