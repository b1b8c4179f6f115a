//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles: the auth flow, owner scoping on the
//! task surface, the cache-through endpoints and the creation notifier.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use todo_backend::api::cache_handlers::DELAY_CACHE_KEY;
use todo_backend::notify::{spawn_notification_worker, LogMailer, MailError, Mailer};
use todo_backend::{create_router, AppState, Config};
use tokio::sync::mpsc;
use tower::ServiceExt;

// == Helper Functions ==

/// Test config with unroutable upstreams so nothing touches the network.
fn test_config() -> Config {
    Config {
        delay_api_url: "http://127.0.0.1:9".to_string(),
        weather_api_url: "http://127.0.0.1:9".to_string(),
        upstream_timeout_secs: 1,
        ..Config::default()
    }
}

fn create_test_app() -> (Router, AppState, mpsc::UnboundedReceiver<u64>) {
    let (state, notify_rx) = AppState::from_config(&test_config(), Arc::new(LogMailer));
    (create_router(state.clone()), state, notify_rx)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn parse_date(value: &Value) -> chrono::DateTime<chrono::FixedOffset> {
    chrono::DateTime::parse_from_rfc3339(value.as_str().unwrap()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"));
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Registers a user through the API and returns their token.
async fn register(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/accounts/register",
            json!({"username": username, "password1": "pass1234", "password2": "pass1234"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_to_json(response.into_body()).await;
    json["token"].as_str().unwrap().to_string()
}

/// Creates a task through the API and returns its JSON body.
async fn create_task(app: &Router, token: &str, title: &str) -> Value {
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/tasks",
            token,
            Some(json!({"title": title})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_to_json(response.into_body()).await
}

/// Test mail transport recording every dispatched subject.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<String>>,
}

impl Mailer for RecordingMailer {
    fn send(&self, _to: &str, subject: &str, _body: &str) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(subject.to_string());
        Ok(())
    }
}

// == Auth Flow Tests ==

#[tokio::test]
async fn test_register_login_roundtrip() {
    let (app, _state, _rx) = create_test_app();
    register(&app, "testuser").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/accounts/login",
            json!({"username": "testuser", "password": "pass1234"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["username"], "testuser");
    assert!(json["token"].as_str().is_some());
}

#[tokio::test]
async fn test_login_bad_credentials_is_validation_error() {
    let (app, _state, _rx) = create_test_app();
    register(&app, "testuser").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/accounts/login",
            json!({"username": "testuser", "password": "wrong_password"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["errors"]["non_field_errors"][0]
        .as_str()
        .unwrap()
        .contains("Unable to log in"));
}

#[tokio::test]
async fn test_logout_and_change_password() {
    let (app, _state, _rx) = create_test_app();
    let token = register(&app, "testuser").await;

    let response = app
        .clone()
        .oneshot(authed_request("POST", "/accounts/logout", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/accounts/change-password",
            &token,
            Some(json!({
                "old_password": "pass1234",
                "new_password1": "newpass123",
                "new_password2": "newpass123"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer logs in
    let response = app
        .oneshot(json_request(
            "POST",
            "/accounts/login",
            json!({"username": "testuser", "password": "pass1234"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_email_endpoint() {
    let (state, _rx) = AppState::from_config(&test_config(), Arc::new(RecordingMailer::default()));
    let app = create_router(state.clone());
    let token = register(&app, "testuser").await;

    let response = app
        .oneshot(authed_request(
            "POST",
            "/accounts/send-email",
            &token,
            Some(json!({"subject": "hello"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// == Ownership Scoping Tests ==

#[tokio::test]
async fn test_unauthenticated_list_is_401() {
    let (app, _state, _rx) = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/tasks").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_two_users_see_only_their_own_tasks() {
    let (app, _state, _rx) = create_test_app();
    let token_u1 = register(&app, "user1").await;
    let token_u2 = register(&app, "user2").await;

    create_task(&app, &token_u1, "Task 1").await;
    create_task(&app, &token_u1, "Task 2").await;
    create_task(&app, &token_u2, "Task X").await;

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/tasks", &token_u1, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Task 1", "Task 2"]);

    let response = app
        .oneshot(authed_request("GET", "/tasks", &token_u2, None))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Task X"]);
}

#[tokio::test]
async fn test_cross_owner_access_is_404_never_403() {
    let (app, _state, _rx) = create_test_app();
    let token_u1 = register(&app, "user1").await;
    let token_u2 = register(&app, "user2").await;

    let task = create_task(&app, &token_u1, "private").await;
    let id = task["id"].as_u64().unwrap();

    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({"title": "stolen"}))),
        ("PATCH", Some(json!({"completed": true}))),
        ("DELETE", None),
    ] {
        let response = app
            .clone()
            .oneshot(authed_request(
                method,
                &format!("/tasks/{id}"),
                &token_u2,
                body,
            ))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::NOT_FOUND,
            "{method} should report not-found for a foreign task"
        );
    }

    // The row is untouched
    let response = app
        .oneshot(authed_request(
            "GET",
            &format!("/tasks/{id}"),
            &token_u1,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["title"], "private");
    assert_eq!(json["completed"], false);
}

#[tokio::test]
async fn test_create_ignores_supplied_owner() {
    let (app, _state, _rx) = create_test_app();
    let token = register(&app, "user1").await;

    let response = app
        .oneshot(authed_request(
            "POST",
            "/tasks",
            &token,
            Some(json!({"title": "mine", "user": 999})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["user"], 1);
}

// == Task Lifecycle Tests ==

#[tokio::test]
async fn test_create_roundtrip_defaults() {
    let (app, _state, _rx) = create_test_app();
    let token = register(&app, "user1").await;

    let task = create_task(&app, &token, "X").await;
    let id = task["id"].as_u64().unwrap();

    let response = app
        .oneshot(authed_request(
            "GET",
            &format!("/tasks/{id}"),
            &token,
            None,
        ))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;

    assert_eq!(json["title"], "X");
    assert_eq!(json["completed"], false);
    assert_eq!(json["created_date"], json["updated_date"]);
}

#[tokio::test]
async fn test_update_advances_updated_date_only() {
    let (app, _state, _rx) = create_test_app();
    let token = register(&app, "user1").await;

    let task = create_task(&app, &token, "before").await;
    let id = task["id"].as_u64().unwrap();

    // Make sure the clock has visibly moved
    tokio::time::sleep(Duration::from_millis(10)).await;

    let response = app
        .oneshot(authed_request(
            "PUT",
            &format!("/tasks/{id}"),
            &token,
            Some(json!({"title": "after", "completed": true})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_to_json(response.into_body()).await;

    assert_eq!(updated["id"], task["id"]);
    assert_eq!(updated["created_date"], task["created_date"]);
    let before = parse_date(&task["updated_date"]);
    let after = parse_date(&updated["updated_date"]);
    assert!(after > before, "updated_date should advance on mutation");
}

#[tokio::test]
async fn test_delete_returns_204_with_empty_body() {
    let (app, _state, _rx) = create_test_app();
    let token = register(&app, "user1").await;

    let task = create_task(&app, &token, "doomed").await;
    let id = task["id"].as_u64().unwrap();

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/tasks/{id}"),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());

    let response = app
        .oneshot(authed_request(
            "DELETE",
            &format!("/tasks/{id}"),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let (app, _state, _rx) = create_test_app();
    let token = register(&app, "user1").await;

    // Missing title
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/tasks",
            &token,
            Some(json!({"completed": true})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["errors"]["title"].is_array());

    // Oversized title
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/tasks",
            &token,
            Some(json!({"title": "x".repeat(201)})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was persisted
    let response = app
        .oneshot(authed_request("GET", "/tasks", &token, None))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

// == Maintenance Job Tests ==

#[tokio::test]
async fn test_delete_completed_job_is_idempotent_across_owners() {
    let (app, state, _rx) = create_test_app();
    let token_u1 = register(&app, "user1").await;
    let token_u2 = register(&app, "user2").await;

    create_task(&app, &token_u1, "open").await;
    let done = create_task(&app, &token_u1, "done").await;
    let done_other = create_task(&app, &token_u2, "done too").await;

    for (token, task) in [(&token_u1, &done), (&token_u2, &done_other)] {
        let id = task["id"].as_u64().unwrap();
        let response = app
            .clone()
            .oneshot(authed_request(
                "PATCH",
                &format!("/tasks/{id}"),
                token,
                Some(json!({"completed": true})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(
        todo_backend::jobs::delete_completed_tasks(&state.tasks).await,
        2
    );
    assert_eq!(
        todo_backend::jobs::delete_completed_tasks(&state.tasks).await,
        0
    );
    assert_eq!(
        todo_backend::jobs::count_incomplete_tasks(&state.tasks).await,
        1
    );
}

// == Creation Notifier Tests ==

#[tokio::test]
async fn test_create_notifies_exactly_once() {
    let mailer = Arc::new(RecordingMailer::default());
    let (state, notify_rx) = AppState::from_config(&test_config(), mailer.clone());
    let worker = spawn_notification_worker(state.tasks.clone(), mailer.clone(), notify_rx);
    let app = create_router(state);

    let token = register(&app, "user1").await;
    create_task(&app, &token, "notify me").await;

    tokio::time::sleep(Duration::from_millis(100)).await;

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("notify me"));
    worker.abort();
}

#[tokio::test]
async fn test_task_deleted_before_worker_runs_is_silent() {
    let mailer = Arc::new(RecordingMailer::default());
    let (state, notify_rx) = AppState::from_config(&test_config(), mailer.clone());
    let app = create_router(state.clone());

    // Worker not running yet: create then delete while the id sits queued
    let token = register(&app, "user1").await;
    let task = create_task(&app, &token, "short lived").await;
    let id = task["id"].as_u64().unwrap();
    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/tasks/{id}"),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let worker = spawn_notification_worker(state.tasks.clone(), mailer.clone(), notify_rx);
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Terminal outcome: no mail, worker still alive for the next id
    assert!(mailer.sent.lock().unwrap().is_empty());
    assert!(!worker.is_finished());

    create_task(&app, &token, "survivor").await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    worker.abort();
}

// == Cache-Through Tests ==

#[tokio::test]
async fn test_delay_endpoint_served_from_cache() {
    let (app, state, _rx) = create_test_app();
    state
        .cache
        .write()
        .await
        .put(DELAY_CACHE_KEY.to_string(), json!({"delay": 10}), 120);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/cache/delay")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["delay"], 10);
}

#[tokio::test]
async fn test_weather_endpoint_miss_with_dead_upstream_is_502() {
    let (app, _state, _rx) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/cache/weather/oslo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_weather_endpoint_per_city_cache() {
    let (app, state, _rx) = create_test_app();
    state
        .cache
        .write()
        .await
        .put("weather:tehran".to_string(), json!({"temp": 30}), 300);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/cache/weather/Tehran")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["data"]["temp"], 30);

    // Different city, different key: miss hits the dead upstream
    let response = app
        .oneshot(
            Request::builder()
                .uri("/cache/weather/Paris")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
