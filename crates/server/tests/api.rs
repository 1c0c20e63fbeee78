use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use vitae_common::defaults;
use vitae_server::auth::ManualClock;
use vitae_server::config::{AppState, ServerConfig};
use vitae_server::router;

const PASSKEY: &str = "lux-in-tenebris";

fn app(admin_key: Option<&str>) -> (Router, TempDir) {
    let dir = tempdir().unwrap();
    let mut config = ServerConfig::default().with_data_path(dir.path().join("data").join("db.json"));
    config.admin_key = admin_key.map(str::to_string);
    (router(AppState::new(config)), dir)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn login(app: &Router) -> String {
    let (status, body) = send(app, post_json("/api/auth", None, &json!({ "passkey": PASSKEY }))).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = app(None);
    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["identity"], "ARCANUM_VITAE_SYSTEM");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_data_is_null_before_first_save() {
    let (app, _dir) = app(Some(PASSKEY));
    let (status, body) = send(&app, get("/api/data")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_admin_save_scenario() {
    let (app, _dir) = app(Some(PASSKEY));

    let (status, body) = send(&app, post_json("/api/auth", None, &json!({ "passkey": PASSKEY }))).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 64);
    assert!(body["expiresAt"].is_string());

    // A track without its audio is rejected and nothing is written
    let mut bundle = defaults::content_bundle().to_value();
    bundle["albums"][0]["tracks"][0]
        .as_object_mut()
        .unwrap()
        .remove("audioUrl");
    let (status, body) = send(&app, post_json("/api/save", Some(&token), &bundle)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid data");
    let details: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(details.contains(&"Invalid albums payload"));

    let (_, stored) = send(&app, get("/api/data")).await;
    assert!(stored.is_null());

    let bundle = defaults::content_bundle().to_value();
    let (status, body) = send(&app, post_json("/api/save", Some(&token), &bundle)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, stored) = send(&app, get("/api/data")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, bundle);
}

#[tokio::test]
async fn test_save_requires_token() {
    let (app, _dir) = app(Some(PASSKEY));
    let bundle = defaults::content_bundle().to_value();

    let (status, body) = send(&app, post_json("/api/save", None, &bundle)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = send(&app, post_json("/api/save", Some("not-a-token"), &bundle)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_fallback_token_header() {
    let (app, _dir) = app(Some(PASSKEY));
    let token = login(&app).await;

    let req = Request::get("/api/auth/verify")
        .header("x-admin-token", token.as_str())
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_auth_disabled_without_key() {
    let (app, _dir) = app(None);
    let (status, body) = send(&app, post_json("/api/auth", None, &json!({ "passkey": PASSKEY }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Admin key not configured");
}

#[tokio::test]
async fn test_auth_passkey_errors() {
    let (app, _dir) = app(Some(PASSKEY));

    let (status, body) = send(&app, post_json("/api/auth", None, &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing passkey");

    let (status, body) = send(&app, post_json("/api/auth", None, &json!({ "passkey": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing passkey");

    let (status, body) = send(&app, post_json("/api/auth", None, &json!({ "passkey": "nope" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid passkey");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let (app, _dir) = app(Some(PASSKEY));
    let token = login(&app).await;

    let verify = |token: &str| {
        Request::get("/api/auth/verify")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    };

    let (status, _) = send(&app, verify(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, post_json("/api/auth/logout", Some(&token), &json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, verify(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_expires() {
    let dir = tempdir().unwrap();
    let clock = Arc::new(ManualClock::default());
    let config = ServerConfig::default()
        .with_data_path(dir.path().join("db.json"))
        .with_admin_key(PASSKEY);
    let ttl = config.token_ttl;
    let app = router(AppState::with_clock(config, clock.clone()));

    let token = login(&app).await;
    let bundle = defaults::content_bundle().to_value();

    clock.advance(ttl - Duration::seconds(1));
    let (status, _) = send(&app, post_json("/api/save", Some(&token), &bundle)).await;
    assert_eq!(status, StatusCode::OK);

    clock.advance(Duration::seconds(1));
    let (status, _) = send(&app, post_json("/api/save", Some(&token), &bundle)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_object_payload_rejected() {
    let (app, _dir) = app(Some(PASSKEY));
    let token = login(&app).await;

    let (status, body) = send(&app, post_json("/api/save", Some(&token), &json!([1, 2, 3]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], json!(["Payload must be an object"]));
}

#[tokio::test]
async fn test_auth_without_json_body() {
    let empty = || Request::post("/api/auth").body(Body::empty()).unwrap();

    let (keyed, _keyed_dir) = app(Some(PASSKEY));
    let (unkeyed, _unkeyed_dir) = app(None);

    let (status, body) = send(&keyed, empty()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing passkey");

    let req = Request::post("/api/auth")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = send(&keyed, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing passkey");

    let (status, body) = send(&unkeyed, empty()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Admin key not configured");
}

#[tokio::test]
async fn test_save_with_malformed_body() {
    let (app, _dir) = app(Some(PASSKEY));
    let token = login(&app).await;

    let req = Request::post("/api/save")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from("{ \"albums\": ["))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid data");
    assert_eq!(body["details"].as_array().unwrap().len(), 1);

    let req = Request::post("/api/save")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid data");

    let (_, stored) = send(&app, get("/api/data")).await;
    assert!(stored.is_null());
}
