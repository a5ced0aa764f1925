//! Authentication API integration tests
//!
//! Exercises register, login, me and logout through the full router.

mod common;

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderValue, StatusCode,
};
use common::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[tokio::test]
async fn test_register_returns_token_user_and_cookie() {
    let app = TestApp::new().await;
    let server = app.server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@test.com",
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body = response.json::<Value>();
    let token = body["token"].as_str().expect("token in body");
    assert!(!token.is_empty());
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@test.com");
    assert!(body["user"].get("password_hash").is_none());

    let cookie = response.header(SET_COOKIE);
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with(&format!("token={};", token)));
    assert!(cookie.contains("HttpOnly"));

    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new().await;
    let server = app.server();
    create_test_user(&app.state, "alice").await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice2",
            "email": "alice@test.com",
            "password": "password123"
        }))
        .await;

    assert_contains!(assert_error_response!(response, StatusCode::CONFLICT), "Email");
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = TestApp::new().await;
    let server = app.server();

    let cases = [
        json!({"username": "ab", "email": "ab@test.com", "password": "password123"}),
        json!({"username": "carol", "email": "not-an-email", "password": "password123"}),
        json!({"username": "carol", "email": "carol@test.com", "password": "short"}),
    ];

    for case in cases {
        let response = server.post("/api/auth/register").json(&case).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "case: {}", case);
    }
    assert_eq!(app.count("users").await, 0);
}

#[tokio::test]
async fn test_login_with_valid_credentials() {
    let app = TestApp::new().await;
    let server = app.server();
    let user = create_test_user(&app.state, "bob").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({"email": user.email, "password": TEST_PASSWORD}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["user"]["id"], user.id.as_str());
    assert!(response.header(SET_COOKIE).to_str().unwrap().starts_with("token="));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    let server = app.server();
    let user = create_test_user(&app.state, "bob").await;

    let wrong_password = server
        .post("/api/auth/login")
        .json(&json!({"email": user.email, "password": "wrong-password"}))
        .await;
    let unknown_email = server
        .post("/api/auth/login")
        .json(&json!({"email": "nobody@test.com", "password": TEST_PASSWORD}))
        .await;

    assert_eq!(
        assert_error_response!(wrong_password, StatusCode::UNAUTHORIZED),
        assert_error_response!(unknown_email, StatusCode::UNAUTHORIZED)
    );
}

#[tokio::test]
async fn test_me_with_bearer_token() {
    let app = TestApp::new().await;
    let server = app.server();
    let user = create_test_user(&app.state, "carol").await;
    let (name, value) = user.auth();

    let response = server.get("/api/auth/me").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["id"], user.id.as_str());
    assert_eq!(body["username"], "carol");
}

#[tokio::test]
async fn test_me_with_session_cookie() {
    let app = TestApp::new().await;
    let server = app.server();
    let user = create_test_user(&app.state, "carol").await;

    let response = server
        .get("/api/auth/me")
        .add_header(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; token={}", user.token)).unwrap(),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["email"], "carol@test.com");
}

#[tokio::test]
async fn test_me_rejects_missing_or_invalid_token() {
    let app = TestApp::new().await;
    let server = app.server();

    let missing = server.get("/api/auth/me").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);

    let (name, value) = auth_header("not.a.token");
    let invalid = server.get("/api/auth/me").add_header(name, value).await;
    assert_eq!(invalid.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_user_is_rejected() {
    let app = TestApp::new().await;
    let server = app.server();
    let user = create_test_user(&app.state, "dave").await;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&user.id)
        .execute(&app.state.db_pool)
        .await
        .unwrap();

    let (name, value) = user.auth();
    let response = server.get("/api/auth/me").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new().await;
    let server = app.server();
    let user = create_test_user(&app.state, "erin").await;
    let (name, value) = user.auth();

    let response = server.post("/api/auth/logout").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.header(SET_COOKIE).to_str().unwrap().contains("Max-Age=0"));
    assert!(response.json::<Value>()["message"].is_string());
}
