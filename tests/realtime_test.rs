//! Real-time broadcast integration tests
//!
//! Subscribes to the feed broadcast before each mutation and checks that
//! exactly the right event arrives with the same payload the caller got.

mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use common::*;
use feedline::backend::posts::db;
use feedline::shared::{CommentView, FeedEvent, LikeResponse, PostView};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;

async fn next_event(rx: &mut tokio::sync::broadcast::Receiver<FeedEvent>) -> FeedEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("Timed out waiting for event")
        .expect("Broadcast closed")
}

#[tokio::test]
async fn test_new_post_event_matches_response() {
    let app = TestApp::new().await;
    let server = app.server();
    let user = create_test_user(&app.state, "alice").await;
    let mut rx = app.state.feed_broadcast.subscribe();

    let (name, value) = user.auth();
    let response = server
        .post("/api/posts")
        .add_header(name, value)
        .multipart(MultipartForm::new().add_text("content", "hello"))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created = response.json::<PostView>();

    let event = next_event(&mut rx).await;
    assert_eq!(event, FeedEvent::NewPost(created));
    assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_post_liked_event_carries_full_likes() {
    let app = TestApp::new().await;
    let server = app.server();
    let user = create_test_user(&app.state, "alice").await;
    let post = db::insert_post(&app.state.db_pool, &user.summary(), "like me", "").await.unwrap();
    let mut rx = app.state.feed_broadcast.subscribe();

    let (name, value) = user.auth();
    let response = server
        .post(&format!("/api/posts/{}/like", post.id))
        .add_header(name, value)
        .await
        .json::<LikeResponse>();

    let event = next_event(&mut rx).await;
    let update = assert_matches!(event, FeedEvent::PostLiked(update) => update);
    assert_eq!(update.post_id, post.id);
    assert_eq!(update.likes, response.likes);
    assert_eq!(update.likes, vec![user.summary()]);
}

#[tokio::test]
async fn test_new_comment_event_matches_response() {
    let app = TestApp::new().await;
    let server = app.server();
    let user = create_test_user(&app.state, "alice").await;
    let post = db::insert_post(&app.state.db_pool, &user.summary(), "discuss", "").await.unwrap();
    let mut rx = app.state.feed_broadcast.subscribe();

    let (name, value) = user.auth();
    let comment = server
        .post(&format!("/api/posts/{}/comment", post.id))
        .add_header(name, value)
        .json(&json!({"content": "first"}))
        .await
        .json::<CommentView>();

    let event = next_event(&mut rx).await;
    let added = assert_matches!(event, FeedEvent::NewComment(added) => added);
    assert_eq!(added.post_id, post.id);
    assert_eq!(added.comment, comment);
}

#[tokio::test]
async fn test_failed_mutations_broadcast_nothing() {
    let app = TestApp::new().await;
    let server = app.server();
    let user = create_test_user(&app.state, "alice").await;
    let mut rx = app.state.feed_broadcast.subscribe();

    let (name, value) = user.auth();
    server
        .post("/api/posts")
        .add_header(name, value)
        .multipart(MultipartForm::new().add_text("content", "a".repeat(281)))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let (name, value) = user.auth();
    server
        .post("/api/posts/unknown/like")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .post("/api/posts")
        .multipart(MultipartForm::new().add_text("content", "anonymous"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_every_subscriber_receives_each_event() {
    let app = TestApp::new().await;
    let server = app.server();
    let user = create_test_user(&app.state, "alice").await;
    let mut first = app.state.feed_broadcast.subscribe();
    let mut second = app.state.feed_broadcast.subscribe();

    for content in ["one", "two"] {
        let (name, value) = user.auth();
        server
            .post("/api/posts")
            .add_header(name, value)
            .multipart(MultipartForm::new().add_text("content", content))
            .await
            .assert_status(StatusCode::CREATED);
    }

    for rx in [&mut first, &mut second] {
        let a = next_event(rx).await;
        let b = next_event(rx).await;
        assert_matches!(a, FeedEvent::NewPost(post) if post.content == "one");
        assert_matches!(b, FeedEvent::NewPost(post) if post.content == "two");
    }
}

#[tokio::test]
async fn test_realtime_endpoint_streams_events() {
    let app = TestApp::new().await;
    let base_url = spawn_server(&app).await;

    let response = reqwest::get(format!("{}/realtime", base_url)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response.headers()[reqwest::header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/event-stream"), "content type: {}", content_type);

    let user = create_test_user(&app.state, "alice").await;
    let post = db::insert_post(&app.state.db_pool, &user.summary(), "streamed", "").await.unwrap();
    let sent = app.state.feed_broadcast.send(FeedEvent::NewPost(post.clone())).unwrap();
    assert_eq!(sent, 1);

    let mut response = response;
    let mut raw = String::new();
    while !raw.contains("\n\n") {
        let chunk = tokio::time::timeout(Duration::from_secs(2), response.chunk())
            .await
            .expect("Timed out waiting for SSE frame")
            .unwrap()
            .expect("Stream ended early");
        raw.push_str(&String::from_utf8_lossy(&chunk));
    }

    assert_contains!(raw, "event: newPost");
    assert_contains!(raw, &post.id);
}
