//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use api_lib::{router, web::AppState};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use flashcards_core::InMemoryDatabase;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

pub fn app() -> Router {
    let db = Arc::new(InMemoryDatabase::new());
    router(Arc::new(AppState::new(db, TEST_SECRET)))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(app, request).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse JSON")
    };
    (status, json)
}

/// Registers `email` and returns a fresh session token for it.
pub async fn signed_in(app: &Router, email: &str) -> String {
    let credentials = serde_json::json!({ "email": email, "password": "correct horse" });
    let (status, _) = send(app, Method::POST, "/api/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, Method::POST, "/api/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token").to_string()
}

pub async fn create_deck(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/decks",
        Some(token),
        Some(serde_json::json!({ "name": name, "description": "test deck" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().expect("deck id").to_string()
}

pub async fn create_card(app: &Router, token: &str, deck_id: &str, question: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        &format!("/api/decks/{deck_id}/cards"),
        Some(token),
        Some(serde_json::json!({ "question": question, "answer": "answer" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().expect("card id").to_string()
}
