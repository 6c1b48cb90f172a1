#![allow(dead_code)]

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Start a throwaway API on an ephemeral port and return its `/api` base URL.
pub async fn spawn_api() -> String {
    let app = Router::new()
        .route("/api/users", get(|| async { Json(json!([{ "id": 1, "name": "Ada" }])) }))
        .route(
            "/api/missing",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))) }),
        )
        .route("/api/plain", get(|| async { "pong" }))
        .route("/api/headers", get(echo_headers).post(echo_headers))
        .route(
            "/api/items",
            post(|Json(body): Json<Value>| async move {
                (StatusCode::CREATED, Json(json!({ "received": body })))
            }),
        )
        .route(
            "/api/broken",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database on fire") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/api")
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let read = |name: &str| {
        headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect::<Vec<_>>()
    };
    Json(json!({
        "team": read("x-team"),
        "authorization": read("authorization"),
    }))
}

/// A base URL nothing listens on.
pub const DEAD_BASE_URL: &str = "http://127.0.0.1:1/api";
