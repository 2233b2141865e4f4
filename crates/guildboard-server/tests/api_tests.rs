//! Integration tests for the REST query surface.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use guildboard_server::build_router;
use guildboard_server::state::AppState;
use guildboard_store::BoardStore;
use serde_json::{Map, Value, json};
use tower::ServiceExt;

fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

async fn make_test_state() -> Arc<AppState> {
    let store = Arc::new(BoardStore::new());
    store
        .add_quest(payload(json!({
            "title": "Fix the tavern sign",
            "user": "alice",
            "status": "open",
        })))
        .await;
    store
        .add_quest(payload(json!({
            "title": "Escort the caravan",
            "user": "bob",
            "status": "taken",
        })))
        .await;
    store
        .add_marker(payload(json!({
            "title": "Hidden well",
            "lat": 48.85,
            "lng": 2.35,
        })))
        .await;

    Arc::new(AppState::new(store))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Guildboard"));
    assert!(html.contains("/api/data"));
}

#[tokio::test]
async fn test_admin_serves_the_same_entry_page() {
    let state = make_test_state().await;
    let router = build_router(Arc::clone(&state));

    let root = router
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let admin = router
        .oneshot(Request::get("/admin").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(root.status(), StatusCode::OK);
    assert_eq!(admin.status(), StatusCode::OK);

    let root_bytes = axum::body::to_bytes(root.into_body(), usize::MAX)
        .await
        .unwrap();
    let admin_bytes = axum::body::to_bytes(admin.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(root_bytes, admin_bytes);
}

#[tokio::test]
async fn test_api_data_returns_the_snapshot() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/data").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;

    let quests = body.get("quests").and_then(Value::as_array).unwrap();
    assert_eq!(quests.len(), 2);
    // Most recent first.
    assert_eq!(
        quests.first().and_then(|q| q.get("title")),
        Some(&json!("Escort the caravan"))
    );
    assert!(quests.first().and_then(|q| q.get("id")).is_some());
    assert!(quests.first().and_then(|q| q.get("createdAt")).is_some());

    let markers = body.get("markers").and_then(Value::as_array).unwrap();
    assert_eq!(markers.len(), 1);
    assert_eq!(
        markers.first().and_then(|m| m.get("lat")),
        Some(&json!(48.85))
    );

    let categories = body.get("customCategories").and_then(Value::as_array).unwrap();
    assert_eq!(categories.len(), 5);
    assert!(categories.contains(&json!("design")));
}

#[tokio::test]
async fn test_api_stats_returns_derived_counts() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;

    assert_eq!(body.get("totalQuests"), Some(&json!(2)));
    assert_eq!(body.get("totalMarkers"), Some(&json!(1)));
    assert_eq!(body.get("questsOpen"), Some(&json!(1)));
    assert_eq!(body.get("questsTaken"), Some(&json!(1)));
    assert_eq!(body.get("uniqueUsers"), Some(&json!(2)));
    assert_eq!(body.get("markersToday"), Some(&json!(1)));
    assert_eq!(body.get("totalCategories"), Some(&json!(5)));
    // No persistence has run in this test.
    assert_eq!(body.get("lastUpdated"), Some(&Value::Null));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
