//! Axum router construction for the gateway.
//!
//! Assembles the entry pages, the `WebSocket` route, and the REST query
//! surface into a single [`Router`] with CORS middleware enabled for
//! cross-origin board clients.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the board server.
///
/// The router includes:
/// - `GET /` and `GET /admin` -- the entry page (same content; admin mode
///   is a client-side decision)
/// - `GET /ws` -- the realtime board protocol
/// - `GET /api/data` -- full board snapshot
/// - `GET /api/stats` -- derived statistics
///
/// CORS is configured to allow any origin for development. In production
/// this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Entry pages
        .route("/", get(handlers::index))
        .route("/admin", get(handlers::index))
        // WebSocket
        .route("/ws", get(ws::ws_board))
        // REST API
        .route("/api/data", get(handlers::get_data))
        .route("/api/stats", get(handlers::get_stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
