//! REST endpoint handlers: the query surface plus the entry page.
//!
//! Both read endpoints are stateless snapshots of the store's current
//! in-memory state — no caching layer, no pagination.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Entry page |
//! | `GET` | `/admin` | The same entry page (the client decides admin mode) |
//! | `GET` | `/api/data` | Full board snapshot |
//! | `GET` | `/api/stats` | Derived statistics |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / and GET /admin -- entry page
// ---------------------------------------------------------------------------

/// Serve the board entry page.
///
/// `/` and `/admin` return the same page: admin mode is a client-side
/// decision made from the browser's own URL, the server gates nothing.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.store.stats().await;
    let live = state.registry.read().await.len();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Guildboard</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Guildboard</h1>
    <p class="subtitle">Realtime quest board &amp; map markers</p>

    <div>
        <div class="metric">
            <div class="label">Quests</div>
            <div class="value">{total_quests}</div>
        </div>
        <div class="metric">
            <div class="label">Open</div>
            <div class="value">{quests_open}</div>
        </div>
        <div class="metric">
            <div class="label">Markers</div>
            <div class="value">{total_markers}</div>
        </div>
        <div class="metric">
            <div class="label">Categories</div>
            <div class="value">{total_categories}</div>
        </div>
        <div class="metric">
            <div class="label">Online</div>
            <div class="value">{live}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/data">/api/data</a> -- Full board snapshot</li>
        <li><a href="/api/stats">/api/stats</a> -- Derived statistics</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li style="list-style:none;"><code>ws://host:port/ws</code> -- Realtime board protocol</li>
    </ul>
</body>
</html>"#,
        total_quests = stats.total_quests,
        quests_open = stats.quests_open,
        total_markers = stats.total_markers,
        total_categories = stats.total_categories,
    ))
}

// ---------------------------------------------------------------------------
// GET /api/data -- full board snapshot
// ---------------------------------------------------------------------------

/// Return the full current board contents: quests, markers, categories.
pub async fn get_data(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.store.snapshot().await;
    Ok(Json(serde_json::to_value(snapshot)?))
}

// ---------------------------------------------------------------------------
// GET /api/stats -- derived statistics
// ---------------------------------------------------------------------------

/// Return the derived statistics, computed on demand.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.store.stats().await;
    Ok(Json(serde_json::to_value(stats)?))
}
