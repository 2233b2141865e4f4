//! Realtime gateway and query surface for the Guildboard.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws`) implementing the realtime board
//!   protocol: clients post quests and markers, every connected client
//!   sees the resulting events via [`tokio::sync::broadcast`] fan-out,
//!   and admin-classified sessions additionally receive
//!   `adminNotification` pushes
//! - **REST endpoints** for reading the current board (`/api/data`) and
//!   derived statistics (`/api/stats`)
//! - **Entry pages** (`GET /` and `GET /admin`, identical content)
//!
//! # Architecture
//!
//! All state lives in a [`BoardStore`](guildboard_store::BoardStore)
//! shared through [`AppState`]. A handler applies a mutation and
//! broadcasts the outcome before yielding, so clients never observe a
//! half-constructed record. Each connection task filters admin-only
//! events against the admin flag decided once at connect time from the
//! `Referer` header.

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use protocol::{ClientMessage, Outbound, ServerEvent};
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
