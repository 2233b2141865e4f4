//! Shared application state for the gateway.
//!
//! [`AppState`] holds the store handle, the broadcast channel that fans
//! events out to every connected `WebSocket` client, and the connection
//! registry. It is constructed once at process start and injected via
//! Axum's `State` extractor — no ambient singletons.

use std::sync::Arc;

use guildboard_store::BoardStore;
use tokio::sync::{RwLock, broadcast};

use crate::protocol::Outbound;
use crate::registry::ConnectionRegistry;

/// Capacity of the broadcast channel for outbound events.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest event.
const BROADCAST_CAPACITY: usize = 256;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and cloned per handler invocation. All mutation
/// paths go through the store; the broadcast sender pushes the resulting
/// events to every connection task, which filters admin-only events
/// against its own connect-time flag.
pub struct AppState {
    /// The persisted board store.
    pub store: Arc<BoardStore>,
    /// Broadcast sender for outbound events.
    tx: broadcast::Sender<Outbound>,
    /// Live connection registry.
    pub registry: RwLock<ConnectionRegistry>,
}

impl AppState {
    /// Create the application state around an existing store.
    pub fn new(store: Arc<BoardStore>) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            store,
            tx,
            registry: RwLock::new(ConnectionRegistry::new()),
        }
    }

    /// Subscribe to the outbound event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Outbound> {
        self.tx.subscribe()
    }

    /// Publish an event to all connected clients.
    ///
    /// Returns the number of receivers. Zero receivers is not an error —
    /// it just means nobody is connected right now.
    pub fn broadcast(&self, outbound: Outbound) -> usize {
        self.tx.send(outbound).unwrap_or(0)
    }
}
