//! Live connection tracking.
//!
//! The registry knows which sessions are currently connected and which of
//! them were classified as admin. Entries exist only for the lifetime of a
//! connection — nothing here is persisted. Admin classification happens
//! exactly once, at connect time, from the referring page address; it is a
//! spoofable heuristic and deliberately not a security boundary.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use guildboard_types::ConnectionId;

/// Metadata recorded for one live session.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// When the session connected.
    pub connected_at: DateTime<Utc>,
    /// The client-supplied `User-Agent` header, if any.
    pub user_agent: Option<String>,
}

/// Registry of currently connected sessions.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// Live sessions keyed by connection id.
    sessions: HashMap<ConnectionId, SessionInfo>,
    /// Subset of live sessions classified as admin.
    admins: HashSet<ConnectionId>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly connected session.
    pub fn add(&mut self, id: ConnectionId, user_agent: Option<String>, is_admin: bool) {
        self.sessions.insert(
            id,
            SessionInfo {
                connected_at: Utc::now(),
                user_agent,
            },
        );
        if is_admin {
            self.admins.insert(id);
        }
    }

    /// Remove a session on disconnect.
    pub fn remove(&mut self, id: ConnectionId) {
        self.sessions.remove(&id);
        self.admins.remove(&id);
    }

    /// Number of currently connected sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are connected.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Number of currently connected admin sessions.
    pub fn admin_count(&self) -> usize {
        self.admins.len()
    }

    /// Whether the given session was classified as admin.
    pub fn is_admin(&self, id: ConnectionId) -> bool {
        self.admins.contains(&id)
    }
}

/// Decide whether a referring page address marks the session as admin.
///
/// True when the referrer mentions an admin path, query flag, or fragment.
/// Evaluated once at connect time, never re-checked.
pub fn is_admin_referrer(referrer: &str) -> bool {
    referrer.contains("/admin") || referrer.contains("admin=true") || referrer.contains("#admin")
}
