//! Core entity structs for the Guildboard.
//!
//! Quests and markers follow the same shape: a small typed core (identity
//! plus timestamps, plus an interpreted `status` for quests only) and an
//! open map of caller-supplied extension fields carried verbatim. The
//! extension map is flattened on the wire and in the durability file, so a
//! stored quest looks exactly like the payload the client posted plus the
//! fields the server assigned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{MarkerId, QuestId};

/// Quest status value counted as "open" by the statistics.
pub const STATUS_OPEN: &str = "open";

/// Quest status value counted as "taken" by the statistics.
pub const STATUS_TAKEN: &str = "taken";

// ---------------------------------------------------------------------------
// Quest
// ---------------------------------------------------------------------------

/// A task listing posted to the board.
///
/// `title`, `user`, and any other caller-supplied fields live in the
/// flattened [`extra`](Self::extra) map; the server interprets none of them
/// except `status`. The id and `created_at` are assigned at creation and
/// never change; `updated_at` is absent until the first status update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    /// Unique, stable identifier assigned at creation.
    pub id: QuestId,
    /// Free-form status string. Known values are `open` and `taken`;
    /// anything else is tolerated and simply not counted by the stats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent status update, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Caller-supplied extension fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quest {
    /// Build a quest from an arbitrary client payload.
    ///
    /// Assigns a fresh id and creation timestamp. Reserved keys (`id`,
    /// `createdAt`, `updatedAt`) supplied by the caller are discarded so
    /// they cannot shadow the server-assigned values; a string `status` is
    /// lifted into the typed field (a non-string `status` is discarded).
    /// Everything else passes through untouched.
    pub fn from_payload(mut payload: Map<String, Value>) -> Self {
        payload.remove("id");
        payload.remove("createdAt");
        payload.remove("updatedAt");
        let status = match payload.remove("status") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };

        Self {
            id: QuestId::new(),
            status,
            created_at: Utc::now(),
            updated_at: None,
            extra: payload,
        }
    }

    /// Merge a new status into the quest and stamp `updated_at`.
    ///
    /// Only the status and the update timestamp change; identity, creation
    /// time, and all extension fields are untouched.
    pub fn apply_status(&mut self, status: String) {
        self.status = Some(status);
        self.updated_at = Some(Utc::now());
    }

    /// The `user` extension field as a string, if the client supplied one.
    pub fn user(&self) -> Option<&str> {
        self.extra.get("user").and_then(Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Marker
// ---------------------------------------------------------------------------

/// A geotagged note pinned to the map.
///
/// Markers have no interpreted status: everything beyond identity and the
/// creation timestamp is an opaque extension field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Unique, stable identifier assigned at creation.
    pub id: MarkerId,
    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
    /// Caller-supplied extension fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Marker {
    /// Build a marker from an arbitrary client payload.
    ///
    /// Assigns a fresh id and creation timestamp; reserved keys (`id`,
    /// `createdAt`) supplied by the caller are discarded.
    pub fn from_payload(mut payload: Map<String, Value>) -> Self {
        payload.remove("id");
        payload.remove("createdAt");

        Self {
            id: MarkerId::new(),
            created_at: Utc::now(),
            extra: payload,
        }
    }
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// Process-wide counters carried in the durability file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Cumulative connection count since the durability file was created.
    #[serde(default)]
    pub total_connections: u64,
    /// Timestamp of the last persistence write.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Snapshot and statistics
// ---------------------------------------------------------------------------

/// The full current contents of the board at one instant.
///
/// This is the shape served by `GET /api/data` and pushed to every client
/// inside `initialData` on connect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    /// Quests, most recent first.
    pub quests: Vec<Quest>,
    /// Markers, most recent first.
    pub markers: Vec<Marker>,
    /// Category labels, seed defaults plus client additions.
    pub custom_categories: Vec<String>,
}

/// Derived statistics, computed on demand from the current board state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    /// Total number of quests on the board.
    pub total_quests: usize,
    /// Total number of markers on the map.
    pub total_markers: usize,
    /// Quests whose status is exactly `open`.
    pub quests_open: usize,
    /// Quests whose status is exactly `taken`.
    pub quests_taken: usize,
    /// Distinct non-empty `user` values across all quests.
    pub unique_users: usize,
    /// Markers created on the current calendar day (local process time).
    pub markers_today: usize,
    /// Number of category labels.
    pub total_categories: usize,
    /// Timestamp of the last persistence write, if one has happened.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Statistics extended with live gateway counts, served to a single client
/// in reply to `getAdminStats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    /// The board statistics at the time of the request.
    #[serde(flatten)]
    pub stats: BoardStats,
    /// Number of currently connected sessions.
    pub active_connections: usize,
    /// Number of currently connected sessions classified as admin.
    pub admin_connections: usize,
}
