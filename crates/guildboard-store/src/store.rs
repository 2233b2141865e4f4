//! The persisted board store.
//!
//! [`BoardStore`] owns the canonical in-memory collections (quests,
//! markers, categories) plus the analytics counters, all behind a single
//! [`RwLock`]. Mutations are synchronous with respect to memory and only
//! *schedule* durability: each one signals the persistence task, which
//! debounces bursts into a single file write (see [`crate::persist`]).
//!
//! Not-found conditions are signals, not errors: `update`/`delete` on an
//! unknown id return [`None`], category operations report whether anything
//! changed. Callers treat these as no-ops and skip the broadcast.

use std::collections::BTreeSet;

use chrono::Local;
use guildboard_types::{
    Analytics, BoardSnapshot, BoardStats, Marker, MarkerId, Quest, QuestId, STATUS_OPEN,
    STATUS_TAKEN,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::{Notify, RwLock};

/// Category labels every fresh board starts with.
pub fn default_categories() -> Vec<String> {
    vec![
        String::from("design"),
        String::from("programming"),
        String::from("marketing"),
        String::from("writing"),
        String::from("other"),
    ]
}

/// The durability document: the entire board state as one JSON object.
///
/// This is both the in-memory representation and the on-disk format — every
/// save rewrites the whole document, never a diff. Loading is a forgiving
/// partial merge: any absent top-level key falls back to its default and
/// unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    /// Quests, most recent first.
    #[serde(default)]
    pub quests: Vec<Quest>,
    /// Markers, most recent first.
    #[serde(default)]
    pub markers: Vec<Marker>,
    /// Category labels (set-of-string semantics, case-sensitive).
    #[serde(default = "default_categories")]
    pub custom_categories: Vec<String>,
    /// Process-wide counters.
    #[serde(default)]
    pub analytics: Analytics,
}

impl Default for BoardDocument {
    fn default() -> Self {
        Self {
            quests: Vec::new(),
            markers: Vec::new(),
            custom_categories: default_categories(),
            analytics: Analytics::default(),
        }
    }
}

/// The persisted in-memory store shared by the gateway and the query
/// surface.
///
/// Wrapped in [`Arc`](std::sync::Arc) and constructed once at process
/// start; there are no ambient singletons. The dirty [`Notify`] is the
/// seam to the persistence task: every mutation pokes it, the task
/// debounces.
#[derive(Debug)]
pub struct BoardStore {
    /// The canonical board state.
    data: RwLock<BoardDocument>,
    /// Signalled on every mutation; consumed by the persistence task.
    dirty: Notify,
}

impl BoardStore {
    /// Create an empty store seeded with the default categories.
    pub fn new() -> Self {
        Self::from_document(BoardDocument::default())
    }

    /// Create a store from a previously loaded durability document.
    pub fn from_document(document: BoardDocument) -> Self {
        Self {
            data: RwLock::new(document),
            dirty: Notify::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Quests
    // -----------------------------------------------------------------------

    /// Add a quest from an arbitrary client payload.
    ///
    /// Assigns id and creation timestamp, inserts at the head of the
    /// sequence (most recent first), and returns the stored quest. No
    /// payload validation of any kind.
    pub async fn add_quest(&self, payload: Map<String, Value>) -> Quest {
        let quest = Quest::from_payload(payload);
        {
            let mut data = self.data.write().await;
            data.quests.insert(0, quest.clone());
        }
        self.mark_dirty();
        quest
    }

    /// Merge a new status into the quest with the given id.
    ///
    /// Returns the updated quest, or [`None`] if no quest has that id
    /// (a no-op: nothing is written and nothing should be broadcast).
    pub async fn update_quest(&self, id: QuestId, status: String) -> Option<Quest> {
        let updated = {
            let mut data = self.data.write().await;
            let quest = data.quests.iter_mut().find(|q| q.id == id)?;
            quest.apply_status(status);
            quest.clone()
        };
        self.mark_dirty();
        Some(updated)
    }

    /// Remove the quest with the given id.
    ///
    /// Returns the removed quest, or [`None`] if no quest has that id.
    /// The remainder of the sequence keeps its order.
    pub async fn delete_quest(&self, id: QuestId) -> Option<Quest> {
        let removed = {
            let mut data = self.data.write().await;
            let index = data.quests.iter().position(|q| q.id == id)?;
            data.quests.remove(index)
        };
        self.mark_dirty();
        Some(removed)
    }

    /// Replace the quest sequence with an empty one. Always succeeds.
    pub async fn clear_quests(&self) {
        {
            let mut data = self.data.write().await;
            data.quests.clear();
        }
        self.mark_dirty();
    }

    // -----------------------------------------------------------------------
    // Markers
    // -----------------------------------------------------------------------

    /// Add a marker from an arbitrary client payload.
    ///
    /// Same contract shape as [`add_quest`](Self::add_quest); markers have
    /// no status-update equivalent.
    pub async fn add_marker(&self, payload: Map<String, Value>) -> Marker {
        let marker = Marker::from_payload(payload);
        {
            let mut data = self.data.write().await;
            data.markers.insert(0, marker.clone());
        }
        self.mark_dirty();
        marker
    }

    /// Remove the marker with the given id.
    ///
    /// Returns the removed marker, or [`None`] if no marker has that id.
    pub async fn delete_marker(&self, id: MarkerId) -> Option<Marker> {
        let removed = {
            let mut data = self.data.write().await;
            let index = data.markers.iter().position(|m| m.id == id)?;
            data.markers.remove(index)
        };
        self.mark_dirty();
        Some(removed)
    }

    /// Replace the marker sequence with an empty one. Always succeeds.
    pub async fn clear_markers(&self) {
        {
            let mut data = self.data.write().await;
            data.markers.clear();
        }
        self.mark_dirty();
    }

    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    /// Add a category label.
    ///
    /// Returns `true` if the label was appended, `false` if it already
    /// existed (case-sensitive exact match; the set is left untouched).
    pub async fn add_category(&self, name: String) -> bool {
        let added = {
            let mut data = self.data.write().await;
            if data.custom_categories.iter().any(|c| *c == name) {
                false
            } else {
                data.custom_categories.push(name);
                true
            }
        };
        if added {
            self.mark_dirty();
        }
        added
    }

    /// Remove a category label by exact match.
    ///
    /// Returns `true` if the label was removed, `false` if it was not
    /// present. Quests referencing the name are deliberately untouched —
    /// there is no cascade and no validation.
    pub async fn delete_category(&self, name: &str) -> bool {
        let removed = {
            let mut data = self.data.write().await;
            match data.custom_categories.iter().position(|c| c == name) {
                Some(index) => {
                    data.custom_categories.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            self.mark_dirty();
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Analytics
    // -----------------------------------------------------------------------

    /// Record one client connection and return the new cumulative total.
    pub async fn record_connection(&self) -> u64 {
        let total = {
            let mut data = self.data.write().await;
            data.analytics.total_connections = data.analytics.total_connections.saturating_add(1);
            data.analytics.total_connections
        };
        self.mark_dirty();
        total
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The three primary collections as a snapshot clone.
    pub async fn snapshot(&self) -> BoardSnapshot {
        let data = self.data.read().await;
        BoardSnapshot {
            quests: data.quests.clone(),
            markers: data.markers.clone(),
            custom_categories: data.custom_categories.clone(),
        }
    }

    /// Derived statistics, computed on demand — never cached.
    pub async fn stats(&self) -> BoardStats {
        let data = self.data.read().await;
        let today = Local::now().date_naive();

        let unique_users: BTreeSet<&str> = data
            .quests
            .iter()
            .filter_map(Quest::user)
            .filter(|user| !user.is_empty())
            .collect();

        BoardStats {
            total_quests: data.quests.len(),
            total_markers: data.markers.len(),
            quests_open: count_status(&data.quests, STATUS_OPEN),
            quests_taken: count_status(&data.quests, STATUS_TAKEN),
            unique_users: unique_users.len(),
            markers_today: data
                .markers
                .iter()
                .filter(|m| m.created_at.with_timezone(&Local).date_naive() == today)
                .count(),
            total_categories: data.custom_categories.len(),
            last_updated: data.analytics.last_updated,
        }
    }

    // -----------------------------------------------------------------------
    // Persistence seam
    // -----------------------------------------------------------------------

    /// Signal the persistence task that the board changed.
    pub(crate) fn mark_dirty(&self) {
        self.dirty.notify_one();
    }

    /// Wait until the board changes.
    ///
    /// At most one pending signal is held, so bursts of mutations coalesce
    /// naturally — exactly what the debounce wants.
    pub(crate) async fn changed(&self) {
        self.dirty.notified().await;
    }

    /// Stamp the persistence timestamp and clone the full document.
    ///
    /// Called by the persistence task immediately before a write so the
    /// stamp rides inside the same write it describes.
    pub(crate) async fn checkpoint(&self) -> BoardDocument {
        let mut data = self.data.write().await;
        data.analytics.last_updated = Some(chrono::Utc::now());
        data.clone()
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Count quests whose status is exactly `status`.
fn count_status(quests: &[Quest], status: &str) -> usize {
    quests
        .iter()
        .filter(|q| q.status.as_deref() == Some(status))
        .count()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[tokio::test]
    async fn quests_insert_at_head_with_unique_ids() {
        let store = BoardStore::new();
        for title in ["first", "second", "third"] {
            store.add_quest(payload(json!({ "title": title }))).await;
        }

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.quests.len(), 3);

        let titles: Vec<&str> = snapshot
            .quests
            .iter()
            .filter_map(|q| q.extra.get("title").and_then(Value::as_str))
            .collect();
        assert_eq!(titles, ["third", "second", "first"]);

        let ids: BTreeSet<QuestId> = snapshot.quests.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn update_quest_merges_status_only() {
        let store = BoardStore::new();
        let quest = store
            .add_quest(payload(json!({ "title": "Fix sign", "status": "open" })))
            .await;

        let updated = store
            .update_quest(quest.id, String::from("taken"))
            .await
            .unwrap();

        assert_eq!(updated.status.as_deref(), Some("taken"));
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.id, quest.id);
        assert_eq!(updated.created_at, quest.created_at);
        assert_eq!(updated.extra.get("title"), quest.extra.get("title"));
    }

    #[tokio::test]
    async fn update_quest_unknown_id_is_a_noop() {
        let store = BoardStore::new();
        store.add_quest(payload(json!({ "status": "open" }))).await;

        let result = store
            .update_quest(QuestId::new(), String::from("taken"))
            .await;
        assert!(result.is_none());

        let snapshot = store.snapshot().await;
        let first = snapshot.quests.first().unwrap();
        assert_eq!(first.status.as_deref(), Some("open"));
        assert!(first.updated_at.is_none());
    }

    #[tokio::test]
    async fn delete_quest_is_idempotent_in_effect() {
        let store = BoardStore::new();
        let quest = store.add_quest(payload(json!({ "title": "once" }))).await;

        let removed = store.delete_quest(quest.id).await;
        assert_eq!(removed.map(|q| q.id), Some(quest.id));

        let again = store.delete_quest(quest.id).await;
        assert!(again.is_none());
        assert!(store.snapshot().await.quests.is_empty());
    }

    #[tokio::test]
    async fn delete_quest_keeps_remainder_order() {
        let store = BoardStore::new();
        let _a = store.add_quest(payload(json!({ "title": "a" }))).await;
        let b = store.add_quest(payload(json!({ "title": "b" }))).await;
        let _c = store.add_quest(payload(json!({ "title": "c" }))).await;

        store.delete_quest(b.id).await;

        let snapshot = store.snapshot().await;
        let titles: Vec<&str> = snapshot
            .quests
            .iter()
            .filter_map(|q| q.extra.get("title").and_then(Value::as_str))
            .collect();
        assert_eq!(titles, ["c", "a"]);
    }

    #[tokio::test]
    async fn add_category_rejects_duplicates() {
        let store = BoardStore::new();
        assert!(!store.add_category(String::from("design")).await);
        assert!(store.add_category(String::from("alchemy")).await);
        assert!(!store.add_category(String::from("alchemy")).await);

        let categories = store.snapshot().await.custom_categories;
        assert_eq!(
            categories,
            ["design", "programming", "marketing", "writing", "other", "alchemy"]
        );
    }

    #[tokio::test]
    async fn delete_category_reports_not_found() {
        let store = BoardStore::new();
        assert!(store.delete_category("writing").await);
        assert!(!store.delete_category("writing").await);
        assert_eq!(store.snapshot().await.custom_categories.len(), 4);
    }

    #[tokio::test]
    async fn stats_count_statuses_and_users() {
        let store = BoardStore::new();
        store
            .add_quest(payload(json!({ "status": "open", "user": "alice" })))
            .await;
        store
            .add_quest(payload(json!({ "status": "open", "user": "alice" })))
            .await;
        store
            .add_quest(payload(json!({ "status": "taken", "user": "bob" })))
            .await;
        store.add_quest(payload(json!({ "status": "weird" }))).await;
        store.add_marker(payload(json!({ "title": "well" }))).await;

        let stats = store.stats().await;
        assert_eq!(stats.total_quests, 4);
        assert_eq!(stats.total_markers, 1);
        assert_eq!(stats.quests_open, 2);
        assert_eq!(stats.quests_taken, 1);
        assert_eq!(stats.unique_users, 2);
        assert_eq!(stats.markers_today, 1);
        assert_eq!(stats.total_categories, 5);
    }

    #[tokio::test]
    async fn markers_from_other_days_are_not_counted_today() {
        let store = BoardStore::new();
        let mut marker = Marker::from_payload(payload(json!({})));
        marker.created_at = chrono::Utc::now() - chrono::Duration::days(2);
        store.set_markers(vec![marker]).await;

        assert_eq!(store.stats().await.markers_today, 0);
    }

    #[tokio::test]
    async fn clear_operations_empty_their_sequences() {
        let store = BoardStore::new();
        store.add_quest(payload(json!({}))).await;
        store.add_marker(payload(json!({}))).await;

        store.clear_quests().await;
        store.clear_markers().await;

        let snapshot = store.snapshot().await;
        assert!(snapshot.quests.is_empty());
        assert!(snapshot.markers.is_empty());
        // Categories are untouched by the clear operations.
        assert_eq!(snapshot.custom_categories.len(), 5);
    }

    #[tokio::test]
    async fn record_connection_accumulates() {
        let store = BoardStore::new();
        assert_eq!(store.record_connection().await, 1);
        assert_eq!(store.record_connection().await, 2);
    }

    impl BoardStore {
        /// Overwrite the marker sequence directly, bypassing id assignment.
        async fn set_markers(&self, markers: Vec<Marker>) {
            self.data.write().await.markers = markers;
        }
    }
}
