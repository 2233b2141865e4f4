//! The realtime message catalog.
//!
//! Every frame in both directions is a JSON object of the form
//! `{"type": ..., "payload": ...}` (`payload` absent for messages that
//! carry none). Inbound operations are [`ClientMessage`]; everything the
//! server pushes is a [`ServerEvent`]. Broadcasts are one-way
//! notifications — there is no acknowledgment protocol, and the sender of
//! a mutation learns of it through the same broadcast every other client
//! receives.

use guildboard_types::{
    AdminStats, BoardSnapshot, ConnectionId, Marker, MarkerId, Quest, QuestId,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A client-initiated operation.
///
/// Quest and marker payloads are arbitrary JSON objects — the server copies
/// unknown fields through verbatim and performs no schema validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Post a new quest. The payload is the quest body, any shape.
    AddQuest(Map<String, Value>),
    /// Change the status of an existing quest.
    UpdateQuest {
        /// Id of the quest to update.
        id: QuestId,
        /// The new status value.
        status: String,
    },
    /// Remove a quest by id.
    DeleteQuest(QuestId),
    /// Pin a new marker. The payload is the marker body, any shape.
    AddMarker(Map<String, Value>),
    /// Remove a marker by id.
    DeleteMarker(MarkerId),
    /// Remove every quest.
    ClearAllQuests,
    /// Remove every marker.
    ClearAllMarkers,
    /// Add a category label.
    AddCategory(String),
    /// Remove a category label.
    DeleteCategory(String),
    /// Request the extended statistics (replied to the sender only).
    GetAdminStats,
    /// Liveness probe (replied to the sender only).
    Ping,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// An event pushed from the server to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Sent once, directly to a client, immediately after connect.
    InitialData(InitialData),
    /// Broadcast of the live session count on every connect/disconnect.
    UserCount(usize),
    /// A quest was added to the board.
    QuestAdded(Quest),
    /// A quest's status changed.
    QuestUpdated(Quest),
    /// A quest was removed; carries the removed id.
    QuestDeleted(QuestId),
    /// A marker was pinned to the map.
    MarkerAdded(Marker),
    /// A marker was removed; carries the removed id.
    MarkerDeleted(MarkerId),
    /// Every quest was removed.
    AllQuestsCleared,
    /// Every marker was removed.
    AllMarkersCleared,
    /// A category label was added.
    CategoryAdded(String),
    /// A category label was removed.
    CategoryDeleted(String),
    /// Privileged push delivered only to admin-classified sessions.
    AdminNotification(AdminNotification),
    /// Reply to `getAdminStats`, sender only.
    AdminStats(AdminStats),
    /// Reply to `ping`, sender only.
    Pong(Pong),
    /// Generic failure report (only the `addQuest` path emits this).
    Error(ErrorEvent),
}

/// Payload of the connect-time `initialData` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialData {
    /// Full current board contents.
    #[serde(flatten)]
    pub snapshot: BoardSnapshot,
    /// Whether this session was classified as admin at connect time.
    pub is_admin: bool,
    /// The session identifier assigned to this connection.
    pub connection_id: ConnectionId,
}

/// Discriminator for admin notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A quest was posted.
    QuestAdded,
    /// A marker was pinned.
    MarkerAdded,
}

/// Payload of the admin-only `adminNotification` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNotification {
    /// What happened.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// The quest in question, when `kind` is `quest_added`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quest: Option<Quest>,
    /// The marker in question, when `kind` is `marker_added`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

impl AdminNotification {
    /// Notification for a freshly posted quest.
    pub const fn quest_added(quest: Quest) -> Self {
        Self {
            kind: NotificationKind::QuestAdded,
            quest: Some(quest),
            marker: None,
        }
    }

    /// Notification for a freshly pinned marker.
    pub const fn marker_added(marker: Marker) -> Self {
        Self {
            kind: NotificationKind::MarkerAdded,
            quest: None,
            marker: Some(marker),
        }
    }
}

/// Payload of the `pong` reply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pong {
    /// Server wall-clock time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Payload of the generic `error` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Human-readable description of what failed.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Fan-out envelope
// ---------------------------------------------------------------------------

/// Who a broadcast event is meant for.
///
/// Delivery is filtered per connection against the admin flag decided at
/// connect time — the registry is not consulted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every connected session.
    Everyone,
    /// Only sessions classified as admin.
    Admins,
}

/// An event paired with its audience, as carried on the broadcast channel.
#[derive(Debug, Clone)]
pub struct Outbound {
    /// Who should receive the event.
    pub audience: Audience,
    /// The event itself.
    pub event: ServerEvent,
}

impl Outbound {
    /// An event for every connected session.
    pub const fn everyone(event: ServerEvent) -> Self {
        Self {
            audience: Audience::Everyone,
            event,
        }
    }

    /// An event for admin sessions only.
    pub const fn admins(event: ServerEvent) -> Self {
        Self {
            audience: Audience::Admins,
            event,
        }
    }

    /// Whether a connection with the given admin flag should see this event.
    pub const fn is_visible_to(&self, is_admin: bool) -> bool {
        match self.audience {
            Audience::Everyone => true,
            Audience::Admins => is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use serde_json::json;

    #[test]
    fn add_quest_parses_arbitrary_payloads() {
        let raw = r#"{"type":"addQuest","payload":{"title":"Fix sign","user":"alice","status":"open","anything":[1,2]}}"#;
        let message: ClientMessage = serde_json::from_str(raw).unwrap();
        match message {
            ClientMessage::AddQuest(payload) => {
                assert_eq!(payload.get("title"), Some(&json!("Fix sign")));
                assert_eq!(payload.get("anything"), Some(&json!([1, 2])));
            }
            other => panic!("parsed as {other:?}"),
        }
    }

    #[test]
    fn bare_type_messages_parse_without_payload() {
        let ping: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(ping, ClientMessage::Ping));

        let clear: ClientMessage = serde_json::from_str(r#"{"type":"clearAllQuests"}"#).unwrap();
        assert!(matches!(clear, ClientMessage::ClearAllQuests));
    }

    #[test]
    fn delete_quest_payload_is_the_bare_id() {
        let id = QuestId::new();
        let raw = format!(r#"{{"type":"deleteQuest","payload":"{id}"}}"#);
        let message: ClientMessage = serde_json::from_str(&raw).unwrap();
        assert!(matches!(message, ClientMessage::DeleteQuest(got) if got == id));
    }

    #[test]
    fn quest_added_event_nests_the_quest_under_payload() {
        let quest = Quest::from_payload(
            match json!({ "title": "Fix sign", "status": "open" }) {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        );
        let event = ServerEvent::QuestAdded(quest);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value.get("type"), Some(&json!("questAdded")));
        assert_eq!(
            value.get("payload").and_then(|p| p.get("title")),
            Some(&json!("Fix sign"))
        );
    }

    #[test]
    fn admin_notification_carries_the_snake_case_kind() {
        let marker = Marker::from_payload(Map::new());
        let event = ServerEvent::AdminNotification(AdminNotification::marker_added(marker));

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value.get("type"), Some(&json!("adminNotification")));
        assert_eq!(
            value.get("payload").and_then(|p| p.get("type")),
            Some(&json!("marker_added"))
        );
        assert!(value.get("payload").and_then(|p| p.get("quest")).is_none());
    }

    #[test]
    fn initial_data_flattens_the_snapshot() {
        let event = ServerEvent::InitialData(InitialData {
            snapshot: BoardSnapshot::default(),
            is_admin: true,
            connection_id: ConnectionId::new(),
        });

        let value = serde_json::to_value(&event).unwrap();
        let payload = value.get("payload").unwrap();
        assert!(payload.get("quests").is_some());
        assert!(payload.get("markers").is_some());
        assert!(payload.get("customCategories").is_some());
        assert_eq!(payload.get("isAdmin"), Some(&json!(true)));
        assert!(payload.get("connectionId").is_some());
    }

    #[test]
    fn audience_filtering_gates_admin_events() {
        let broadcast = Outbound::everyone(ServerEvent::UserCount(3));
        assert!(broadcast.is_visible_to(false));
        assert!(broadcast.is_visible_to(true));

        let privileged = Outbound::admins(ServerEvent::AllQuestsCleared);
        assert!(!privileged.is_visible_to(false));
        assert!(privileged.is_visible_to(true));
    }
}
