//! `WebSocket` gateway: the realtime entry point for every client.
//!
//! Clients connect to `GET /ws`. On connect they immediately receive
//! `initialData` (full board snapshot, their admin classification, and
//! their session id), and everyone — the new client included — receives
//! the updated `userCount`. After that the connection task runs a select
//! loop: outbound events arrive on the broadcast channel and are forwarded
//! (admin-only events filtered against this connection's flag), inbound
//! frames are parsed and dispatched against the store.
//!
//! Handler failures are contained per message: a bad frame is logged and
//! dropped, and only the `addQuest` path reports an `error` event back to
//! the sender. If a client falls behind the broadcast channel, lagged
//! events are skipped and it resumes from the newest one.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::http::header::{REFERER, USER_AGENT};
use axum::response::IntoResponse;
use chrono::Utc;
use guildboard_types::ConnectionId;
use serde_json::Value;
use tracing::{debug, warn};

use crate::protocol::{
    AdminNotification, ClientMessage, ErrorEvent, InitialData, Outbound, Pong, ServerEvent,
};
use crate::registry::is_admin_referrer;
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection.
///
/// Admin classification happens here, once, from the `Referer` header —
/// it is never re-evaluated for the lifetime of the connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_board(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let is_admin = headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(is_admin_referrer);
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    ws.on_upgrade(move |socket| handle_ws(socket, state, is_admin, user_agent))
}

/// Handle the full connection lifecycle: register, greet, pump, unregister.
async fn handle_ws(
    mut socket: WebSocket,
    state: Arc<AppState>,
    is_admin: bool,
    user_agent: Option<String>,
) {
    let connection_id = ConnectionId::new();

    // Subscribe before announcing so this client sees its own userCount.
    let mut rx = state.subscribe();

    let live = {
        let mut registry = state.registry.write().await;
        registry.add(connection_id, user_agent, is_admin);
        registry.len()
    };
    let total = state.store.record_connection().await;
    debug!(%connection_id, is_admin, live, total, "Client connected");

    let snapshot = state.store.snapshot().await;
    let hello = ServerEvent::InitialData(InitialData {
        snapshot,
        is_admin,
        connection_id,
    });
    if send_event(&mut socket, &hello).await.is_err() {
        disconnect(&state, connection_id).await;
        return;
    }
    state.broadcast(Outbound::everyone(ServerEvent::UserCount(live)));

    loop {
        tokio::select! {
            // An event fanned out by some handler (possibly our own).
            result = rx.recv() => {
                match result {
                    Ok(outbound) => {
                        if !outbound.is_visible_to(is_admin) {
                            continue;
                        }
                        if send_event(&mut socket, &outbound.event).await.is_err() {
                            debug!(%connection_id, "Client disconnected (send failed)");
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!(%connection_id, skipped = n, "Client lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!(%connection_id, "Broadcast channel closed, shutting down");
                        break;
                    }
                }
            }
            // A frame from the client.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = dispatch(&state, text.as_str()).await
                            && send_event(&mut socket, &reply).await.is_err()
                        {
                            debug!(%connection_id, "Client disconnected (reply failed)");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(%connection_id, "Client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(%connection_id, "Client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(%connection_id, "WebSocket error: {e}");
                        break;
                    }
                    _ => {
                        // Binary frames carry nothing in this protocol.
                    }
                }
            }
        }
    }

    disconnect(&state, connection_id).await;
}

/// Unregister a session and tell everyone the new live count.
async fn disconnect(state: &AppState, connection_id: ConnectionId) {
    let live = {
        let mut registry = state.registry.write().await;
        registry.remove(connection_id);
        registry.len()
    };
    state.broadcast(Outbound::everyone(ServerEvent::UserCount(live)));
    debug!(%connection_id, live, "Client unregistered");
}

/// Serialize and send one event on the socket.
async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            // Nothing sensible to send; log and keep the connection.
            warn!("Failed to serialize outbound event: {e}");
            Ok(())
        }
    }
}

/// Parse and execute one inbound frame.
///
/// Returns a direct reply for the sender only (`pong`, `adminStats`, or an
/// `error` for a failed `addQuest`); every other effect goes out through
/// the broadcast channel. Malformed frames are logged and dropped — except
/// that a malformed `addQuest` still earns the sender a generic `error`
/// event, the one path the protocol reports failure on.
pub(crate) async fn dispatch(state: &AppState, raw: &str) -> Option<ServerEvent> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Unparseable client frame: {e}");
            return None;
        }
    };
    let is_add_quest = value.get("type").and_then(Value::as_str) == Some("addQuest");

    match serde_json::from_value::<ClientMessage>(value) {
        Ok(message) => handle_message(state, message).await,
        Err(e) => {
            warn!("Malformed client message: {e}");
            is_add_quest.then(|| {
                ServerEvent::Error(ErrorEvent {
                    message: String::from("Failed to add quest"),
                })
            })
        }
    }
}

/// Apply one operation to the store and broadcast the outcome.
///
/// Not-found signals from the store mean no broadcast happens at all — the
/// operation fails silently from every client's perspective.
async fn handle_message(state: &AppState, message: ClientMessage) -> Option<ServerEvent> {
    match message {
        ClientMessage::AddQuest(payload) => {
            let quest = state.store.add_quest(payload).await;
            state.broadcast(Outbound::everyone(ServerEvent::QuestAdded(quest.clone())));
            state.broadcast(Outbound::admins(ServerEvent::AdminNotification(
                AdminNotification::quest_added(quest),
            )));
            None
        }
        ClientMessage::UpdateQuest { id, status } => {
            if let Some(quest) = state.store.update_quest(id, status).await {
                state.broadcast(Outbound::everyone(ServerEvent::QuestUpdated(quest)));
            }
            None
        }
        ClientMessage::DeleteQuest(id) => {
            if state.store.delete_quest(id).await.is_some() {
                state.broadcast(Outbound::everyone(ServerEvent::QuestDeleted(id)));
            }
            None
        }
        ClientMessage::AddMarker(payload) => {
            let marker = state.store.add_marker(payload).await;
            state.broadcast(Outbound::everyone(ServerEvent::MarkerAdded(marker.clone())));
            state.broadcast(Outbound::admins(ServerEvent::AdminNotification(
                AdminNotification::marker_added(marker),
            )));
            None
        }
        ClientMessage::DeleteMarker(id) => {
            if state.store.delete_marker(id).await.is_some() {
                state.broadcast(Outbound::everyone(ServerEvent::MarkerDeleted(id)));
            }
            None
        }
        ClientMessage::ClearAllQuests => {
            state.store.clear_quests().await;
            state.broadcast(Outbound::everyone(ServerEvent::AllQuestsCleared));
            None
        }
        ClientMessage::ClearAllMarkers => {
            state.store.clear_markers().await;
            state.broadcast(Outbound::everyone(ServerEvent::AllMarkersCleared));
            None
        }
        ClientMessage::AddCategory(name) => {
            if state.store.add_category(name.clone()).await {
                state.broadcast(Outbound::everyone(ServerEvent::CategoryAdded(name)));
            }
            None
        }
        ClientMessage::DeleteCategory(name) => {
            if state.store.delete_category(&name).await {
                state.broadcast(Outbound::everyone(ServerEvent::CategoryDeleted(name)));
            }
            None
        }
        ClientMessage::GetAdminStats => {
            let stats = state.store.stats().await;
            let registry = state.registry.read().await;
            Some(ServerEvent::AdminStats(guildboard_types::AdminStats {
                stats,
                active_connections: registry.len(),
                admin_connections: registry.admin_count(),
            }))
        }
        ClientMessage::Ping => Some(ServerEvent::Pong(Pong {
            timestamp: Utc::now().timestamp_millis(),
        })),
    }
}
