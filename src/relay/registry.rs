//! Live connection registry with room-scoped fan-out

use std::collections::{HashMap, HashSet};

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

pub type ConnectionId = Uuid;

struct Connection {
    sender: UnboundedSender<String>,
    room: Option<String>,
}

#[derive(Default)]
struct RegistryState {
    connections: HashMap<ConnectionId, Connection>,
    /// room tag -> connections currently tagged with it
    rooms: HashMap<String, HashSet<ConnectionId>>,
}

impl RegistryState {
    fn untag(&mut self, id: ConnectionId, room: &str) {
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(&id);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }
    }
}

/// Result of tagging a connection with a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Tagged; carries the room the connection was moved out of, if any
    Joined { previous: Option<String> },
    UnknownConnection,
}

/// Tracks live connections and the room each one is tagged with
///
/// A payload broadcast to room R reaches every other live connection tagged
/// R and nothing else.
#[derive(Default)]
pub struct ConnectionRegistry {
    state: RwLock<RegistryState>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an untagged connection
    pub async fn register(&self, id: ConnectionId, sender: UnboundedSender<String>) {
        let mut state = self.state.write().await;
        if let Some(old) = state.connections.insert(id, Connection { sender, room: None }) {
            if let Some(room) = old.room {
                state.untag(id, &room);
            }
        }
        debug!(conn_id = %id, total = state.connections.len(), "connection registered");
    }

    /// Tag a connection with a room, replacing any previous tag
    pub async fn join(&self, id: ConnectionId, room_id: &str) -> JoinOutcome {
        let mut state = self.state.write().await;
        let previous = match state.connections.get_mut(&id) {
            Some(conn) => conn.room.replace(room_id.to_string()),
            None => return JoinOutcome::UnknownConnection,
        };

        if let Some(prev) = previous.as_deref() {
            if prev != room_id {
                state.untag(id, prev);
            }
        }
        state
            .rooms
            .entry(room_id.to_string())
            .or_default()
            .insert(id);

        debug!(conn_id = %id, room_id, "connection joined room");
        JoinOutcome::Joined {
            previous: previous.filter(|prev| prev != room_id),
        }
    }

    /// Send `payload` to every other open connection tagged `room_id`
    ///
    /// Fire-and-forget: a failed send is logged and skipped. Returns the
    /// number of connections the payload was handed to.
    pub async fn broadcast(&self, origin: ConnectionId, room_id: &str, payload: &str) -> usize {
        let state = self.state.read().await;
        let Some(members) = state.rooms.get(room_id) else {
            return 0;
        };

        let mut delivered = 0;
        for id in members.iter().filter(|id| **id != origin) {
            let Some(conn) = state.connections.get(id) else {
                continue;
            };
            if conn.sender.is_closed() {
                continue;
            }
            match conn.sender.send(payload.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(conn_id = %id, room_id, error = %e, "failed to relay message"),
            }
        }

        debug!(conn_id = %origin, room_id, delivered, "broadcast");
        delivered
    }

    /// Send `payload` to a single connection
    pub async fn send_to(&self, id: ConnectionId, payload: &str) -> bool {
        let state = self.state.read().await;
        let Some(conn) = state.connections.get(&id) else {
            return false;
        };
        match conn.sender.send(payload.to_string()) {
            Ok(()) => true,
            Err(e) => {
                warn!(conn_id = %id, error = %e, "failed to send message");
                false
            }
        }
    }

    /// Forget a connection; returns the room it was tagged with
    pub async fn remove(&self, id: ConnectionId) -> Option<String> {
        let mut state = self.state.write().await;
        let room = state.connections.remove(&id)?.room;
        if let Some(room) = room.as_deref() {
            state.untag(id, room);
        }
        debug!(conn_id = %id, total = state.connections.len(), "connection removed");
        room
    }

    pub async fn room_of(&self, id: ConnectionId) -> Option<String> {
        self.state
            .read()
            .await
            .connections
            .get(&id)
            .and_then(|conn| conn.room.clone())
    }

    pub async fn room_members(&self, room_id: &str) -> Vec<ConnectionId> {
        self.state
            .read()
            .await
            .rooms
            .get(room_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub async fn connection_count(&self) -> usize {
        self.state.read().await.connections.len()
    }
}
