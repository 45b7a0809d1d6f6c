//! Per-connection message dispatch

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::envelope::{ClientEnvelope, ServerEnvelope};
use super::registry::{ConnectionId, ConnectionRegistry, JoinOutcome};
use crate::models::Role;
use crate::store::SessionStore;

/// Routes envelopes between connections, using the session store to admit
/// joins
#[derive(Clone)]
pub struct Relay {
    registry: Arc<ConnectionRegistry>,
    store: Arc<SessionStore>,
}

impl Relay {
    pub fn new(registry: Arc<ConnectionRegistry>, store: Arc<SessionStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Register a new connection and greet it with its id
    pub async fn connect(&self, sender: UnboundedSender<String>) -> ConnectionId {
        let id = Uuid::new_v4();
        self.registry.register(id, sender).await;
        self.reply(id, &ServerEnvelope::ConnectionEstablished { connection_id: id })
            .await;
        info!(conn_id = %id, "connection established");
        id
    }

    /// Handle one inbound text frame
    ///
    /// Malformed frames are dropped with a warning; the connection stays open.
    pub async fn handle_text(&self, id: ConnectionId, text: &str) {
        let envelope = match ClientEnvelope::parse(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(conn_id = %id, error = %e, "dropping malformed message");
                return;
            }
        };

        match envelope {
            ClientEnvelope::JoinRoom { room_id, role } => self.join(id, &room_id, role).await,
            ClientEnvelope::Signal { kind } => {
                let Some(room_id) = self.registry.room_of(id).await else {
                    debug!(conn_id = %id, kind = kind.as_str(), "dropping message from connection outside any room");
                    return;
                };
                self.registry.broadcast(id, &room_id, text).await;
            }
        }
    }

    /// Forget a connection and tell its room it left
    pub async fn disconnect(&self, id: ConnectionId) {
        if let Some(room_id) = self.registry.remove(id).await {
            self.notify_left(id, room_id).await;
        }
        info!(conn_id = %id, "connection closed");
    }

    async fn join(&self, id: ConnectionId, room_id: &str, role: Option<Role>) {
        if !self.store.contains(room_id).await {
            warn!(conn_id = %id, room_id, "join for unknown room");
            self.reply(
                id,
                &ServerEnvelope::Error {
                    message: format!("Room not found: {}", room_id),
                },
            )
            .await;
            return;
        }

        let previous = match self.registry.join(id, room_id).await {
            JoinOutcome::Joined { previous } => previous,
            JoinOutcome::UnknownConnection => return,
        };
        if let Some(previous) = previous {
            self.notify_left(id, previous).await;
        }

        if let Some(role) = role {
            if let Err(e) = self.store.mark_joined(room_id, role).await {
                warn!(conn_id = %id, room_id, error = %e, "failed to mark participant joined");
            }
        }

        let peers = self.registry.room_members(room_id).await.len().saturating_sub(1);
        self.reply(
            id,
            &ServerEnvelope::RoomJoined {
                room_id: room_id.to_string(),
                peers,
            },
        )
        .await;
        self.announce(
            id,
            room_id,
            &ServerEnvelope::PeerJoined {
                room_id: room_id.to_string(),
                connection_id: id,
                role,
            },
        )
        .await;
    }

    async fn notify_left(&self, id: ConnectionId, room_id: String) {
        let envelope = ServerEnvelope::PeerLeft {
            room_id: room_id.clone(),
            connection_id: id,
        };
        self.announce(id, &room_id, &envelope).await;
    }

    async fn announce(&self, origin: ConnectionId, room_id: &str, envelope: &ServerEnvelope) {
        match envelope.to_text() {
            Ok(text) => {
                self.registry.broadcast(origin, room_id, &text).await;
            }
            Err(e) => warn!(conn_id = %origin, error = %e, "failed to serialize envelope"),
        }
    }

    async fn reply(&self, id: ConnectionId, envelope: &ServerEnvelope) {
        match envelope.to_text() {
            Ok(text) => {
                self.registry.send_to(id, &text).await;
            }
            Err(e) => warn!(conn_id = %id, error = %e, "failed to serialize envelope"),
        }
    }
}
