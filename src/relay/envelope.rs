//! Real-time envelopes exchanged over the WebSocket channel

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Role;

/// An inbound payload that could not be understood
#[derive(Debug, Error, PartialEq)]
#[error("Malformed message: {0}")]
pub struct MalformedMessage(pub String);

/// Signaling message kinds relayed verbatim to the sender's room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
    /// Unrecognized type; still relayed
    Other(String),
}

impl SignalKind {
    fn from_type(kind: &str) -> Self {
        match kind {
            "offer" => SignalKind::Offer,
            "answer" => SignalKind::Answer,
            "ice-candidate" => SignalKind::IceCandidate,
            other => SignalKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "ice-candidate",
            SignalKind::Other(kind) => kind,
        }
    }
}

/// Parsed inbound envelope
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEnvelope {
    JoinRoom { room_id: String, role: Option<Role> },
    Signal { kind: SignalKind },
}

impl ClientEnvelope {
    /// Parse a text frame into an envelope
    ///
    /// Only `type` is required. Extra fields ride along untouched, and
    /// `roomId`/`role` are only read for `join-room`.
    pub fn parse(text: &str) -> Result<Self, MalformedMessage> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| MalformedMessage(e.to_string()))?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| MalformedMessage("missing string field `type`".to_string()))?;

        match kind {
            "join-room" => {
                let room_id = value
                    .get("roomId")
                    .and_then(Value::as_str)
                    .filter(|id| !id.trim().is_empty())
                    .ok_or_else(|| MalformedMessage("join-room without roomId".to_string()))?;
                // Unknown roles join without one
                let role = value
                    .get("role")
                    .and_then(|role| Role::deserialize(role).ok());
                Ok(ClientEnvelope::JoinRoom {
                    room_id: room_id.to_string(),
                    role,
                })
            }
            kind => Ok(ClientEnvelope::Signal {
                kind: SignalKind::from_type(kind),
            }),
        }
    }
}

/// Envelopes originated by the server
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEnvelope {
    ConnectionEstablished {
        connection_id: Uuid,
    },
    RoomJoined {
        room_id: String,
        peers: usize,
    },
    PeerJoined {
        room_id: String,
        connection_id: Uuid,
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<Role>,
    },
    PeerLeft {
        room_id: String,
        connection_id: Uuid,
    },
    Error {
        message: String,
    },
}

impl ServerEnvelope {
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
