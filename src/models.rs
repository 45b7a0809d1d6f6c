// Data structures (Session, Turn, request and response bodies)

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Number of turns included in the status summary
pub const RECENT_TURNS: usize = 10;

// Participant Role Enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "player1")]
    Host,
    #[serde(alias = "player2")]
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Host => "host",
            Role::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Participant Slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    pub joined: bool,
    pub joined_at: Option<DateTime<Utc>>,
    pub violations: u32,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            joined: false,
            joined_at: None,
            violations: 0,
        }
    }
}

// Turn Entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub index: usize,
    pub speaker: Role,
    pub content: String,
    pub word_count: usize,
    pub flagged: bool,
    pub timestamp: DateTime<Utc>,
}

/// Count whitespace-separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

// Session Record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub topic: String,
    pub host: Participant,
    pub guest: Participant,
    pub created_at: DateTime<Utc>,
    pub history: Vec<Turn>,
    pub banned: BTreeSet<Role>,
}

impl Session {
    pub fn new(id: String, params: NewSession) -> Self {
        Self {
            id,
            topic: params.topic,
            host: Participant::new(params.host_name),
            guest: Participant::new(params.guest_name),
            created_at: Utc::now(),
            history: Vec::new(),
            banned: BTreeSet::new(),
        }
    }

    pub fn participant(&self, role: Role) -> &Participant {
        match role {
            Role::Host => &self.host,
            Role::Guest => &self.guest,
        }
    }

    pub fn participant_mut(&mut self, role: Role) -> &mut Participant {
        match role {
            Role::Host => &mut self.host,
            Role::Guest => &mut self.guest,
        }
    }

    pub fn is_banned(&self, role: Role) -> bool {
        self.banned.contains(&role)
    }

    /// Summary view used by the status endpoint
    pub fn status(&self) -> SessionStatus {
        let words_for = |role: Role| -> usize {
            self.history
                .iter()
                .filter(|turn| turn.speaker == role)
                .map(|turn| turn.word_count)
                .sum()
        };
        let host_words = words_for(Role::Host);
        let guest_words = words_for(Role::Guest);
        let skip = self.history.len().saturating_sub(RECENT_TURNS);

        SessionStatus {
            session_id: self.id.clone(),
            topic: self.topic.clone(),
            host_name: self.host.name.clone(),
            guest_name: self.guest.name.clone(),
            host_joined: self.host.joined,
            guest_joined: self.guest.joined,
            history_length: self.history.len(),
            turn_count: self.history.len(),
            total_words: host_words + guest_words,
            word_counts: RoleCounts {
                host: host_words,
                guest: guest_words,
            },
            violations: RoleCounts {
                host: self.host.violations as usize,
                guest: self.guest.violations as usize,
            },
            banned: self.banned.iter().copied().collect(),
            recent_turns: self.history[skip..].to_vec(),
        }
    }
}

// Status Summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub session_id: String,
    pub topic: String,
    pub host_name: String,
    pub guest_name: String,
    pub host_joined: bool,
    pub guest_joined: bool,
    pub history_length: usize,
    pub turn_count: usize,
    pub total_words: usize,
    pub word_counts: RoleCounts,
    pub violations: RoleCounts,
    pub banned: Vec<Role>,
    pub recent_turns: Vec<Turn>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RoleCounts {
    pub host: usize,
    pub guest: usize,
}

// Request Types
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub host_name: Option<String>,
    pub guest_name: Option<String>,
    pub topic: Option<String>,
}

/// Validated parameters for a new session
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub host_name: String,
    pub guest_name: String,
    pub topic: String,
}

impl CreateSessionRequest {
    /// Check required fields, reporting every missing one at once
    pub fn validate(self) -> Result<NewSession, ApiError> {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());

        let missing: Vec<&str> = [
            ("hostName", present(&self.host_name)),
            ("guestName", present(&self.guest_name)),
            ("topic", present(&self.topic)),
        ]
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(ApiError::missing(missing));
        }

        Ok(NewSession {
            host_name: self.host_name.unwrap_or_default().trim().to_string(),
            guest_name: self.guest_name.unwrap_or_default().trim().to_string(),
            topic: self.topic.unwrap_or_default().trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JoinRequest {
    pub role: Option<Role>,
}

impl JoinRequest {
    pub fn validate(self) -> Result<Role, ApiError> {
        self.role.ok_or_else(|| ApiError::missing(["role"]))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurnRequest {
    pub speaker: Option<Role>,
    pub content: Option<String>,
}

impl TurnRequest {
    pub fn validate(self) -> Result<(Role, String), ApiError> {
        let content = self.content.filter(|c| !c.trim().is_empty());
        match (self.speaker, content) {
            (Some(speaker), Some(content)) => Ok((speaker, content)),
            (speaker, content) => {
                let mut missing = Vec::new();
                if speaker.is_none() {
                    missing.push("speaker");
                }
                if content.is_none() {
                    missing.push("content");
                }
                Err(ApiError::missing(missing))
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerateRequest {
    pub max_tokens: Option<u32>,
}

// Response Types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSession {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModerationVerdict {
    pub session_id: String,
    pub verdict: String,
}
