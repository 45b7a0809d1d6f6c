//! In-memory session/room store

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{count_words, NewSession, Role, Session, SessionStatus, Turn};
use crate::moderation::{Classifier, DenylistClassifier, BAN_THRESHOLD};

/// Generate a time-plus-random opaque session token
///
/// Collisions are assumed negligible and are not retried.
pub fn generate_session_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let random = Uuid::new_v4().simple().to_string();
    format!("{:x}{}", millis, &random[..8])
}

/// Owns every session record for the lifetime of the process
///
/// All mutations take the single write lock and operate on one record.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    classifier: Arc<dyn Classifier>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Arc::new(DenylistClassifier::default()))
    }
}

impl SessionStore {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            classifier,
        }
    }

    /// Create a session and return its id
    pub async fn create(&self, params: NewSession) -> String {
        let id = generate_session_id();
        let session = Session::new(id.clone(), params);

        self.sessions.write().await.insert(id.clone(), session);
        info!(session_id = %id, "session created");
        id
    }

    /// Fetch a snapshot of a session
    pub async fn get(&self, id: &str) -> Result<Session, ApiError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Mark a participant slot as joined
    ///
    /// Rejoining overwrites the previous join timestamp; the slot itself is
    /// never duplicated.
    pub async fn mark_joined(&self, id: &str, role: Role) -> Result<Session, ApiError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

        let participant = session.participant_mut(role);
        participant.joined = true;
        participant.joined_at = Some(Utc::now());

        debug!(session_id = %id, %role, "participant joined");
        Ok(session.clone())
    }

    /// Append a turn, applying the classifier and ban rules
    pub async fn append_turn(
        &self,
        id: &str,
        speaker: Role,
        content: &str,
    ) -> Result<Session, ApiError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

        if session.is_banned(speaker) {
            warn!(session_id = %id, %speaker, "turn rejected from banned participant");
            return Err(ApiError::Forbidden(speaker));
        }
        if content.trim().is_empty() {
            return Err(ApiError::missing(["content"]));
        }

        let flagged = self.classifier.classify(content).flagged;
        if flagged {
            let participant = session.participant_mut(speaker);
            participant.violations += 1;
            let violations = participant.violations;
            warn!(session_id = %id, %speaker, violations, "turn flagged by classifier");

            if violations >= BAN_THRESHOLD && session.banned.insert(speaker) {
                warn!(session_id = %id, %speaker, "participant banned");
            }
        }

        let turn = Turn {
            index: session.history.len(),
            speaker,
            content: content.to_string(),
            word_count: count_words(content),
            flagged,
            timestamp: Utc::now(),
        };
        session.history.push(turn);

        Ok(session.clone())
    }

    /// Summary view of a session
    pub async fn status(&self, id: &str) -> Result<SessionStatus, ApiError> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(Session::status)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every session; called at process stop
    pub async fn clear(&self) {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        sessions.clear();
        info!(count, "session store cleared");
    }
}
