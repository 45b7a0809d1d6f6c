//! Shared application state injected into every handler

use std::sync::Arc;

use tracing::{info, warn};

use crate::completion::{CompletionError, TextCompletion};
use crate::error::ApiError;
use crate::models::ModerationVerdict;
use crate::prompt::render_moderation_prompt;
use crate::relay::{ConnectionRegistry, Relay};
use crate::store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub registry: Arc<ConnectionRegistry>,
    completion: Option<Arc<dyn TextCompletion>>,
    max_tokens: u32,
}

impl AppState {
    pub fn new(store: Arc<SessionStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            store,
            registry,
            completion: None,
            max_tokens: 512,
        }
    }

    pub fn with_completion(mut self, completion: Arc<dyn TextCompletion>) -> Self {
        self.completion = Some(completion);
        self
    }

    /// Default token budget for moderation verdicts
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn relay(&self) -> Relay {
        Relay::new(self.registry.clone(), self.store.clone())
    }

    /// Ask the text-completion collaborator for a verdict on a session
    pub async fn moderate(
        &self,
        session_id: &str,
        max_tokens: Option<u32>,
    ) -> Result<ModerationVerdict, ApiError> {
        let session = self.store.get(session_id).await?;
        let completion = self
            .completion
            .as_ref()
            .ok_or_else(|| ApiError::from(CompletionError::NotConfigured))?;

        let prompt = render_moderation_prompt(&session);
        let budget = max_tokens.unwrap_or(self.max_tokens);

        let verdict = completion.complete(&prompt, budget).await.map_err(|e| {
            warn!(session_id, error = %e, "moderation request failed");
            ApiError::from(e)
        })?;

        info!(session_id, "moderation verdict rendered");
        Ok(ModerationVerdict {
            session_id: session.id,
            verdict: verdict.trim().to_string(),
        })
    }
}
