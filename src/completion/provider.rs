//! Provider trait and factory for text completion

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::claude::{ClaudeClient, ClaudeModel};
use super::error::CompletionError;
use super::gemini::{GeminiClient, GeminiModel};

/// Turns a prompt into generated text
///
/// Implementations make a single attempt; failures are returned to the caller
/// and never retried.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Generate at most `max_tokens` tokens of text for `prompt`
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError>;
}

/// Unified model enum for the supported providers
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    /// Anthropic Claude model on Vertex AI
    Claude(ClaudeModel),
    /// Google Gemini model on Vertex AI
    Gemini(GeminiModel),
}

impl Model {
    /// Get the model identifier as a string
    pub fn as_str(&self) -> &str {
        match self {
            Model::Claude(model) => model.as_str(),
            Model::Gemini(model) => model.as_str(),
        }
    }

    /// Resolve a short configuration name such as `claude-haiku`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "claude-sonnet" => Some(Model::Claude(ClaudeModel::Sonnet45)),
            "claude-haiku" => Some(Model::Claude(ClaudeModel::Haiku45)),
            "gemini-pro" => Some(Model::Gemini(GeminiModel::Gemini25Pro)),
            "gemini-flash" => Some(Model::Gemini(GeminiModel::Gemini25Flash)),
            "gemini-flash-lite" => Some(Model::Gemini(GeminiModel::Gemini25FlashLite)),
            _ => None,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Claude(ClaudeModel::Haiku45)
    }
}

/// Create a text-completion client for the given model
///
/// Both providers are reached through Google Cloud Vertex AI and share the
/// same Application Default Credentials.
pub async fn create_completion(
    model: Model,
    project_id: String,
    location: String,
    request_timeout: Duration,
) -> Result<Arc<dyn TextCompletion>, CompletionError> {
    match model {
        Model::Claude(claude_model) => {
            let client =
                ClaudeClient::new(project_id, location, claude_model, request_timeout).await?;
            Ok(Arc::new(client))
        }
        Model::Gemini(gemini_model) => {
            let client =
                GeminiClient::new(project_id, location, gemini_model, request_timeout).await?;
            Ok(Arc::new(client))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(
            Model::from_name("claude-sonnet"),
            Some(Model::Claude(ClaudeModel::Sonnet45))
        );
        assert_eq!(
            Model::from_name(" Gemini-Flash-Lite "),
            Some(Model::Gemini(GeminiModel::Gemini25FlashLite))
        );
        assert_eq!(Model::from_name("gpt-4"), None);
    }

    #[test]
    fn test_default_model() {
        assert_eq!(Model::default().as_str(), "claude-haiku-4-5@20251001");
    }
}
