//! Claude on Vertex AI

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::auth::TokenSource;
use super::error::CompletionError;
use super::http::{build_http_client, post_json};
use super::provider::TextCompletion;

const ANTHROPIC_VERSION: &str = "vertex-2023-10-16";

/// Claude model identifiers for Vertex AI
#[derive(Debug, Clone, PartialEq)]
pub enum ClaudeModel {
    /// Claude Sonnet 4.5 (released 2025-09-29)
    Sonnet45,
    /// Claude Haiku 4.5 (released 2025-10-01)
    Haiku45,
}

impl ClaudeModel {
    /// Get the model identifier string for Vertex AI
    pub fn as_str(&self) -> &str {
        match self {
            ClaudeModel::Sonnet45 => "claude-sonnet-4-5@20250929",
            ClaudeModel::Haiku45 => "claude-haiku-4-5@20251001",
        }
    }
}

#[derive(Debug, Serialize)]
struct RawPredictRequest<'a> {
    anthropic_version: &'static str,
    max_tokens: u32,
    messages: Vec<ClaudeMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawPredictResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Single-shot Claude client for Vertex AI `rawPredict`
pub struct ClaudeClient {
    http_client: Client,
    tokens: TokenSource,
    project_id: String,
    location: String,
    model: ClaudeModel,
}

impl ClaudeClient {
    /// Create a new Claude client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or ADC initialization fails.
    pub async fn new(
        project_id: String,
        location: String,
        model: ClaudeModel,
        request_timeout: Duration,
    ) -> Result<Self, CompletionError> {
        Ok(Self {
            http_client: build_http_client(request_timeout)?,
            tokens: TokenSource::new().await?,
            project_id,
            location,
            model,
        })
    }

    fn endpoint_url(&self) -> String {
        endpoint_url(&self.project_id, &self.location, &self.model)
    }
}

fn endpoint_url(project_id: &str, location: &str, model: &ClaudeModel) -> String {
    format!(
        "https://{}-aiplatform.googleapis.com/v1/projects/{}/locations/{}/publishers/anthropic/models/{}:rawPredict",
        location, project_id, location, model.as_str()
    )
}

fn build_request(prompt: &str, max_tokens: u32) -> RawPredictRequest<'_> {
    RawPredictRequest {
        anthropic_version: ANTHROPIC_VERSION,
        max_tokens,
        messages: vec![ClaudeMessage {
            role: "user",
            content: prompt,
        }],
    }
}

fn extract_text(response: RawPredictResponse) -> Result<String, CompletionError> {
    let text: String = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ResponseBlock::Text { text } => Some(text),
            ResponseBlock::Other => None,
        })
        .collect();

    if text.trim().is_empty() {
        return Err(CompletionError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl TextCompletion for ClaudeClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError> {
        let token = self.tokens.token().await?;
        let request = build_request(prompt, max_tokens);
        let response: RawPredictResponse =
            post_json(&self.http_client, &self.endpoint_url(), &token, &request).await?;
        extract_text(response)
    }
}
