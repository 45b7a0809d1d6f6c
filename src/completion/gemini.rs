//! Gemini on Vertex AI

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::auth::TokenSource;
use super::error::CompletionError;
use super::http::{build_http_client, post_json};
use super::provider::TextCompletion;

/// Gemini model identifiers
#[derive(Debug, Clone, PartialEq)]
pub enum GeminiModel {
    /// Gemini 2.5 Pro
    Gemini25Pro,
    /// Gemini 2.5 Flash
    Gemini25Flash,
    /// Gemini 2.5 Flash Lite
    Gemini25FlashLite,
}

impl GeminiModel {
    /// Get the model identifier string
    pub fn as_str(&self) -> &str {
        match self {
            GeminiModel::Gemini25Pro => "gemini-2.5-pro",
            GeminiModel::Gemini25Flash => "gemini-2.5-flash",
            GeminiModel::Gemini25FlashLite => "gemini-2.5-flash-lite",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Single-shot Gemini client for Vertex AI `generateContent`
pub struct GeminiClient {
    http_client: Client,
    tokens: TokenSource,
    project_id: String,
    location: String,
    model: GeminiModel,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or ADC initialization fails.
    pub async fn new(
        project_id: String,
        location: String,
        model: GeminiModel,
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
}

fn endpoint_url(project_id: &str, location: &str, model: &GeminiModel) -> String {
    format!(
        "https://{}-aiplatform.googleapis.com/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
        location, project_id, location, model.as_str()
    )
}

fn build_request(prompt: &str, max_tokens: u32) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            max_output_tokens: max_tokens,
        },
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, CompletionError> {
    // Only the first candidate is used
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(CompletionError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl TextCompletion for GeminiClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError> {
        let token = self.tokens.token().await?;
        let url = endpoint_url(&self.project_id, &self.location, &self.model);
        let response: GenerateContentResponse =
            post_json(&self.http_client, &url, &token, &build_request(prompt, max_tokens)).await?;
        extract_text(response)
    }
}
