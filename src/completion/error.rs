//! Error types for the text completion layer

use thiserror::Error;

/// Errors that can occur when calling a text-completion provider
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Authentication/token issues
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Non-success HTTP status from the provider
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// Connection, timeout or other transport failure
    #[error("Transport error: {0}")]
    TransportError(String),

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Provider answered but produced no text
    #[error("Empty completion from provider")]
    EmptyResponse,

    /// No provider has been configured
    #[error("Text completion is not configured")]
    NotConfigured,
}

impl From<serde_json::Error> for CompletionError {
    fn from(err: serde_json::Error) -> Self {
        CompletionError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => CompletionError::HttpError {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None => CompletionError::TransportError(err.to_string()),
        }
    }
}
