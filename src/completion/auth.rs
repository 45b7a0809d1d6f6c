//! Application Default Credentials for Vertex AI

use gcp_auth::AuthenticationManager;

use super::error::CompletionError;

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Issues bearer tokens for Vertex AI requests
///
/// Credentials are discovered through the standard ADC chain
/// (`GOOGLE_APPLICATION_CREDENTIALS`, gcloud user credentials, metadata
/// server). Tokens are cached and refreshed by `gcp_auth`.
pub struct TokenSource {
    inner: AuthenticationManager,
}

impl TokenSource {
    pub async fn new() -> Result<Self, CompletionError> {
        let inner = AuthenticationManager::new().await.map_err(|e| {
            CompletionError::AuthenticationError(format!("Failed to initialize ADC: {}", e))
        })?;

        Ok(Self { inner })
    }

    /// Bearer token for the cloud-platform scope
    pub async fn token(&self) -> Result<String, CompletionError> {
        let token = self
            .inner
            .get_token(&[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| CompletionError::AuthenticationError(format!("Failed to get token: {}", e)))?;

        Ok(token.as_str().to_string())
    }
}
