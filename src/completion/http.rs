//! Shared HTTP plumbing for the Vertex AI clients

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::CompletionError;

/// Build the HTTP client used for completion requests
pub fn build_http_client(request_timeout: Duration) -> Result<Client, CompletionError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(request_timeout)
        .build()
        .map_err(|e| CompletionError::TransportError(format!("Failed to create HTTP client: {}", e)))
}

/// POST a JSON body with a bearer token and decode the JSON response
pub async fn post_json<B, R>(
    client: &Client,
    url: &str,
    token: &str,
    body: &B,
) -> Result<R, CompletionError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", token))
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CompletionError::HttpError {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
