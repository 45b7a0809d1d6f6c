//! Server configuration loaded from the environment

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

use crate::completion::Model;

/// Errors raised while reading configuration values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Configuration for the relay server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP/WebSocket listener to
    pub host: IpAddr,

    /// Port to listen on
    pub port: u16,

    /// GCP project hosting the text-completion models (disabled when absent)
    pub gcp_project_id: Option<String>,

    /// GCP region (e.g., "us-central1")
    pub gcp_location: String,

    /// Model used for moderation verdicts
    pub model: Model,

    /// Default token budget for a moderation verdict
    pub max_tokens: u32,

    /// Timeout for a single completion request
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3030,
            gcp_project_id: None,
            gcp_location: "us-central1".to_string(),
            model: Model::default(),
            max_tokens: 512,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// Build a configuration from process environment variables
    ///
    /// Unset variables fall back to [`ServerConfig::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("DUET_HOST") {
            config.host = parse_value("DUET_HOST", &host)?;
        }
        if let Some(port) = lookup("DUET_PORT") {
            config.port = parse_value("DUET_PORT", &port)?;
        }
        config.gcp_project_id = lookup("GCP_PROJECT_ID").filter(|p| !p.trim().is_empty());
        if let Some(location) = lookup("GCP_LOCATION") {
            config.gcp_location = location;
        }
        if let Some(model) = lookup("DUET_MODEL") {
            config.model = Model::from_name(&model).ok_or_else(|| ConfigError::InvalidValue {
                key: "DUET_MODEL".to_string(),
                value: model.clone(),
            })?;
        }
        if let Some(max_tokens) = lookup("DUET_MAX_TOKENS") {
            config.max_tokens = parse_value("DUET_MAX_TOKENS", &max_tokens)?;
        }
        if let Some(secs) = lookup("DUET_REQUEST_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_value("DUET_REQUEST_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }

    /// Socket address the server listens on
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
