//! API error taxonomy and its HTTP rendering

use serde::Serialize;
use thiserror::Error;
use warp::http::StatusCode;

use crate::completion::CompletionError;
use crate::models::Role;

/// Errors surfaced by request/response operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// Unknown session/room id
    #[error("Session not found: {0}")]
    NotFound(String),

    /// Required fields missing from the request
    #[error("Missing required fields: {}", .missing_fields.join(", "))]
    Validation { missing_fields: Vec<String> },

    /// A banned participant attempted a turn
    #[error("Participant {0} is banned from this session")]
    Forbidden(Role),

    /// The text-completion collaborator failed
    #[error("Upstream failure: {message}")]
    UpstreamFailure { message: String, detail: String },

    /// Anything that was not anticipated
    #[error("Internal error: {0}")]
    Internal(String),
}

impl warp::reject::Reject for ApiError {}

impl ApiError {
    pub fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ApiError::Validation {
            missing_fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::UpstreamFailure { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON body rendered for this error
    pub fn body(&self) -> ErrorBody {
        let (error, missing_fields, detail) = match self {
            ApiError::NotFound(_) => ("not_found", None, None),
            ApiError::Validation { missing_fields } => {
                ("validation_error", Some(missing_fields.clone()), None)
            }
            ApiError::Forbidden(_) => ("forbidden", None, None),
            ApiError::UpstreamFailure { detail, .. } => {
                ("upstream_failure", None, Some(detail.clone()))
            }
            ApiError::Internal(_) => ("internal_error", None, None),
        };

        let message = match self {
            ApiError::UpstreamFailure { message, .. } => message.clone(),
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        ErrorBody {
            error: error.to_string(),
            message,
            missing_fields,
            detail,
        }
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        ApiError::UpstreamFailure {
            message: "Text completion request failed".to_string(),
            detail: err.to_string(),
        }
    }
}

/// Wire format of an error response
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            missing_fields: None,
            detail: None,
        }
    }
}
