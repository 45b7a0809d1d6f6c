// Rejection rendering: every error leaves the server as JSON

use std::convert::Infallible;

use tracing::error;
use warp::http::StatusCode;
use warp::Rejection;

use crate::error::{ApiError, ErrorBody};

/// Render a rejection into a JSON error response
pub async fn handle_rejection(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, body) = if let Some(api_error) = err.find::<ApiError>() {
        if let ApiError::Internal(detail) = api_error {
            error!(%detail, "internal error");
        }
        (api_error.status_code(), api_error.body())
    } else if err.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            ErrorBody::new("not_found", "Route not found"),
        )
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("invalid_body", e.to_string()),
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorBody::new("payload_too_large", "Request body too large"),
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorBody::new("unsupported_media_type", "Request body must be application/json"),
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (
            StatusCode::LENGTH_REQUIRED,
            ErrorBody::new("length_required", "A content-length header is required"),
        )
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("invalid_query", e.to_string()),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorBody::new("method_not_allowed", "Method not allowed"),
        )
    } else {
        error!(rejection = ?err, "unhandled rejection");
        let internal = ApiError::Internal(format!("{:?}", err));
        (internal.status_code(), internal.body())
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
