// Session/room request handlers

use tracing::info;
use warp::http::StatusCode;

use crate::models::{CreateSessionRequest, CreatedSession, JoinRequest, TurnRequest};
use crate::state::AppState;

// POST /sessions
pub async fn create_session_handler(
    state: AppState,
    request: CreateSessionRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let params = request.validate().map_err(warp::reject::custom)?;
    let session_id = state.store.create(params).await;

    Ok(warp::reply::with_status(
        warp::reply::json(&CreatedSession { session_id }),
        StatusCode::CREATED,
    ))
}

// GET /sessions/{id}
pub async fn get_session_handler(
    session_id: String,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let session = state
        .store
        .get(&session_id)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&session))
}

// POST /sessions/{id}/join
pub async fn join_session_handler(
    session_id: String,
    state: AppState,
    request: JoinRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let role = request.validate().map_err(warp::reject::custom)?;
    let session = state
        .store
        .mark_joined(&session_id, role)
        .await
        .map_err(warp::reject::custom)?;

    info!(session_id = %session_id, %role, "participant joined over HTTP");
    Ok(warp::reply::json(&session))
}

// POST /sessions/{id}/turns
pub async fn submit_turn_handler(
    session_id: String,
    state: AppState,
    request: TurnRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (speaker, content) = request.validate().map_err(warp::reject::custom)?;
    let session = state
        .store
        .append_turn(&session_id, speaker, &content)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&session))
}

// GET /sessions/{id}/status
pub async fn session_status_handler(
    session_id: String,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let status = state
        .store
        .status(&session_id)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&status))
}
