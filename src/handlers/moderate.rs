// POST /sessions/{id}/moderate handler

use crate::models::ModerateRequest;
use crate::state::AppState;

pub async fn moderate_session_handler(
    session_id: String,
    request: ModerateRequest,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let verdict = state
        .moderate(&session_id, request.max_tokens)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&verdict))
}
