// Route definitions

use std::convert::Infallible;

use warp::Filter;

use crate::handlers;
use crate::models::ModerateRequest;
use crate::relay::serve_socket;
use crate::state::AppState;

/// Largest accepted JSON request body
const MAX_BODY_BYTES: u64 = 16 * 1024;

pub fn configure_routes(
    state: AppState,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    // POST /sessions
    let create_session = sessions()
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(json_body())
        .and_then(handlers::create_session_handler);

    // GET /sessions/{id}
    let get_session = sessions()
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::get_session_handler);

    // POST /sessions/{id}/join
    let join_session = sessions()
        .and(warp::path::param::<String>())
        .and(warp::path("join"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(json_body())
        .and_then(handlers::join_session_handler);

    // POST /sessions/{id}/turns
    let submit_turn = sessions()
        .and(warp::path::param::<String>())
        .and(warp::path("turns"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(json_body())
        .and_then(handlers::submit_turn_handler);

    // GET /sessions/{id}/status
    let session_status = sessions()
        .and(warp::path::param::<String>())
        .and(warp::path("status"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::session_status_handler);

    // POST /sessions/{id}/moderate?maxTokens=N
    let moderate_session = sessions()
        .and(warp::path::param::<String>())
        .and(warp::path("moderate"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::query::<ModerateRequest>())
        .and(with_state(state.clone()))
        .and_then(handlers::moderate_session_handler);

    // GET /health
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    // GET /ws
    let relay = state.relay();
    let websocket = warp::path("ws")
        .and(warp::path::end())
        .and(warp::ws())
        .map(move |ws: warp::ws::Ws| {
            let relay = relay.clone();
            ws.on_upgrade(move |socket| serve_socket(socket, relay))
        });

    create_session
        .or(get_session)
        .or(join_session)
        .or(submit_turn)
        .or(session_status)
        .or(moderate_session)
        .or(health)
        .or(websocket)
        .recover(handlers::handle_rejection)
}

fn sessions() -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::path("api")
        .and(warp::path("v1"))
        .and(warp::path("sessions"))
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}
