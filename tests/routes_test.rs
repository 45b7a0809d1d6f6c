//! HTTP surface: path tree, status codes and JSON error rendering

mod common;

use duet_relay::routes::configure_routes;
use serde_json::{json, Value};
use warp::http::StatusCode;

use common::{new_session, new_state};

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_create_then_fetch_session() {
    let routes = configure_routes(new_state());

    let res = warp::test::request()
        .method("POST")
        .path("/api/v1/sessions")
        .json(&json!({ "hostName": "Ada", "guestName": "Grace", "topic": "Tabs" }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let id = body_json(res.body())["sessionId"].as_str().unwrap().to_string();

    let res = warp::test::request()
        .path(&format!("/api/v1/sessions/{}", id))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let session = body_json(res.body());
    assert_eq!(session["id"], id.as_str());
    assert_eq!(session["host"]["name"], "Ada");
    assert_eq!(session["topic"], "Tabs");
}

#[tokio::test]
async fn test_missing_fields_are_listed() {
    let routes = configure_routes(new_state());

    let res = warp::test::request()
        .method("POST")
        .path("/api/v1/sessions")
        .json(&json!({ "topic": "x" }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res.body());
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["missingFields"], json!(["hostName", "guestName"]));
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let routes = configure_routes(new_state());

    let res = warp::test::request()
        .path("/api/v1/sessions/nope")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res.body())["error"], "not_found");

    let res = warp::test::request()
        .method("POST")
        .path("/api/v1/sessions/nope/turns")
        .json(&json!({ "speaker": "host", "content": "hi" }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = warp::test::request()
        .path("/api/v1/nothing-here")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_banned_speaker_gets_403() {
    let state = new_state();
    let id = state.store.create(new_session("Ada", "Grace", "Tabs")).await;
    let routes = configure_routes(state);
    let turns = format!("/api/v1/sessions/{}/turns", id);

    for content in ["you idiot", "so stupid", "shut up"] {
        let res = warp::test::request()
            .method("POST")
            .path(&turns)
            .json(&json!({ "speaker": "guest", "content": content }))
            .reply(&routes)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = warp::test::request()
        .method("POST")
        .path(&turns)
        .json(&json!({ "speaker": "player2", "content": "sorry" }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(res.body())["error"], "forbidden");

    let res = warp::test::request()
        .path(&format!("/api/v1/sessions/{}/status", id))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let status = body_json(res.body());
    assert_eq!(status["turnCount"], 3);
    assert_eq!(status["banned"], json!(["guest"]));
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let state = new_state();
    let id = state.store.create(new_session("Ada", "Grace", "Tabs")).await;
    let routes = configure_routes(state);

    let res = warp::test::request()
        .method("PUT")
        .path(&format!("/api/v1/sessions/{}", id))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(res.body())["error"], "method_not_allowed");
}

#[tokio::test]
async fn test_non_json_body_is_415() {
    let routes = configure_routes(new_state());

    let res = warp::test::request()
        .method("POST")
        .path("/api/v1/sessions")
        .header("content-type", "text/plain")
        .body("hostName=Ada")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body_json(res.body())["error"], "unsupported_media_type");
}

#[tokio::test]
async fn test_invalid_body_and_query_are_400() {
    let state = new_state();
    let id = state.store.create(new_session("Ada", "Grace", "Tabs")).await;
    let routes = configure_routes(state);

    let res = warp::test::request()
        .method("POST")
        .path("/api/v1/sessions")
        .header("content-type", "application/json")
        .body("{ not json")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res.body())["error"], "invalid_body");

    let res = warp::test::request()
        .method("POST")
        .path(&format!("/api/v1/sessions/{}/moderate?maxTokens=lots", id))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res.body())["error"], "invalid_query");
}

#[tokio::test]
async fn test_moderation_without_collaborator_is_500() {
    let state = new_state();
    let id = state.store.create(new_session("Ada", "Grace", "Tabs")).await;
    let routes = configure_routes(state);

    let res = warp::test::request()
        .method("POST")
        .path(&format!("/api/v1/sessions/{}/moderate", id))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(res.body())["error"], "upstream_failure");
}

#[tokio::test]
async fn test_health() {
    let routes = configure_routes(new_state());

    let res = warp::test::request().path("/health").reply(&routes).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res.body())["status"], "ok");
}
