//! Session/room store flows driven through the public API

mod common;

use std::sync::Arc;

use duet_relay::error::ApiError;
use duet_relay::models::{CreateSessionRequest, Role, RECENT_TURNS};

use common::{create_request, new_session, new_state, FakeCompletion};

#[tokio::test]
async fn test_create_then_fetch_round_trip() {
    let state = new_state();
    let params = create_request("Ada", "Grace", "Ownership").validate().unwrap();
    let id = state.store.create(params).await;

    state.store.mark_joined(&id, Role::Host).await.unwrap();

    let session = state.store.get(&id).await.unwrap();
    assert_eq!(session.host.name, "Ada");
    assert_eq!(session.guest.name, "Grace");
    assert_eq!(session.topic, "Ownership");
    assert!(session.host.joined);
    assert!(!session.guest.joined);
}

#[test]
fn test_any_two_missing_fields_are_named_exactly() {
    let full = [("hostName", "Ada"), ("guestName", "Grace"), ("topic", "Rust")];

    for keep in 0..full.len() {
        let (kept_field, kept_value) = full[keep];
        let mut request = CreateSessionRequest::default();
        match kept_field {
            "hostName" => request.host_name = Some(kept_value.to_string()),
            "guestName" => request.guest_name = Some(kept_value.to_string()),
            _ => request.topic = Some(kept_value.to_string()),
        }

        let expected: Vec<&str> = full
            .iter()
            .map(|(field, _)| *field)
            .filter(|field| *field != kept_field)
            .collect();
        assert_eq!(request.validate().unwrap_err(), ApiError::missing(expected));
    }
}

#[tokio::test]
async fn test_third_violation_bans_and_fourth_turn_is_forbidden() {
    let state = new_state();
    let id = state.store.create(new_session("Ada", "Grace", "Tabs")).await;

    state.store.append_turn(&id, Role::Guest, "what an IDIOT").await.unwrap();
    state.store.append_turn(&id, Role::Guest, "well, damn").await.unwrap();
    let session = state.store.append_turn(&id, Role::Guest, "stupid take").await.unwrap();
    assert!(session.banned.contains(&Role::Guest));

    let err = state
        .store
        .append_turn(&id, Role::Guest, "a perfectly nice sentence")
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Forbidden(Role::Guest));

    let status = state.store.status(&id).await.unwrap();
    assert_eq!(status.turn_count, 3);
    assert_eq!(status.violations.guest, 3);
    assert_eq!(status.banned, vec![Role::Guest]);
}

#[tokio::test]
async fn test_status_after_many_turns() {
    let state = new_state();
    let id = state.store.create(new_session("Ada", "Grace", "Async")).await;

    let turns = 13;
    let mut host_words = 0;
    let mut guest_words = 0;
    for i in 0..turns {
        // Turn i has i + 1 words
        let content = vec!["word"; i + 1].join(" ");
        let speaker = if i % 2 == 0 { Role::Host } else { Role::Guest };
        match speaker {
            Role::Host => host_words += i + 1,
            Role::Guest => guest_words += i + 1,
        }
        state.store.append_turn(&id, speaker, &content).await.unwrap();
    }

    let status = state.store.status(&id).await.unwrap();
    assert_eq!(status.history_length, turns);
    assert_eq!(status.turn_count, turns);
    assert_eq!(status.recent_turns.len(), RECENT_TURNS);
    assert_eq!(status.recent_turns.first().unwrap().index, turns - RECENT_TURNS);
    assert_eq!(status.recent_turns.last().unwrap().index, turns - 1);
    assert_eq!(status.word_counts.host, host_words);
    assert_eq!(status.word_counts.guest, guest_words);
    assert_eq!(status.total_words, host_words + guest_words);

    assert_eq!(state.store.get(&id).await.unwrap().history.len(), turns);
}

#[tokio::test]
async fn test_status_with_few_turns_is_not_truncated() {
    let state = new_state();
    let id = state.store.create(new_session("Ada", "Grace", "Async")).await;
    state.store.append_turn(&id, Role::Host, "one two").await.unwrap();

    let status = state.store.status(&id).await.unwrap();
    assert_eq!(status.recent_turns.len(), 1);
    assert_eq!(status.total_words, 2);
}

#[tokio::test]
async fn test_joining_twice_keeps_single_slot() {
    let state = new_state();
    let id = state.store.create(new_session("Ada", "Grace", "Traits")).await;

    state.store.mark_joined(&id, Role::Host).await.unwrap();
    let session = state.store.mark_joined(&id, Role::Host).await.unwrap();

    let value = serde_json::to_value(&session).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys.iter().filter(|k| k.as_str() == "host").count(), 1);
    assert!(session.host.joined);
    assert_eq!(session.host.name, "Ada");
}

#[tokio::test]
async fn test_moderation_uses_rendered_prompt_and_budget() {
    let fake = Arc::new(FakeCompletion::default());
    let state = new_state()
        .with_completion(fake.clone())
        .with_max_tokens(300);
    let id = state.store.create(new_session("Ada", "Grace", "Macros")).await;
    state
        .store
        .append_turn(&id, Role::Host, "Macros are great.")
        .await
        .unwrap();

    let verdict = state.moderate(&id, None).await.unwrap();
    assert_eq!(verdict.session_id, id);
    assert_eq!(verdict.verdict, "Verdict: civil.");

    state.moderate(&id, Some(42)).await.unwrap();

    let calls = fake.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].0.contains("Ada: Macros are great."));
    assert_eq!(calls[0].1, 300);
    assert_eq!(calls[1].1, 42);
}

#[tokio::test]
async fn test_moderation_upstream_failure() {
    let state = new_state().with_completion(Arc::new(FakeCompletion::failing(502)));
    let id = state.store.create(new_session("Ada", "Grace", "Macros")).await;

    match state.moderate(&id, None).await.unwrap_err() {
        ApiError::UpstreamFailure { message, detail } => {
            assert_eq!(message, "Text completion request failed");
            assert!(detail.contains("502"));
        }
        other => panic!("Expected upstream failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_moderation_without_collaborator() {
    let state = new_state();
    let id = state.store.create(new_session("Ada", "Grace", "Macros")).await;
    assert!(matches!(
        state.moderate(&id, None).await,
        Err(ApiError::UpstreamFailure { .. })
    ));
}

#[tokio::test]
async fn test_moderation_of_unknown_session() {
    let state = new_state().with_completion(Arc::new(FakeCompletion::default()));
    assert_eq!(
        state.moderate("nope", None).await.unwrap_err(),
        ApiError::NotFound("nope".to_string())
    );
}
