#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use duet_relay::completion::{CompletionError, TextCompletion};
use duet_relay::models::{CreateSessionRequest, NewSession};
use duet_relay::relay::ConnectionRegistry;
use duet_relay::state::AppState;
use duet_relay::store::SessionStore;

/// Records prompts and answers with a canned verdict or failure
#[derive(Default)]
pub struct FakeCompletion {
    pub calls: Mutex<Vec<(String, u32)>>,
    pub fail_with_status: Option<u16>,
}

impl FakeCompletion {
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Default::default()
        }
    }
}

#[async_trait]
impl TextCompletion for FakeCompletion {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_tokens));

        match self.fail_with_status {
            Some(status) => Err(CompletionError::HttpError {
                status,
                body: "upstream exploded".to_string(),
            }),
            None => Ok("  Verdict: civil.  ".to_string()),
        }
    }
}

pub fn new_state() -> AppState {
    AppState::new(
        Arc::new(SessionStore::default()),
        Arc::new(ConnectionRegistry::new()),
    )
}

pub fn create_request(host: &str, guest: &str, topic: &str) -> CreateSessionRequest {
    CreateSessionRequest {
        host_name: Some(host.to_string()),
        guest_name: Some(guest.to_string()),
        topic: Some(topic.to_string()),
    }
}

pub fn new_session(host: &str, guest: &str, topic: &str) -> NewSession {
    create_request(host, guest, topic)
        .validate()
        .expect("complete request should validate")
}
