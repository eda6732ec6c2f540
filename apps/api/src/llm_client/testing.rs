//! In-memory `CompletionService` for handler and pipeline tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionRequest, CompletionService, LlmError};

/// Replays queued results in order and records every request it receives.
#[derive(Default)]
pub struct StubCompletions {
    responses: Mutex<VecDeque<Result<Option<String>, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletions {
    pub fn new(responses: Vec<Result<Option<String>, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a stub whose calls all succeed with the given texts.
    pub fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(Some(t.to_string()))).collect())
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for StubCompletions {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected completion call")
    }
}
