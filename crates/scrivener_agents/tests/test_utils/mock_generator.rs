//! Mock text generator for testing.

use async_trait::async_trait;
use scrivener_core::GenerateRequest;
use scrivener_error::{GenerationError, GenerationErrorKind, ScrivenerResult};
use scrivener_interface::TextGenerator;
use std::sync::{Arc, Mutex};

/// A single mock response (success or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(GenerationErrorKind),
}

/// Behavior configuration for mock responses.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always return the given text
    Success(String),
    /// Always return the specified error
    Error(GenerationErrorKind),
    /// Return responses in order, then fail
    Sequence(Vec<MockResponse>),
    /// Pick the first response whose key appears in the system message
    Routed(Vec<(String, MockResponse)>),
}

/// Mock generator that records every request it receives.
#[derive(Clone)]
pub struct MockGenerator {
    behavior: MockBehavior,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl MockGenerator {
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always succeeds with `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Success(text.into()))
    }

    /// Always fails with `error`.
    pub fn new_error(error: GenerationErrorKind) -> Self {
        Self::new_with_behavior(MockBehavior::Error(error))
    }

    /// Answers from a fixed sequence.
    #[allow(dead_code)]
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self::new_with_behavior(MockBehavior::Sequence(responses))
    }

    /// Answers by system-message key.
    #[allow(dead_code)]
    pub fn new_routed(routes: Vec<(&str, MockResponse)>) -> Self {
        Self::new_with_behavior(MockBehavior::Routed(
            routes
                .into_iter()
                .map(|(key, response)| (key.to_string(), response))
                .collect(),
        ))
    }

    /// Number of times generate() was called.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received, in order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self, request: &GenerateRequest) -> MockResponse {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len();
        requests.push(request.clone());

        match &self.behavior {
            MockBehavior::Success(text) => MockResponse::Text(text.clone()),
            MockBehavior::Error(kind) => MockResponse::Error(kind.clone()),
            MockBehavior::Sequence(responses) => responses.get(index).cloned().unwrap_or_else(|| {
                MockResponse::Error(GenerationErrorKind::Unavailable(format!(
                    "Mock sequence exhausted (call {} beyond {} responses)",
                    index + 1,
                    responses.len()
                )))
            }),
            MockBehavior::Routed(routes) => {
                let system = request.system_message().clone().unwrap_or_default();
                routes
                    .iter()
                    .find(|(key, _)| system.contains(key.as_str()))
                    .map(|(_, response)| response.clone())
                    .unwrap_or_else(|| {
                        MockResponse::Error(GenerationErrorKind::Unavailable(
                            "No mock route".to_string(),
                        ))
                    })
            }
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, request: &GenerateRequest) -> ScrivenerResult<String> {
        // Small delay to simulate network latency
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        match self.next_response(request) {
            MockResponse::Text(text) => Ok(text),
            MockResponse::Error(kind) => Err(GenerationError::new(kind).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
