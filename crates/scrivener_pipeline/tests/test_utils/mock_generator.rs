//! Scripted text generator for orchestrator tests.

use async_trait::async_trait;
use scrivener_core::GenerateRequest;
use scrivener_error::{GenerationError, GenerationErrorKind, ScrivenerResult};
use scrivener_interface::TextGenerator;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the generator does for one request.
#[derive(Debug, Clone)]
pub struct Reply {
    pub outcome: Result<String, GenerationErrorKind>,
    pub delay: Duration,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            delay: Duration::ZERO,
        }
    }

    pub fn error(kind: GenerationErrorKind) -> Self {
        Self {
            outcome: Err(kind),
            delay: Duration::ZERO,
        }
    }

    pub fn unavailable() -> Self {
        Self::error(GenerationErrorKind::Unavailable("scripted outage".to_string()))
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Script = dyn Fn(&GenerateRequest) -> Reply + Send + Sync;

#[derive(Debug, Default)]
struct Tally {
    requests: Vec<GenerateRequest>,
    in_flight: usize,
    peak_in_flight: usize,
}

/// Generator whose answer is computed from each request.
#[derive(Clone)]
pub struct ScriptedGenerator {
    script: Arc<Script>,
    tally: Arc<Mutex<Tally>>,
    /// Only calls whose system message contains this key count towards the peak
    track_key: Option<String>,
}

impl ScriptedGenerator {
    pub fn new(script: impl Fn(&GenerateRequest) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            script: Arc::new(script),
            tally: Arc::new(Mutex::new(Tally::default())),
            track_key: None,
        }
    }

    /// Every call fails.
    pub fn offline() -> Self {
        Self::new(|_| Reply::unavailable())
    }

    /// Every call fails after `delay`.
    #[allow(dead_code)]
    pub fn stalled(delay: Duration) -> Self {
        Self::new(move |_| Reply::unavailable().after(delay))
    }

    /// Measure concurrency for calls whose system message contains `key`.
    #[allow(dead_code)]
    pub fn tracking(mut self, key: &str) -> Self {
        self.track_key = Some(key.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.tally.lock().unwrap().requests.len()
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.tally.lock().unwrap().requests.clone()
    }

    /// Requests whose system message contains `key`.
    #[allow(dead_code)]
    pub fn requests_for(&self, key: &str) -> Vec<GenerateRequest> {
        self.requests()
            .into_iter()
            .filter(|request| system_of(request).contains(key))
            .collect()
    }

    /// Most tracked calls observed in flight at once.
    #[allow(dead_code)]
    pub fn peak_in_flight(&self) -> usize {
        self.tally.lock().unwrap().peak_in_flight
    }

    fn tracked(&self, request: &GenerateRequest) -> bool {
        self.track_key
            .as_deref()
            .is_some_and(|key| system_of(request).contains(key))
    }
}

/// System message of a request, empty when absent.
pub fn system_of(request: &GenerateRequest) -> String {
    request.system_message().clone().unwrap_or_default()
}

/// Text following `marker` in the prompt, up to the end of that line.
#[allow(dead_code)]
pub fn line_after(prompt: &str, marker: &str) -> Option<String> {
    let start = prompt.find(marker)? + marker.len();
    let rest = &prompt[start..];
    Some(rest.lines().next().unwrap_or_default().trim().to_string())
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerateRequest) -> ScrivenerResult<String> {
        let reply = (self.script)(request);
        let tracked = self.tracked(request);
        {
            let mut tally = self.tally.lock().unwrap();
            tally.requests.push(request.clone());
            if tracked {
                tally.in_flight += 1;
                tally.peak_in_flight = tally.peak_in_flight.max(tally.in_flight);
            }
        }

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }

        if tracked {
            self.tally.lock().unwrap().in_flight -= 1;
        }
        reply.outcome.map_err(|kind| GenerationError::new(kind).into())
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}
