//! Shared collaborators for every agent.

use scrivener_core::GenerateRequest;
use scrivener_error::{
    BuilderError, GenerationError, GenerationErrorKind, ScrivenerError, ScrivenerResult,
};
use scrivener_interface::{PipelineObserver, Stage, StageEvent, TextGenerator, TracingObserver};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Deadline applied to every generation call unless overridden.
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(45);

/// Generator, event sink, and deadline shared by the agents of one orchestrator.
///
/// Cloning is cheap; clones share the generator and observer.
#[derive(Clone)]
pub struct AgentContext {
    generator: Arc<dyn TextGenerator>,
    observer: Arc<dyn PipelineObserver>,
    timeout: Duration,
}

impl std::fmt::Debug for AgentContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentContext")
            .field("provider", &self.generator.provider_name())
            .field("model", &self.generator.model_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AgentContext {
    /// Context that reports events through `tracing`.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            observer: Arc::new(TracingObserver),
            timeout: DEFAULT_AGENT_TIMEOUT,
        }
    }

    /// Replace the event sink.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-call deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The shared event sink.
    pub fn observer(&self) -> &Arc<dyn PipelineObserver> {
        &self.observer
    }

    /// Build a generation request from an agent's template parameters.
    pub fn request(
        prompt: String,
        system_message: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> ScrivenerResult<GenerateRequest> {
        GenerateRequest::builder()
            .prompt(prompt)
            .system_message(Some(system_message.to_string()))
            .max_tokens(max_tokens)
            .temperature(temperature)
            .build()
            .map_err(|e| BuilderError::incomplete("GenerateRequest", e).into())
    }

    /// Call the generator, failing with a timeout error once the deadline passes.
    pub async fn generate(&self, request: &GenerateRequest) -> ScrivenerResult<String> {
        match tokio::time::timeout(self.timeout, self.generator.generate(request)).await {
            Ok(result) => result,
            Err(_) => {
                let millis = self.timeout.as_millis() as u64;
                Err(GenerationError::new(GenerationErrorKind::Timeout(millis)).into())
            }
        }
    }

    /// Run one stage, substituting `fallback` when `work` fails.
    ///
    /// Exactly one [`StageEvent`] is recorded per call.
    pub async fn attempt<T, Fut>(
        &self,
        stage: Stage,
        work: Fut,
        fallback: impl FnOnce() -> T,
    ) -> T
    where
        Fut: Future<Output = ScrivenerResult<T>>,
    {
        let started = Instant::now();
        match work.await {
            Ok(value) => {
                self.emit(stage, started, false, None);
                value
            }
            Err(e) => {
                tracing::warn!(stage = %stage, error = %e, "Agent falling back");
                self.emit(stage, started, true, Some(describe(&e)));
                fallback()
            }
        }
    }

    /// Record a stage event measured from `started`.
    pub fn emit(&self, stage: Stage, started: Instant, fallback: bool, detail: Option<String>) {
        let event = StageEvent::new(stage, started.elapsed(), fallback);
        let event = match detail {
            Some(detail) => event.with_detail(detail),
            None => event,
        };
        self.observer.record(&event);
    }
}

fn describe(error: &ScrivenerError) -> String {
    error.kind().to_string()
}
