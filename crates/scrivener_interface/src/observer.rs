//! Structured pipeline events and the sinks that receive them.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A unit of pipeline work that reports an event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Brief creation
    Intent,
    /// Summary to plot points
    Deconstruct,
    /// Genre style guide
    Style,
    /// Search query for one plot point
    Query,
    /// Grounding passage for one plot point
    Retrieval,
    /// One woven section
    Weave,
    /// Whole-chapter polish
    Polish,
    /// Character extraction
    Characters,
    /// Lore extraction
    Lore,
    /// Chapter commit and read-back
    Persist,
    /// The whole request
    Chapter,
}

/// One structured observation emitted by an agent or the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct StageEvent {
    /// Which stage finished
    stage: Stage,
    /// Wall-clock time the stage took
    duration: Duration,
    /// Whether a deterministic fallback replaced generated output
    fallback: bool,
    /// Extra context (cache tier, retriever name, error text)
    detail: Option<String>,
}

impl StageEvent {
    /// Create an event without detail.
    pub fn new(stage: Stage, duration: Duration, fallback: bool) -> Self {
        Self {
            stage,
            duration,
            fallback,
            detail: None,
        }
    }

    /// Attach detail text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Sink for pipeline events.
///
/// Recording must be cheap and must not fail; sinks that do I/O should buffer.
pub trait PipelineObserver: Send + Sync {
    /// Receive one event.
    fn record(&self, event: &StageEvent);
}

/// Emits every event as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn record(&self, event: &StageEvent) {
        let duration_ms = event.duration.as_millis() as u64;
        let detail = event.detail.as_deref().unwrap_or("");
        if event.fallback {
            tracing::warn!(
                stage = %event.stage,
                duration_ms,
                fallback = true,
                detail,
                "Stage fell back to deterministic output"
            );
        } else {
            tracing::info!(
                stage = %event.stage,
                duration_ms,
                fallback = false,
                detail,
                "Stage completed"
            );
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn record(&self, _event: &StageEvent) {}
}

/// Keeps every event in memory, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<StageEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events in arrival order.
    pub fn events(&self) -> Vec<StageEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Recorded events for one stage.
    pub fn events_for(&self, stage: Stage) -> Vec<StageEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.stage == stage)
            .collect()
    }

    /// Number of fallback events recorded for one stage.
    pub fn fallback_count(&self, stage: Stage) -> usize {
        self.events_for(stage)
            .iter()
            .filter(|event| event.fallback)
            .count()
    }
}

impl PipelineObserver for RecordingObserver {
    fn record(&self, event: &StageEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

/// Forwards every event to several observers.
#[derive(Clone, Default)]
pub struct FanoutObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl FanoutObserver {
    /// Create an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a downstream observer.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl PipelineObserver for FanoutObserver {
    fn record(&self, event: &StageEvent) {
        for observer in &self.observers {
            observer.record(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names_are_snake_case() {
        assert_eq!(Stage::Deconstruct.to_string(), "deconstruct");
        assert_eq!(Stage::Characters.as_ref(), "characters");
    }

    #[test]
    fn test_fanout_reaches_every_observer() {
        let first = Arc::new(RecordingObserver::new());
        let second = Arc::new(RecordingObserver::new());
        let fanout = FanoutObserver::new()
            .with_observer(first.clone())
            .with_observer(second.clone());

        fanout.record(&StageEvent::new(Stage::Polish, Duration::from_millis(5), true));

        assert_eq!(first.fallback_count(Stage::Polish), 1);
        assert_eq!(second.events().len(), 1);
    }
}
