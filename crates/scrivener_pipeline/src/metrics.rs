//! OpenTelemetry instruments fed by stage events.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use scrivener_interface::{PipelineObserver, StageEvent};
use std::sync::OnceLock;

static INSTRUMENTS: OnceLock<StageInstruments> = OnceLock::new();

struct StageInstruments {
    duration: Histogram<f64>,
    completed: Counter<u64>,
    fallbacks: Counter<u64>,
}

impl StageInstruments {
    fn get() -> &'static Self {
        INSTRUMENTS.get_or_init(|| {
            let meter = global::meter("scrivener_pipeline");
            Self {
                duration: meter
                    .f64_histogram("pipeline.stage.duration")
                    .with_unit("seconds")
                    .with_description("Stage wall-clock duration")
                    .build(),
                completed: meter
                    .u64_counter("pipeline.stage.completed")
                    .with_description("Stage events recorded")
                    .build(),
                fallbacks: meter
                    .u64_counter("pipeline.fallbacks")
                    .with_description("Stages that substituted deterministic output")
                    .build(),
            }
        })
    }
}

/// Observer that records stage durations and fallback counts, labelled by stage.
///
/// Instruments are no-ops until a meter provider is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObserver;

impl MetricsObserver {
    /// Create the observer.
    pub fn new() -> Self {
        Self
    }
}

impl PipelineObserver for MetricsObserver {
    fn record(&self, event: &StageEvent) {
        let instruments = StageInstruments::get();
        let labels = [
            KeyValue::new("stage", event.stage().as_ref().to_string()),
            KeyValue::new("fallback", *event.fallback()),
        ];
        instruments
            .duration
            .record(event.duration().as_secs_f64(), &labels);
        instruments.completed.add(1, &labels);
        if *event.fallback() {
            instruments
                .fallbacks
                .add(1, &[KeyValue::new("stage", event.stage().as_ref().to_string())]);
        }
    }
}
