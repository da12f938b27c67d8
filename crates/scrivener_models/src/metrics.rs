//! OpenTelemetry metrics for model calls.
//!
//! Instruments are created against the global meter provider. Without an
//! installed provider they are no-ops.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use scrivener_error::GenerationErrorKind;
use std::sync::OnceLock;

static METRICS: OnceLock<LlmMetrics> = OnceLock::new();

/// Request, error, latency, and token instruments labeled by provider and model.
#[derive(Clone)]
pub struct LlmMetrics {
    _meter: Meter,
    /// Total model requests
    pub requests: Counter<u64>,
    /// Failed model requests
    pub errors: Counter<u64>,
    /// Retried attempts
    pub retries: Counter<u64>,
    /// Call duration in seconds
    pub duration: Histogram<f64>,
    /// Prompt tokens reported by the provider
    pub prompt_tokens: Counter<u64>,
    /// Completion tokens reported by the provider
    pub completion_tokens: Counter<u64>,
}

impl LlmMetrics {
    fn init() -> Self {
        let meter = global::meter("scrivener_llm");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("llm.requests")
                .with_description("Total model API requests")
                .build(),
            errors: meter
                .u64_counter("llm.errors")
                .with_description("Failed model API requests")
                .build(),
            retries: meter
                .u64_counter("llm.retries")
                .with_description("Retried model API attempts")
                .build(),
            duration: meter
                .f64_histogram("llm.duration")
                .with_unit("seconds")
                .with_description("Model API call duration")
                .build(),
            prompt_tokens: meter
                .u64_counter("llm.tokens.prompt")
                .with_description("Prompt tokens used")
                .build(),
            completion_tokens: meter
                .u64_counter("llm.tokens.completion")
                .with_description("Completion tokens used")
                .build(),
        }
    }

    /// Global instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a successful call.
    pub fn record_request(&self, provider: &str, model: &str, duration_secs: f64) {
        let labels = labels(provider, model);
        self.requests.add(1, &labels);
        self.duration.record(duration_secs, &labels);
    }

    /// Record a failed call.
    pub fn record_error(&self, provider: &str, model: &str, kind: &GenerationErrorKind) {
        let mut labels = labels(provider, model).to_vec();
        labels.push(KeyValue::new("error_type", classify_error(kind)));
        self.errors.add(1, &labels);
    }

    /// Record a retried attempt.
    pub fn record_retry(&self, provider: &str, model: &str) {
        self.retries.add(1, &labels(provider, model));
    }

    /// Record token usage.
    pub fn record_tokens(&self, model: &str, prompt_tokens: u64, completion_tokens: u64) {
        let labels = &[KeyValue::new("model", model.to_string())];
        self.prompt_tokens.add(prompt_tokens, labels);
        self.completion_tokens.add(completion_tokens, labels);
    }
}

fn labels(provider: &str, model: &str) -> [KeyValue; 2] {
    [
        KeyValue::new("provider", provider.to_string()),
        KeyValue::new("model", model.to_string()),
    ]
}

/// Metric label for an error kind.
///
/// Returns one of: "auth", "rate_limit", "timeout", "network", "server",
/// "client", "parse", "empty", "unavailable".
pub fn classify_error(kind: &GenerationErrorKind) -> &'static str {
    match kind {
        GenerationErrorKind::MissingApiKey(_) => "auth",
        GenerationErrorKind::RateLimited => "rate_limit",
        GenerationErrorKind::Api { status: 429, .. } => "rate_limit",
        GenerationErrorKind::Api {
            status: 401 | 403, ..
        } => "auth",
        GenerationErrorKind::Api { status: 408, .. } => "timeout",
        GenerationErrorKind::Api { status, .. } if *status >= 500 => "server",
        GenerationErrorKind::Api { .. } => "client",
        GenerationErrorKind::Timeout(_) => "timeout",
        GenerationErrorKind::Http(_) => "network",
        GenerationErrorKind::ResponseParsing(_) => "parse",
        GenerationErrorKind::EmptyResponse => "empty",
        GenerationErrorKind::Unavailable(_) => "unavailable",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_error_labels() {
        assert_eq!(classify_error(&GenerationErrorKind::RateLimited), "rate_limit");
        assert_eq!(
            classify_error(&GenerationErrorKind::Api {
                status: 503,
                message: String::new()
            }),
            "server"
        );
        assert_eq!(
            classify_error(&GenerationErrorKind::Api {
                status: 401,
                message: String::new()
            }),
            "auth"
        );
        assert_eq!(classify_error(&GenerationErrorKind::EmptyResponse), "empty");
    }

    #[test]
    fn test_recording_without_provider_is_noop() {
        let metrics = LlmMetrics::get();
        metrics.record_request("openrouter", "google/gemini-pro", 0.25);
        metrics.record_error(
            "openrouter",
            "google/gemini-pro",
            &GenerationErrorKind::EmptyResponse,
        );
        metrics.record_tokens("google/gemini-pro", 10, 20);
    }
}
