//! Language model clients for Scrivener.
//!
//! [`OpenRouterClient`] talks to an OpenAI-compatible chat completions gateway
//! with client-side rate limiting, retry on transient failures, and
//! OpenTelemetry metrics. [`UnavailableGenerator`] stands in when no model is
//! configured.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod limiter;
mod metrics;
mod offline;
mod openrouter;

pub use limiter::{RequestLimiter, RequestPermit};
pub use metrics::{LlmMetrics, classify_error};
pub use offline::UnavailableGenerator;
pub use openrouter::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatUsage,
    ChoiceMessage, OpenRouterClient, RetrySettings,
};
