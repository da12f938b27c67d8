//! Collaborator traits for the Scrivener pipeline.
//!
//! The orchestrator and agents only ever talk to the outside world through the
//! traits defined here:
//!
//! - [`TextGenerator`]: prompt in, text out
//! - [`ContentRetriever`]: query in, grounding passage out
//! - [`ChapterStore`]: durable chapters, metadata records, and style guides
//! - [`PipelineObserver`]: sink for structured [`StageEvent`]s

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filter;
mod health;
mod observer;
mod traits;

pub use filter::ChapterFilter;
pub use health::HealthStatus;
pub use observer::{
    FanoutObserver, NoopObserver, PipelineObserver, RecordingObserver, Stage, StageEvent,
    TracingObserver,
};
pub use traits::{ChapterStore, ContentRetriever, TextGenerator};
