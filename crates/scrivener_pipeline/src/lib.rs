//! Chapter orchestration for Scrivener.
//!
//! [`ChapterOrchestrator`] drives the agents of `scrivener_agents` through a
//! fixed sequence of stages:
//!
//! 1. Intent: summary and predecessor to a chapter brief
//! 2. Scouting: summary to ordered plot points
//! 3. Style: genre to a cached style guide
//! 4. Weaving: per plot point, query, retrieve and weave one section
//! 5. Polish: one editing pass over the joined sections
//! 6. Extraction: characters and lore, concurrently
//!
//! The chapter and its metadata are then committed to the store as one unit
//! and read back. Agents absorb their own failures, so only request
//! validation, a rejected predecessor, cancellation, and persistence can fail
//! a request.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod health;
mod metrics;
mod orchestrator;
mod settings;
mod title;

pub use chain::{PassageSource, RetrievedPassage, RetrieverChain, placeholder_passage};
pub use health::{HealthReport, OverallHealth, ServiceHealth};
pub use metrics::MetricsObserver;
pub use orchestrator::ChapterOrchestrator;
pub use settings::PipelineSettings;
pub use title::derive_title;
