//! Scrivener - multi-agent chapter generation
//!
//! Scrivener turns a story summary and a genre into a finished chapter. A
//! fixed sequence of prompt-driven agents briefs, outlines, styles, grounds,
//! weaves, and polishes the chapter; characters and lore are then extracted
//! and persisted alongside it, so later chapters can continue the thread.
//!
//! Every agent has a deterministic fallback, so a chapter is produced even
//! when the language model or the retrieval services are down.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scrivener::{ChapterRequest, ScrivenerConfig, build_orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScrivenerConfig::load()?;
//!     let orchestrator = build_orchestrator(&config, false).await?;
//!
//!     let request = ChapterRequest::new(
//!         "A young woman discovers magical powers on her 18th birthday",
//!         "fantasy",
//!     );
//!     let chapter = orchestrator.generate(&request).await?;
//!     println!("{}\n\n{}", chapter.title(), chapter.content());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - export spans and pipeline metrics through OpenTelemetry
//!
//! # Architecture
//!
//! Scrivener is organized as a workspace with focused crates:
//!
//! - `scrivener_error` - Error types
//! - `scrivener_core` - Requests, chapters, records, style guides
//! - `scrivener_interface` - Collaborator traits and stage events
//! - `scrivener_cache` - TTL cache for style guides
//! - `scrivener_config` - Layered configuration
//! - `scrivener_models` - OpenRouter generator and the offline stand-in
//! - `scrivener_retrieval` - HTTP scraper retrievers
//! - `scrivener_storage` - In-memory and file-backed chapter stores
//! - `scrivener_agents` - The seven pipeline agents
//! - `scrivener_pipeline` - The chapter orchestrator
//!
//! This crate (`scrivener`) re-exports the public surface and wires the pieces
//! together from configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bootstrap;
mod observability;

pub use bootstrap::{
    build_orchestrator, is_usable_api_key, open_store, retriever_chain, select_generator,
};
pub use observability::{LogFormat, ObservabilityConfig, ObservabilityGuard, init_observability};

// Re-export core crates
pub use scrivener_config::*;
pub use scrivener_core::*;
pub use scrivener_error::*;
pub use scrivener_interface::*;
pub use scrivener_pipeline::*;
pub use scrivener_storage::*;

pub use scrivener_agents::{AgentContext, AgentRoster};
pub use scrivener_cache::{TtlCache, TtlCacheConfig};
pub use scrivener_models::{OpenRouterClient, RetrySettings, UnavailableGenerator};
pub use scrivener_retrieval::ScraperClient;
