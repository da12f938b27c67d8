//! Configuration for the Scrivener chapter pipeline.
//!
//! Values are layered in this order, later sources winning:
//! - Bundled defaults (`scrivener.toml` shipped with this crate)
//! - `~/.config/scrivener/scrivener.toml`
//! - `./scrivener.toml`
//! - `SCRIVENER__<SECTION>__<KEY>` environment variables
//! - Legacy variables (`SCRAPER_SERVICE_URL`, `FALLBACK_SCRAPER_URL`, `GEMINI_MODEL`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod loader;
mod sections;

pub use loader::ScrivenerConfig;
pub use sections::{
    GeneratorConfig, MissingPredecessorPolicy, PipelineConfig, RetrievalConfig, StorageBackend,
    StorageConfig,
};
