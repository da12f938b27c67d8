//! Error types for the Scrivener pipeline.
//!
//! This crate provides the foundation error types used throughout the Scrivener workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use scrivener_error::{RetrievalError, RetrievalErrorKind, ScrivenerResult};
//!
//! fn fetch_passage() -> ScrivenerResult<String> {
//!     Err(RetrievalError::new(RetrievalErrorKind::Status {
//!         service: "primary".to_string(),
//!         status: 502,
//!     }))?
//! }
//!
//! assert!(fetch_passage().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod generation;
mod json;
mod parse;
mod pipeline;
mod retrieval;
mod retry;
mod storage;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{ScrivenerError, ScrivenerErrorKind, ScrivenerResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::JsonError;
pub use parse::{ParseError, ParseErrorKind};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use retrieval::{RetrievalError, RetrievalErrorKind};
pub use retry::RetryableError;
pub use storage::{StorageError, StorageErrorKind};
