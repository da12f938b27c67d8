//! Core data types for the Scrivener chapter generation pipeline.
//!
//! This crate provides the domain values that flow between agents, the
//! orchestrator, and the chapter store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod brief;
mod chapter;
mod records;
mod request;
mod response;
mod retrieval;
mod style;

pub use brief::{ChapterBrief, PlotPoint};
pub use chapter::{Chapter, ChapterId, ChapterRequest, NewChapter};
pub use records::{CharacterRecord, LoreRecord};
pub use request::{GenerateRequest, GenerateRequestBuilder};
pub use response::{ChapterCommit, ChapterResult};
pub use retrieval::RetrievedContent;
pub use style::StyleGuide;
