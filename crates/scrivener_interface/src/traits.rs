//! Collaborator trait definitions.

use crate::{ChapterFilter, HealthStatus};
use async_trait::async_trait;
use scrivener_core::{
    Chapter, ChapterCommit, ChapterId, CharacterRecord, GenerateRequest, LoreRecord, NewChapter,
    RetrievedContent, StyleGuide,
};
use scrivener_error::ScrivenerResult;

/// Opaque text generation capability.
///
/// Any transport, quota, or decoding problem is reported as an error; callers
/// decide how to degrade.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a prompt.
    async fn generate(&self, request: &GenerateRequest) -> ScrivenerResult<String>;

    /// Provider name (e.g., "openrouter", "offline").
    fn provider_name(&self) -> &'static str;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

/// Source of human-written descriptive passages.
#[async_trait]
pub trait ContentRetriever: Send + Sync {
    /// Fetch grounding content for a search query.
    async fn fetch(&self, query: &str) -> ScrivenerResult<RetrievedContent>;

    /// Name used in logs and health reports.
    fn name(&self) -> &str;

    /// Probe the backing service.
    async fn health(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}

/// Durable record store for chapters and their metadata.
///
/// Chapters are append-only and form back-linked threads. Character, lore, and
/// style-guide records are upserted by key (last write wins).
#[async_trait]
pub trait ChapterStore: Send + Sync {
    /// Append a chapter, assigning its id and timestamp.
    ///
    /// Implementations reject a `previous_chapter_id` that does not reference
    /// an existing chapter.
    async fn append_chapter(&self, chapter: &NewChapter) -> ScrivenerResult<ChapterId>;

    /// Append a chapter and upsert its metadata as one unit.
    async fn commit(&self, commit: &ChapterCommit) -> ScrivenerResult<ChapterId>;

    /// Look a chapter up by id.
    async fn chapter(&self, id: ChapterId) -> ScrivenerResult<Option<Chapter>>;

    /// The most recently created chapter.
    async fn latest_chapter(&self) -> ScrivenerResult<Option<Chapter>>;

    /// Chapters matching the filter, newest first.
    async fn list_chapters(&self, filter: &ChapterFilter) -> ScrivenerResult<Vec<Chapter>>;

    /// Insert or replace characters by name.
    async fn upsert_characters(&self, characters: &[CharacterRecord]) -> ScrivenerResult<()>;

    /// Insert or replace lore by category and name.
    async fn upsert_lore(&self, lore: &[LoreRecord]) -> ScrivenerResult<()>;

    /// Characters whose name contains `fragment`, case-insensitively.
    async fn find_characters(&self, fragment: &str) -> ScrivenerResult<Vec<CharacterRecord>>;

    /// Lore records, optionally restricted to one category.
    async fn list_lore(&self, category: Option<&str>) -> ScrivenerResult<Vec<LoreRecord>>;

    /// Stored style guide for a genre.
    async fn style_guide(&self, genre: &str) -> ScrivenerResult<Option<StyleGuide>>;

    /// Insert or replace the style guide for a genre.
    async fn store_style_guide(&self, genre: &str, guide: &StyleGuide) -> ScrivenerResult<()>;

    /// Probe the store.
    async fn health(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}
