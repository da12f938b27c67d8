//! Store that refuses commits.

use async_trait::async_trait;
use scrivener_core::{
    Chapter, ChapterCommit, ChapterId, CharacterRecord, LoreRecord, NewChapter, StyleGuide,
};
use scrivener_error::{ScrivenerResult, StorageError, StorageErrorKind};
use scrivener_interface::{ChapterFilter, ChapterStore, HealthStatus};
use scrivener_storage::InMemoryChapterStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Reads from an in-memory store; every write fails.
#[derive(Clone, Default)]
pub struct FailingStore {
    inner: InMemoryChapterStore,
    rejected: Arc<AtomicUsize>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes refused so far.
    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }

    fn refuse<T>(&self) -> ScrivenerResult<T> {
        self.rejected.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::new(StorageErrorKind::FileWrite("disk full".to_string())).into())
    }
}

#[async_trait]
impl ChapterStore for FailingStore {
    async fn append_chapter(&self, _chapter: &NewChapter) -> ScrivenerResult<ChapterId> {
        self.refuse()
    }

    async fn commit(&self, _commit: &ChapterCommit) -> ScrivenerResult<ChapterId> {
        self.refuse()
    }

    async fn chapter(&self, id: ChapterId) -> ScrivenerResult<Option<Chapter>> {
        self.inner.chapter(id).await
    }

    async fn latest_chapter(&self) -> ScrivenerResult<Option<Chapter>> {
        self.inner.latest_chapter().await
    }

    async fn list_chapters(&self, filter: &ChapterFilter) -> ScrivenerResult<Vec<Chapter>> {
        self.inner.list_chapters(filter).await
    }

    async fn upsert_characters(&self, _characters: &[CharacterRecord]) -> ScrivenerResult<()> {
        self.refuse()
    }

    async fn upsert_lore(&self, _lore: &[LoreRecord]) -> ScrivenerResult<()> {
        self.refuse()
    }

    async fn find_characters(&self, fragment: &str) -> ScrivenerResult<Vec<CharacterRecord>> {
        self.inner.find_characters(fragment).await
    }

    async fn list_lore(&self, category: Option<&str>) -> ScrivenerResult<Vec<LoreRecord>> {
        self.inner.list_lore(category).await
    }

    async fn style_guide(&self, genre: &str) -> ScrivenerResult<Option<StyleGuide>> {
        self.inner.style_guide(genre).await
    }

    async fn store_style_guide(&self, _genre: &str, _guide: &StyleGuide) -> ScrivenerResult<()> {
        self.refuse()
    }

    async fn health(&self) -> HealthStatus {
        HealthStatus::Unhealthy {
            message: "read-only".to_string(),
        }
    }
}
