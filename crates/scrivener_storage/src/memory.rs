//! In-memory chapter store.

use crate::StoreTables;
use async_trait::async_trait;
use chrono::Utc;
use scrivener_core::{
    Chapter, ChapterCommit, ChapterId, CharacterRecord, LoreRecord, NewChapter, StyleGuide,
};
use scrivener_error::ScrivenerResult;
use scrivener_interface::{ChapterFilter, ChapterStore};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChapterStore {
    tables: Arc<RwLock<StoreTables>>,
}

impl InMemoryChapterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing tables.
    pub fn with_tables(tables: StoreTables) -> Self {
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Copy of the current tables.
    pub async fn snapshot(&self) -> StoreTables {
        self.tables.read().await.clone()
    }
}

#[async_trait]
impl ChapterStore for InMemoryChapterStore {
    #[tracing::instrument(skip(self, chapter), fields(genre = %chapter.genre()))]
    async fn append_chapter(&self, chapter: &NewChapter) -> ScrivenerResult<ChapterId> {
        let id = self.tables.write().await.append_chapter(chapter, Utc::now())?;
        tracing::debug!(id = %id, "Appended chapter");
        Ok(id)
    }

    #[tracing::instrument(
        skip(self, commit),
        fields(characters = commit.characters().len(), lore = commit.lore().len())
    )]
    async fn commit(&self, commit: &ChapterCommit) -> ScrivenerResult<ChapterId> {
        let id = self.tables.write().await.commit(commit, Utc::now())?;
        tracing::debug!(id = %id, "Committed chapter");
        Ok(id)
    }

    async fn chapter(&self, id: ChapterId) -> ScrivenerResult<Option<Chapter>> {
        Ok(self.tables.read().await.chapter(id).cloned())
    }

    async fn latest_chapter(&self) -> ScrivenerResult<Option<Chapter>> {
        Ok(self.tables.read().await.latest_chapter().cloned())
    }

    async fn list_chapters(&self, filter: &ChapterFilter) -> ScrivenerResult<Vec<Chapter>> {
        Ok(self.tables.read().await.list_chapters(filter))
    }

    async fn upsert_characters(&self, characters: &[CharacterRecord]) -> ScrivenerResult<()> {
        self.tables.write().await.upsert_characters(characters);
        Ok(())
    }

    async fn upsert_lore(&self, lore: &[LoreRecord]) -> ScrivenerResult<()> {
        self.tables.write().await.upsert_lore(lore);
        Ok(())
    }

    async fn find_characters(&self, fragment: &str) -> ScrivenerResult<Vec<CharacterRecord>> {
        Ok(self.tables.read().await.find_characters(fragment))
    }

    async fn list_lore(&self, category: Option<&str>) -> ScrivenerResult<Vec<LoreRecord>> {
        Ok(self.tables.read().await.list_lore(category))
    }

    async fn style_guide(&self, genre: &str) -> ScrivenerResult<Option<StyleGuide>> {
        Ok(self.tables.read().await.style_guide(genre).cloned())
    }

    async fn store_style_guide(&self, genre: &str, guide: &StyleGuide) -> ScrivenerResult<()> {
        self.tables.write().await.store_style_guide(genre, guide);
        Ok(())
    }
}
