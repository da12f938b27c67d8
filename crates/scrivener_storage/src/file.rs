//! JSON document chapter store.

use crate::StoreTables;
use async_trait::async_trait;
use chrono::Utc;
use scrivener_core::{
    Chapter, ChapterCommit, ChapterId, CharacterRecord, LoreRecord, NewChapter, StyleGuide,
};
use scrivener_error::{ScrivenerResult, StorageError, StorageErrorKind};
use scrivener_interface::{ChapterFilter, ChapterStore, HealthStatus};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Store that keeps every table in one JSON file.
///
/// # Features
///
/// - **Atomic writes**: each mutation is applied to a copy of the tables,
///   written to a temp file and renamed over the document; memory is updated
///   only after the rename succeeds
/// - **Serialized writers**: mutations hold the write lock across the file write
/// - **Concurrent readers**: lookups are served from memory
#[derive(Debug)]
pub struct FileChapterStore {
    path: PathBuf,
    tables: RwLock<StoreTables>,
}

impl FileChapterStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts an empty store; it is created on the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or an existing
    /// document cannot be read or decoded.
    #[tracing::instrument(skip(path))]
    pub async fn open(path: impl Into<PathBuf>) -> ScrivenerResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let tables = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StorageError::new(StorageErrorKind::Serialization(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreTables::default(),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        tracing::info!(
            path = %path.display(),
            chapters = tables.chapter_count(),
            "Opened chapter store"
        );

        Ok(Self {
            path,
            tables: RwLock::new(tables),
        })
    }

    /// Location of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut StoreTables) -> Result<T, StorageError>,
    ) -> ScrivenerResult<T> {
        let mut guard = self.tables.write().await;
        let mut next = guard.clone();
        let value = apply(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(value)
    }

    async fn persist(&self, tables: &StoreTables) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(tables)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %self.path.display(), size = bytes.len(), "Persisted chapter store");
        Ok(())
    }
}

#[async_trait]
impl ChapterStore for FileChapterStore {
    #[tracing::instrument(skip(self, chapter), fields(genre = %chapter.genre()))]
    async fn append_chapter(&self, chapter: &NewChapter) -> ScrivenerResult<ChapterId> {
        let now = Utc::now();
        self.mutate(|tables| tables.append_chapter(chapter, now)).await
    }

    #[tracing::instrument(
        skip(self, commit),
        fields(characters = commit.characters().len(), lore = commit.lore().len())
    )]
    async fn commit(&self, commit: &ChapterCommit) -> ScrivenerResult<ChapterId> {
        let now = Utc::now();
        let id = self.mutate(|tables| tables.commit(commit, now)).await?;
        tracing::info!(id = %id, path = %self.path.display(), "Committed chapter");
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
        self.mutate(|tables| {
            tables.upsert_characters(characters);
            Ok(())
        })
        .await
    }

    async fn upsert_lore(&self, lore: &[LoreRecord]) -> ScrivenerResult<()> {
        self.mutate(|tables| {
            tables.upsert_lore(lore);
            Ok(())
        })
        .await
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
        self.mutate(|tables| {
            tables.store_style_guide(genre, guide);
            Ok(())
        })
        .await
    }

    async fn health(&self) -> HealthStatus {
        let directory = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        match tokio::fs::metadata(directory).await {
            Ok(meta) if meta.is_dir() => HealthStatus::Healthy,
            Ok(_) => HealthStatus::Unhealthy {
                message: format!("{} is not a directory", directory.display()),
            },
            Err(e) => HealthStatus::Unreachable {
                message: format!("{}: {}", directory.display(), e),
            },
        }
    }
}
