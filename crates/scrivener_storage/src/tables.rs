//! Record tables shared by every store implementation.

use chrono::{DateTime, Utc};
use scrivener_core::{
    Chapter, ChapterCommit, ChapterId, CharacterRecord, LoreRecord, NewChapter, StyleGuide,
};
use scrivener_error::{StorageError, StorageErrorKind};
use scrivener_interface::ChapterFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four persisted tables plus the chapter id counter.
///
/// This is also the on-disk document layout of [`FileChapterStore`](crate::FileChapterStore).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreTables {
    /// Last assigned chapter id (0 when empty)
    #[serde(default)]
    last_chapter_id: i64,
    /// Chapter history keyed by id
    #[serde(default)]
    chapters: BTreeMap<i64, Chapter>,
    /// Characters keyed by name
    #[serde(default)]
    characters: BTreeMap<String, CharacterRecord>,
    /// Lore records, unique by (category, name)
    #[serde(default)]
    lore: Vec<LoreRecord>,
    /// Style guides keyed by normalised genre
    #[serde(default)]
    style_guides: BTreeMap<String, StyleGuide>,
}

impl StoreTables {
    /// Normalised style guide key.
    pub fn genre_key(genre: &str) -> String {
        genre.trim().to_lowercase()
    }

    /// Number of stored chapters.
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Check that a chapter may be appended.
    pub fn validate_chapter(&self, chapter: &NewChapter) -> Result<(), StorageError> {
        if let Some(previous) = chapter.previous_chapter_id() {
            let predecessor = self.chapters.get(&previous.get()).ok_or_else(|| {
                StorageError::new(StorageErrorKind::DanglingReference(previous.get()))
            })?;
            let expected = predecessor.chapter_number().checked_add(1);
            if expected != Some(*chapter.chapter_number()) {
                return Err(StorageError::new(StorageErrorKind::ChapterSequence {
                    predecessor: *predecessor.chapter_number(),
                    actual: *chapter.chapter_number(),
                }));
            }
        }
        Ok(())
    }

    /// Append a chapter, assigning the next id.
    pub fn append_chapter(
        &mut self,
        chapter: &NewChapter,
        created_at: DateTime<Utc>,
    ) -> Result<ChapterId, StorageError> {
        self.validate_chapter(chapter)?;
        self.last_chapter_id += 1;
        let id = ChapterId::new(self.last_chapter_id);
        self.chapters
            .insert(id.get(), Chapter::from_new(id, chapter.clone(), created_at));
        Ok(id)
    }

    /// Append a chapter and upsert its metadata. Nothing changes on error.
    pub fn commit(
        &mut self,
        commit: &ChapterCommit,
        created_at: DateTime<Utc>,
    ) -> Result<ChapterId, StorageError> {
        let id = self.append_chapter(commit.chapter(), created_at)?;
        self.upsert_characters(commit.characters());
        self.upsert_lore(commit.lore());
        Ok(id)
    }

    /// Chapter by id.
    pub fn chapter(&self, id: ChapterId) -> Option<&Chapter> {
        self.chapters.get(&id.get())
    }

    /// Chapter with the highest id.
    pub fn latest_chapter(&self) -> Option<&Chapter> {
        self.chapters.values().next_back()
    }

    /// Chapters matching the filter, newest first.
    pub fn list_chapters(&self, filter: &ChapterFilter) -> Vec<Chapter> {
        let mut chapters: Vec<Chapter> = self
            .chapters
            .values()
            .filter(|chapter| filter.matches_genre(chapter.genre()))
            .cloned()
            .collect();
        chapters.sort_by(|a, b| {
            b.created_at()
                .cmp(a.created_at())
                .then_with(|| b.id().cmp(a.id()))
        });
        if let Some(limit) = filter.limit() {
            chapters.truncate(*limit);
        }
        chapters
    }

    /// Insert or replace characters by name. Blank names are skipped.
    pub fn upsert_characters(&mut self, characters: &[CharacterRecord]) {
        for character in characters {
            if character.name().trim().is_empty() {
                continue;
            }
            self.characters
                .insert(character.name().clone(), character.clone());
        }
    }

    /// Insert or replace lore by (category, name). Blank names are skipped.
    pub fn upsert_lore(&mut self, lore: &[LoreRecord]) {
        for record in lore {
            if record.name().trim().is_empty() {
                continue;
            }
            match self.lore.iter_mut().find(|existing| existing.key() == record.key()) {
                Some(existing) => *existing = record.clone(),
                None => self.lore.push(record.clone()),
            }
        }
    }

    /// Characters whose name contains `fragment`, case-insensitively, by name.
    pub fn find_characters(&self, fragment: &str) -> Vec<CharacterRecord> {
        let needle = fragment.trim().to_lowercase();
        self.characters
            .values()
            .filter(|character| character.name().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Lore, optionally restricted to one category (case-insensitive), by category then name.
    pub fn list_lore(&self, category: Option<&str>) -> Vec<LoreRecord> {
        let mut lore: Vec<LoreRecord> = self
            .lore
            .iter()
            .filter(|record| {
                category.is_none_or(|wanted| record.category().eq_ignore_ascii_case(wanted.trim()))
            })
            .cloned()
            .collect();
        lore.sort_by_key(LoreRecord::key);
        lore
    }

    /// Stored style guide for a genre.
    pub fn style_guide(&self, genre: &str) -> Option<&StyleGuide> {
        self.style_guides.get(&Self::genre_key(genre))
    }

    /// Insert or replace the style guide for a genre.
    pub fn store_style_guide(&mut self, genre: &str, guide: &StyleGuide) {
        self.style_guides
            .insert(Self::genre_key(genre), guide.clone());
    }
}
