//! Pipeline output and the unit of persistence.

use crate::{ChapterId, CharacterRecord, LoreRecord, NewChapter};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A chapter together with the metadata extracted from it.
///
/// Stores persist a commit as one unit: either every part lands or none does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct ChapterCommit {
    /// Chapter to append
    chapter: NewChapter,
    /// Characters to upsert by name
    characters: Vec<CharacterRecord>,
    /// Lore to upsert by category and name
    lore: Vec<LoreRecord>,
}

/// Response returned for a generated chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ChapterResult {
    /// Store-assigned identifier
    chapter_id: ChapterId,
    /// Derived title
    title: String,
    /// Final polished text
    content: String,
    /// Whitespace-separated word count of `content`
    word_count: usize,
    /// Formatted style guide used for the chapter
    style_guide: String,
    /// Extracted characters
    characters: Vec<CharacterRecord>,
    /// Extracted lore
    lore: Vec<LoreRecord>,
    /// Position in the thread
    chapter_number: u32,
    /// Predecessor, when the chapter continues a thread
    #[builder(default)]
    previous_chapter_id: Option<ChapterId>,
}

impl ChapterResult {
    /// Start building a result.
    pub fn builder() -> ChapterResultBuilder {
        ChapterResultBuilder::default()
    }
}
