//! Chapter requests and persisted chapters.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use scrivener_error::{PipelineError, PipelineErrorKind, ScrivenerResult};
use serde::{Deserialize, Serialize};

/// Store-assigned chapter identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ChapterId(i64);

impl ChapterId {
    /// Wrap a raw identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

/// Inbound request for one chapter.
///
/// # Examples
///
/// ```
/// use scrivener_core::{ChapterId, ChapterRequest};
///
/// let request = ChapterRequest::new("A lighthouse keeper finds a door in the sea", "fantasy")
///     .with_previous_chapter_id(Some(ChapterId::new(3)));
///
/// assert_eq!(request.genre(), "fantasy");
/// assert!(request.validate().is_ok());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct ChapterRequest {
    /// Story summary the chapter should realise
    summary: String,
    /// Free-form genre label
    genre: String,
    /// Chapter this one continues, if any
    #[serde(default)]
    previous_chapter_id: Option<ChapterId>,
}

impl ChapterRequest {
    /// Create a request that starts a fresh thread.
    pub fn new(summary: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            genre: genre.into(),
            previous_chapter_id: None,
        }
    }

    /// Check the request invariants.
    ///
    /// # Errors
    ///
    /// Returns a pipeline error when the summary is blank.
    pub fn validate(&self) -> ScrivenerResult<()> {
        if self.summary.trim().is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::InvalidRequest(
                "summary must not be empty".to_string(),
            ))
            .into());
        }
        Ok(())
    }
}

/// A chapter before the store has assigned its id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct NewChapter {
    /// Summary the chapter was generated from
    #[new(into)]
    summary: String,
    /// Genre label
    #[new(into)]
    genre: String,
    /// Final polished text
    #[new(into)]
    content: String,
    /// Position in its thread, starting at 1
    chapter_number: u32,
    /// Back-reference to the predecessor
    previous_chapter_id: Option<ChapterId>,
}

/// A persisted chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Chapter {
    /// Store-assigned identifier
    id: ChapterId,
    /// Summary the chapter was generated from
    summary: String,
    /// Genre label
    genre: String,
    /// Final polished text
    content: String,
    /// Position in its thread, starting at 1
    chapter_number: u32,
    /// Back-reference to the predecessor
    previous_chapter_id: Option<ChapterId>,
    /// When the store accepted the chapter
    created_at: DateTime<Utc>,
}

impl Chapter {
    /// Materialise a stored chapter from its unsaved form.
    pub fn from_new(id: ChapterId, chapter: NewChapter, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            summary: chapter.summary,
            genre: chapter.genre,
            content: chapter.content,
            chapter_number: chapter.chapter_number,
            previous_chapter_id: chapter.previous_chapter_id,
            created_at,
        }
    }

    /// Number of whitespace-separated words in the content.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_summary_is_rejected() {
        let request = ChapterRequest::new("   ", "mystery");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_chapter_id_is_transparent_in_json() -> anyhow::Result<()> {
        let request = ChapterRequest::new("summary", "horror")
            .with_previous_chapter_id(Some(ChapterId::new(12)));
        let json = serde_json::to_value(&request)?;
        assert_eq!(json["previous_chapter_id"], serde_json::json!(12));
        Ok(())
    }

    #[test]
    fn test_missing_previous_id_deserializes_as_none() -> anyhow::Result<()> {
        let request: ChapterRequest =
            serde_json::from_str(r#"{"summary": "s", "genre": "romance"}"#)?;
        assert_eq!(*request.previous_chapter_id(), None);
        Ok(())
    }
}
