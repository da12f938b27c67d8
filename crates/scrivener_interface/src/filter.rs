//! Chapter listing filters.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Filter criteria for listing chapters.
///
/// All fields are optional. Combining criteria creates an AND condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChapterFilter {
    /// Filter by genre (case-insensitive exact match)
    genre: Option<String>,
    /// Maximum number of results to return
    limit: Option<usize>,
}

impl ChapterFilter {
    /// Create an empty filter (returns all chapters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by genre.
    pub fn with_genre<S: Into<String>>(mut self, genre: S) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Set result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a chapter genre passes the genre criterion.
    pub fn matches_genre(&self, genre: &str) -> bool {
        self.genre
            .as_deref()
            .is_none_or(|wanted| wanted.eq_ignore_ascii_case(genre))
    }
}
