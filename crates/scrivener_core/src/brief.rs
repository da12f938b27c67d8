//! Per-request intermediate values.

use serde::{Deserialize, Serialize};

/// Free-text guidance produced once per request and read by later stages.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ChapterBrief(String);

impl ChapterBrief {
    /// Wrap brief text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the brief text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first `limit` characters of the brief, for prompts that only need context.
    pub fn excerpt(&self, limit: usize) -> String {
        self.0.chars().take(limit).collect()
    }
}

/// One ordered story beat derived from the summary.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct PlotPoint(String);

impl PlotPoint {
    /// Wrap a beat sentence.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the beat text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlotPoint {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
