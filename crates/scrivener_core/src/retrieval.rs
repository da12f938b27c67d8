//! Retrieved grounding passages.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Payload returned by a content retriever.
///
/// Field names follow the scraper service's wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RetrievedContent {
    /// Scraped passage
    #[serde(default)]
    content: Option<String>,
    /// Service-provided substitute when scraping found nothing
    #[serde(default)]
    fallback: Option<String>,
    /// Where the passage came from
    #[serde(default)]
    source: Option<String>,
    /// Service session identifier
    #[serde(default, rename = "sessionId")]
    session_id: Option<String>,
}

impl RetrievedContent {
    /// Content with only a passage.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Content with only a service fallback.
    pub fn from_fallback(fallback: impl Into<String>) -> Self {
        Self {
            fallback: Some(fallback.into()),
            ..Self::default()
        }
    }

    /// Attach a source label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The passage if non-blank, else the service fallback if non-blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use scrivener_core::RetrievedContent;
    ///
    /// assert_eq!(RetrievedContent::from_fallback("mist").usable_text(), Some("mist"));
    /// assert_eq!(RetrievedContent::from_content("  ").usable_text(), None);
    /// ```
    pub fn usable_text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .or_else(|| {
                self.fallback
                    .as_deref()
                    .filter(|text| !text.trim().is_empty())
            })
    }
}
