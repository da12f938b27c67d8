//! Ordered retrieval with a synthesized last resort.

use derive_getters::Getters;
use scrivener_interface::{ContentRetriever, HealthStatus};
use std::sync::Arc;
use std::time::Duration;

/// Deadline for one retriever call.
const DEFAULT_RETRIEVAL_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a passage came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassageSource {
    /// Returned by the named retriever
    Retriever(String),
    /// No retriever produced usable text
    Placeholder,
}

/// Grounding text for one plot point.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RetrievedPassage {
    /// Passage text, never blank
    text: String,
    /// Which tier produced it
    source: PassageSource,
}

/// Placeholder passage used when every retriever fails.
///
/// # Examples
///
/// ```
/// use scrivener_pipeline::placeholder_passage;
///
/// assert_eq!(
///     placeholder_passage("foggy harbor at dawn"),
///     "Descriptive content related to: foggy harbor at dawn"
/// );
/// ```
pub fn placeholder_passage(query: &str) -> String {
    format!("Descriptive content related to: {}", query)
}

/// Retrievers tried in order until one returns usable text.
///
/// An empty chain always yields the placeholder.
#[derive(Clone)]
pub struct RetrieverChain {
    retrievers: Vec<Arc<dyn ContentRetriever>>,
    timeout: Duration,
}

impl Default for RetrieverChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RetrieverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrieverChain")
            .field("retrievers", &self.names())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RetrieverChain {
    /// Chain with no retrievers.
    pub fn new() -> Self {
        Self {
            retrievers: Vec::new(),
            timeout: DEFAULT_RETRIEVAL_TIMEOUT,
        }
    }

    /// Append a retriever after the existing ones.
    pub fn with_retriever(mut self, retriever: Arc<dyn ContentRetriever>) -> Self {
        self.retrievers.push(retriever);
        self
    }

    /// Replace the per-retriever deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retriever names in try order.
    pub fn names(&self) -> Vec<String> {
        self.retrievers
            .iter()
            .map(|retriever| retriever.name().to_string())
            .collect()
    }

    /// Number of retrievers.
    pub fn len(&self) -> usize {
        self.retrievers.len()
    }

    /// Whether the chain has no retrievers.
    pub fn is_empty(&self) -> bool {
        self.retrievers.is_empty()
    }

    /// First usable passage for `query`, or the placeholder.
    #[tracing::instrument(skip(self), fields(retrievers = self.retrievers.len()))]
    pub async fn fetch(&self, query: &str) -> RetrievedPassage {
        for retriever in &self.retrievers {
            let name = retriever.name();
            match tokio::time::timeout(self.timeout, retriever.fetch(query)).await {
                Ok(Ok(content)) => match content.usable_text() {
                    Some(text) => {
                        tracing::debug!(retriever = name, "Retrieved passage");
                        return RetrievedPassage {
                            text: text.to_string(),
                            source: PassageSource::Retriever(name.to_string()),
                        };
                    }
                    None => tracing::warn!(retriever = name, "Retriever returned no usable text"),
                },
                Ok(Err(e)) => tracing::warn!(retriever = name, error = %e, "Retriever failed"),
                Err(_) => tracing::warn!(
                    retriever = name,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Retriever timed out"
                ),
            }
        }

        RetrievedPassage {
            text: placeholder_passage(query),
            source: PassageSource::Placeholder,
        }
    }

    /// Probe every retriever concurrently, in chain order.
    pub async fn health(&self) -> Vec<(String, HealthStatus)> {
        let probes = self.retrievers.iter().map(|retriever| async move {
            (retriever.name().to_string(), retriever.health().await)
        });
        futures::future::join_all(probes).await
    }
}
