//! Orchestrator tuning.

use derive_getters::Getters;
use scrivener_agents::DEFAULT_AGENT_TIMEOUT;
use scrivener_cache::TtlCacheConfig;
use scrivener_config::{MissingPredecessorPolicy, ScrivenerConfig};
use std::time::Duration;

const DEFAULT_WEAVE_CONCURRENCY: usize = 3;

/// Runtime settings for a [`ChapterOrchestrator`](crate::ChapterOrchestrator).
#[derive(Debug, Clone, PartialEq, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct PipelineSettings {
    /// Deadline for each agent's generation call
    agent_timeout: Duration,
    /// Plot points woven at once; zero is treated as one
    weave_concurrency: usize,
    /// Handling of a previous chapter id that does not exist
    missing_predecessor: MissingPredecessorPolicy,
    /// Deadline for each retriever call
    retrieval_timeout: Duration,
    /// In-process style guide cache
    style_cache: TtlCacheConfig,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            agent_timeout: DEFAULT_AGENT_TIMEOUT,
            weave_concurrency: DEFAULT_WEAVE_CONCURRENCY,
            missing_predecessor: MissingPredecessorPolicy::default(),
            retrieval_timeout: Duration::from_secs(30),
            style_cache: TtlCacheConfig::default(),
        }
    }
}

impl PipelineSettings {
    /// Concurrency actually used for weaving.
    pub fn effective_concurrency(&self) -> usize {
        self.weave_concurrency.max(1)
    }
}

impl From<&ScrivenerConfig> for PipelineSettings {
    fn from(config: &ScrivenerConfig) -> Self {
        Self {
            agent_timeout: config.pipeline().agent_timeout(),
            weave_concurrency: *config.pipeline().weave_concurrency(),
            missing_predecessor: *config.pipeline().missing_predecessor(),
            retrieval_timeout: config.retrieval().timeout(),
            style_cache: config.cache().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_bundled_config() {
        let config = ScrivenerConfig::default();
        assert_eq!(PipelineSettings::from(&config), PipelineSettings::default());
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let settings = PipelineSettings::default().with_weave_concurrency(0);
        assert_eq!(settings.effective_concurrency(), 1);
    }
}
