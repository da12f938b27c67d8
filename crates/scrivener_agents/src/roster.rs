//! The full set of agents one orchestrator drives.

use crate::{
    AgentContext, CharacterExtractor, CorrectionPolish, IntentAnalyst, LoreMaster, MasterWeaver,
    SceneScout, StyleAnalyst,
};
use derive_getters::Getters;
use scrivener_cache::TtlCacheConfig;
use scrivener_interface::ChapterStore;
use std::sync::Arc;

/// One instance of each agent, sharing a single [`AgentContext`].
#[derive(Debug, Getters)]
pub struct AgentRoster {
    /// Brief creation
    intent: IntentAnalyst,
    /// Plot points and search queries
    scout: SceneScout,
    /// Genre style guides
    style: StyleAnalyst,
    /// Section weaving
    weaver: MasterWeaver,
    /// Chapter polish
    polish: CorrectionPolish,
    /// Character extraction
    characters: CharacterExtractor,
    /// Lore extraction
    lore: LoreMaster,
}

impl AgentRoster {
    /// Build every agent around `context`.
    pub fn new(context: AgentContext) -> Self {
        Self {
            intent: IntentAnalyst::new(context.clone()),
            scout: SceneScout::new(context.clone()),
            style: StyleAnalyst::new(context.clone()),
            weaver: MasterWeaver::new(context.clone()),
            polish: CorrectionPolish::new(context.clone()),
            characters: CharacterExtractor::new(context.clone()),
            lore: LoreMaster::new(context),
        }
    }

    /// Give the style analyst a persistent tier.
    pub fn with_style_store(mut self, store: Arc<dyn ChapterStore>) -> Self {
        self.style = self.style.with_store(store);
        self
    }

    /// Configure the style analyst's in-process cache.
    pub fn with_style_cache(mut self, config: TtlCacheConfig) -> Self {
        self.style = self.style.with_cache_config(config);
        self
    }
}
