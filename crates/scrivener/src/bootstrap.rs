//! Collaborators wired from configuration.

use scrivener_config::{
    GeneratorConfig, RetrievalConfig, ScrivenerConfig, StorageBackend, StorageConfig,
};
use scrivener_error::ScrivenerResult;
use scrivener_interface::{ChapterStore, FanoutObserver, TextGenerator, TracingObserver};
use scrivener_models::{OpenRouterClient, UnavailableGenerator};
use scrivener_pipeline::{ChapterOrchestrator, MetricsObserver, PipelineSettings, RetrieverChain};
use scrivener_retrieval::ScraperClient;
use scrivener_storage::{FileChapterStore, InMemoryChapterStore};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Key shipped in sample environments; never a real credential.
const PLACEHOLDER_API_KEY: &str = "test-key-for-development";
const MIN_API_KEY_LEN: usize = 10;

/// Whether `key` looks like a real credential.
///
/// # Examples
///
/// ```
/// use scrivener::is_usable_api_key;
///
/// assert!(is_usable_api_key("sk-or-v1-0123456789abcdef"));
/// assert!(!is_usable_api_key("test-key-for-development"));
/// assert!(!is_usable_api_key("short"));
/// ```
pub fn is_usable_api_key(key: &str) -> bool {
    let key = key.trim();
    key.len() >= MIN_API_KEY_LEN && key != PLACEHOLDER_API_KEY
}

/// Live generator when a usable key is configured, otherwise the offline one.
///
/// # Errors
///
/// Fails only when the HTTP client cannot be built.
pub fn select_generator(
    config: &GeneratorConfig,
    offline: bool,
) -> ScrivenerResult<Arc<dyn TextGenerator>> {
    if offline {
        info!("Offline mode requested, every agent will use its fallback");
        return Ok(Arc::new(UnavailableGenerator::new("offline mode requested")));
    }

    match config
        .resolve_api_key()
        .filter(|key| is_usable_api_key(key))
    {
        Some(key) => {
            let client = OpenRouterClient::with_api_key(key, config)?;
            info!(model = %config.model(), "Using OpenRouter generator");
            Ok(Arc::new(client))
        }
        None => {
            warn!(
                variables = %config.api_key_env().join(", "),
                "No usable API key found, running offline"
            );
            Ok(Arc::new(UnavailableGenerator::new("no API key configured")))
        }
    }
}

/// Open the configured chapter store.
///
/// # Errors
///
/// Fails when the file store cannot be read or its directory created.
#[instrument(skip_all, fields(backend = %config.backend()))]
pub async fn open_store(config: &StorageConfig) -> ScrivenerResult<Arc<dyn ChapterStore>> {
    match config.backend() {
        StorageBackend::Memory => Ok(Arc::new(InMemoryChapterStore::new())),
        StorageBackend::File => Ok(Arc::new(
            FileChapterStore::open(config.resolved_path()).await?,
        )),
    }
}

/// Primary scraper, then the secondary when one is configured.
pub fn retriever_chain(config: &RetrievalConfig) -> RetrieverChain {
    let chain = RetrieverChain::new()
        .with_timeout(config.timeout())
        .with_retriever(Arc::new(ScraperClient::primary(config)));
    match ScraperClient::secondary(config) {
        Some(secondary) => chain.with_retriever(Arc::new(secondary)),
        None => chain,
    }
}

/// Build an orchestrator from configuration.
///
/// In offline mode no network collaborator is created: the generator is the
/// offline stand-in and the retriever chain is empty, so every passage is the
/// placeholder.
///
/// # Errors
///
/// Fails when the generator or the store cannot be created.
pub async fn build_orchestrator(
    config: &ScrivenerConfig,
    offline: bool,
) -> ScrivenerResult<ChapterOrchestrator> {
    let generator = select_generator(config.generator(), offline)?;
    let store = open_store(config.storage()).await?;
    let retrievers = if offline {
        RetrieverChain::new()
    } else {
        retriever_chain(config.retrieval())
    };
    let observer = FanoutObserver::new()
        .with_observer(Arc::new(TracingObserver))
        .with_observer(Arc::new(MetricsObserver::new()));

    Ok(ChapterOrchestrator::new(generator, store)
        .with_observer(Arc::new(observer))
        .with_settings(PipelineSettings::from(config))
        .with_retrievers(retrievers))
}
