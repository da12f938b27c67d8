//! Individual configuration sections.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Language model gateway settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct GeneratorConfig {
    /// OpenAI-compatible API base URL
    #[serde(default = "default_base_url")]
    base_url: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    model: String,

    /// Environment variables probed, in order, for the API key
    #[serde(default = "default_api_key_env")]
    api_key_env: Vec<String>,

    /// HTTP client timeout in seconds
    #[serde(default = "default_generator_timeout")]
    timeout_secs: u64,

    /// Retry attempts for transient failures
    #[serde(default = "default_max_retries")]
    max_retries: usize,

    /// Initial backoff between retries in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    retry_backoff_ms: u64,

    /// Disable retries entirely
    #[serde(default)]
    no_retry: bool,

    /// Requests-per-minute ceiling; unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requests_per_minute: Option<u32>,

    /// Maximum in-flight requests; unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_concurrent: Option<u32>,

    /// Value of the HTTP-Referer header
    #[serde(default = "default_referer")]
    referer: String,

    /// Value of the X-Title header
    #[serde(default = "default_app_title")]
    app_title: String,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "google/gemini-pro".to_string()
}

fn default_api_key_env() -> Vec<String> {
    vec!["GEMINI_API_KEY".to_string(), "OPENROUTER_API_KEY".to_string()]
}

fn default_generator_timeout() -> u64 {
    60
}

fn default_max_retries() -> usize {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_referer() -> String {
    "http://localhost:3000".to_string()
}

fn default_app_title() -> String {
    "Scrivener".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_generator_timeout(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            no_retry: false,
            requests_per_minute: None,
            max_concurrent: None,
            referer: default_referer(),
            app_title: default_app_title(),
        }
    }
}

impl GeneratorConfig {
    /// HTTP timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// First non-empty API key found in the configured environment variables.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key_env
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }
}

/// Content retrieval service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct RetrievalConfig {
    /// Primary retrieval service
    #[serde(default = "default_primary_url")]
    primary_url: String,

    /// Secondary retrieval service, consulted when the primary yields nothing
    #[serde(default = "default_secondary_url")]
    secondary_url: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_retrieval_timeout")]
    timeout_secs: u64,

    /// Health probe timeout in seconds
    #[serde(default = "default_health_timeout")]
    health_timeout_secs: u64,

    /// Label sent as the request `source`
    #[serde(default = "default_client_label")]
    client_label: String,

    /// Retry attempts per service
    #[serde(default)]
    max_retries: usize,
}

fn default_primary_url() -> String {
    "http://localhost:3002".to_string()
}

fn default_secondary_url() -> Option<String> {
    Some("http://localhost:3003".to_string())
}

fn default_retrieval_timeout() -> u64 {
    30
}

fn default_health_timeout() -> u64 {
    5
}

fn default_client_label() -> String {
    "scrivener".to_string()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            primary_url: default_primary_url(),
            secondary_url: default_secondary_url(),
            timeout_secs: default_retrieval_timeout(),
            health_timeout_secs: default_health_timeout(),
            client_label: default_client_label(),
            max_retries: 0,
        }
    }
}

impl RetrievalConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Health probe timeout as a duration.
    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }
}

/// What to do when a request names a previous chapter that does not exist.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MissingPredecessorPolicy {
    /// Start a new thread: chapter number 1, previous id dropped
    #[default]
    FreshThread,
    /// Fail the request before any generation
    Reject,
}

/// Orchestration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct PipelineConfig {
    /// Per-agent model call timeout in seconds
    #[serde(default = "default_agent_timeout")]
    agent_timeout_secs: u64,

    /// Plot points woven concurrently
    #[serde(default = "default_weave_concurrency")]
    weave_concurrency: usize,

    /// Handling of dangling previous chapter ids
    #[serde(default)]
    missing_predecessor: MissingPredecessorPolicy,
}

fn default_agent_timeout() -> u64 {
    45
}

fn default_weave_concurrency() -> usize {
    3
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            agent_timeout_secs: default_agent_timeout(),
            weave_concurrency: default_weave_concurrency(),
            missing_predecessor: MissingPredecessorPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Agent timeout as a duration.
    pub fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout_secs)
    }
}

/// Which chapter store to open.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local, lost on exit
    Memory,
    /// Single JSON document on disk
    #[default]
    File,
}

/// Persistence settings.
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct StorageConfig {
    /// Store implementation
    #[serde(default)]
    backend: StorageBackend,

    /// Location of the file store; platform data dir when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[setters(strip_option)]
    path: Option<PathBuf>,
}

impl StorageConfig {
    /// Path of the file store, falling back to `<data dir>/scrivener/chapters.json`.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join("scrivener").join("chapters.json"))
            .unwrap_or_else(|| PathBuf::from("scrivener-chapters.json"))
    }
}
