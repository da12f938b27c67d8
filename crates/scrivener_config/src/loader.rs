//! Top-level configuration and loading.

use crate::{GeneratorConfig, PipelineConfig, RetrievalConfig, StorageConfig};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use derive_getters::Getters;
use scrivener_cache::TtlCacheConfig;
use scrivener_error::{ConfigError, ConfigErrorKind, ScrivenerError, ScrivenerResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../scrivener.toml");

/// Legacy environment variables and the keys they override.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("SCRAPER_SERVICE_URL", "retrieval.primary_url"),
    ("FALLBACK_SCRAPER_URL", "retrieval.secondary_url"),
    ("GEMINI_MODEL", "generator.model"),
];

/// Complete Scrivener configuration.
///
/// # Example
///
/// ```toml
/// [retrieval]
/// primary_url = "http://scraper.internal:3002"
///
/// [pipeline]
/// weave_concurrency = 5
/// missing_predecessor = "reject"
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct ScrivenerConfig {
    /// Language model gateway
    #[serde(default)]
    generator: GeneratorConfig,

    /// Content retrieval services
    #[serde(default)]
    retrieval: RetrievalConfig,

    /// Orchestration
    #[serde(default)]
    pipeline: PipelineConfig,

    /// Style guide cache
    #[serde(default)]
    cache: TtlCacheConfig,

    /// Chapter persistence
    #[serde(default)]
    storage: StorageConfig,
}

impl ScrivenerConfig {
    /// Parse the bundled defaults only.
    pub fn bundled() -> ScrivenerResult<Self> {
        Self::finish(Self::base())
    }

    /// Load bundled defaults overlaid with a single TOML file.
    ///
    /// Environment variables are not consulted.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> ScrivenerResult<Self> {
        debug!("Loading configuration from file");
        let builder = Self::base().add_source(File::from(path.as_ref()).required(true));
        Self::finish(builder)
    }

    /// Load configuration with full precedence.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use scrivener_config::ScrivenerConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ScrivenerConfig::load()?;
    /// println!("model: {}", config.generator().model());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> ScrivenerResult<Self> {
        Self::load_with(None)
    }

    /// Like [`load`](Self::load), with an explicit file taking the place of
    /// `./scrivener.toml`.
    #[instrument(skip_all)]
    pub fn load_with(explicit: Option<&Path>) -> ScrivenerResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled");

        let mut builder = Self::base();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/scrivener/scrivener.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = match explicit {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("scrivener").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("SCRIVENER")
                .separator("__")
                .try_parsing(true),
        );

        for (variable, key) in LEGACY_ENV {
            let value = std::env::var(variable)
                .ok()
                .filter(|value| !value.trim().is_empty());
            if value.is_some() {
                debug!(variable, key, "Applying legacy environment override");
            }
            builder = builder.set_override_option(*key, value).map_err(|e| {
                config_error(ConfigErrorKind::Override {
                    key: (*key).to_string(),
                    reason: e.to_string(),
                })
            })?;
        }

        Self::finish(builder)
    }

    fn base() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> ScrivenerResult<Self> {
        builder
            .build()
            .map_err(|e| config_error(ConfigErrorKind::Sources(e.to_string())))?
            .try_deserialize()
            .map_err(|e| config_error(ConfigErrorKind::Shape(e.to_string())))
    }
}

#[track_caller]
fn config_error(kind: ConfigErrorKind) -> ScrivenerError {
    ScrivenerError::from(ConfigError::new(kind))
}
