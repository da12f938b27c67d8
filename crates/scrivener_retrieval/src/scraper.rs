//! HTTP scraper service client.

use async_trait::async_trait;
use reqwest::Client;
use scrivener_config::RetrievalConfig;
use scrivener_core::RetrievedContent;
use scrivener_error::{RetrievalError, RetrievalErrorKind, RetryableError, ScrivenerResult};
use scrivener_interface::{ContentRetriever, HealthStatus};
use serde::Serialize;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

const RETRY_BACKOFF_MS: u64 = 500;
const RETRY_MAX_DELAY_SECS: u64 = 4;

/// Body of `POST {url}/scrape`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeRequest<'a> {
    /// Search query
    pub query: &'a str,
    /// Label identifying the caller
    pub source: &'a str,
}

/// Retriever backed by a scraper service.
///
/// The service answers `{content?, fallback?, source?, sessionId?}`. A response
/// without non-blank `content` or `fallback` is reported as
/// [`RetrievalErrorKind::Empty`] so callers can move on to the next source.
#[derive(Debug, Clone)]
pub struct ScraperClient {
    name: String,
    base_url: String,
    client_label: String,
    client: Client,
    timeout: Duration,
    health_timeout: Duration,
    max_retries: usize,
}

impl ScraperClient {
    /// Create a client for the service at `base_url`.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_label: "scrivener".to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(30),
            health_timeout: Duration::from_secs(5),
            max_retries: 0,
        }
    }

    /// Primary service from configuration.
    pub fn primary(config: &RetrievalConfig) -> Self {
        Self::new("primary", config.primary_url().clone()).configured(config)
    }

    /// Secondary service from configuration, when one is set.
    pub fn secondary(config: &RetrievalConfig) -> Option<Self> {
        config
            .secondary_url()
            .as_ref()
            .filter(|url| !url.trim().is_empty())
            .map(|url| Self::new("secondary", url.clone()).configured(config))
    }

    fn configured(mut self, config: &RetrievalConfig) -> Self {
        self.client_label = config.client_label().clone();
        self.timeout = config.timeout();
        self.health_timeout = config.health_timeout();
        self.max_retries = *config.max_retries();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the retry count.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn scrape_once(&self, query: &str) -> Result<RetrievedContent, RetrievalError> {
        let url = format!("{}/scrape", self.base_url);
        let body = ScrapeRequest {
            query,
            source: &self.client_label,
        };

        let send = self.client.post(&url).json(&body).send();
        let response = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| {
                RetrievalError::new(RetrievalErrorKind::Timeout {
                    service: self.name.clone(),
                    millis: self.timeout.as_millis() as u64,
                })
            })?
            .map_err(|e| {
                RetrievalError::new(RetrievalErrorKind::Http {
                    service: self.name.clone(),
                    message: e.to_string(),
                })
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::new(RetrievalErrorKind::Status {
                service: self.name.clone(),
                status: status.as_u16(),
            }));
        }

        let content: RetrievedContent = response.json().await.map_err(|e| {
            RetrievalError::new(RetrievalErrorKind::Decode {
                service: self.name.clone(),
                message: e.to_string(),
            })
        })?;

        if content.usable_text().is_none() {
            return Err(RetrievalError::new(RetrievalErrorKind::Empty(
                self.name.clone(),
            )));
        }

        debug!(
            source = content.source().as_deref().unwrap_or("scraped"),
            session = content.session_id().as_deref().unwrap_or("unknown"),
            chars = content.usable_text().map(str::len).unwrap_or(0),
            "Scraper returned content"
        );
        Ok(content)
    }
}

#[async_trait]
impl ContentRetriever for ScraperClient {
    #[instrument(skip(self), fields(service = %self.name))]
    async fn fetch(&self, query: &str) -> ScrivenerResult<RetrievedContent> {
        if self.max_retries == 0 {
            return self.scrape_once(query).await.map_err(Into::into);
        }

        let strategy = ExponentialBackoff::from_millis(RETRY_BACKOFF_MS)
            .factor(2)
            .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
            .map(jitter)
            .take(self.max_retries);

        let client = self;
        Retry::spawn(strategy, move || async move {
            match client.scrape_once(query).await {
                Ok(content) => Ok(content),
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, "Scraper request failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        })
        .await
        .map_err(Into::into)
    }

    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(service = %self.name))]
    async fn health(&self) -> HealthStatus {
        let url = format!("{}/health", self.base_url);
        let probe = self.client.get(&url).send();
        match tokio::time::timeout(self.health_timeout, probe).await {
            Ok(Ok(response)) if response.status().as_u16() == 200 => HealthStatus::Healthy,
            Ok(Ok(response)) => HealthStatus::Unhealthy {
                message: format!("status {}", response.status().as_u16()),
            },
            Ok(Err(e)) => HealthStatus::Unreachable {
                message: e.to_string(),
            },
            Err(_) => HealthStatus::Unreachable {
                message: format!("timed out after {}ms", self.health_timeout.as_millis()),
            },
        }
    }
}
