//! OpenRouter chat completions client.

use super::{ChatCompletionRequest, ChatCompletionResponse};
use crate::{LlmMetrics, RequestLimiter};
use async_trait::async_trait;
use derive_getters::Getters;
use reqwest::Client;
use scrivener_config::GeneratorConfig;
use scrivener_core::GenerateRequest;
use scrivener_error::{GenerationError, GenerationErrorKind, RetryableError, ScrivenerResult};
use scrivener_interface::TextGenerator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

const PROVIDER: &str = "openrouter";
const DEFAULT_MAX_DELAY_SECS: u64 = 30;

/// Retry behaviour for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct RetrySettings {
    max_retries: usize,
    initial_backoff_ms: u64,
    max_delay: Duration,
    enabled: bool,
}

impl RetrySettings {
    /// Retry up to `max_retries` times starting at `initial_backoff_ms`.
    pub fn new(max_retries: usize, initial_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_delay: Duration::from_secs(DEFAULT_MAX_DELAY_SECS),
            enabled: max_retries > 0,
        }
    }

    /// Cap the delay between attempts.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Never retry.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: 0,
            max_delay: Duration::ZERO,
            enabled: false,
        }
    }
}

impl From<&GeneratorConfig> for RetrySettings {
    fn from(config: &GeneratorConfig) -> Self {
        if *config.no_retry() {
            Self::disabled()
        } else {
            Self::new(*config.max_retries(), *config.retry_backoff_ms())
        }
    }
}

/// Text generator backed by an OpenAI-compatible gateway (OpenRouter by default).
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    referer: String,
    app_title: String,
    timeout: Duration,
    limiter: RequestLimiter,
    retry: RetrySettings,
}

impl OpenRouterClient {
    /// Create a client, resolving the API key from the configured environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationErrorKind::MissingApiKey`] when none of the variables is set,
    /// or an HTTP error if the client cannot be initialized.
    #[instrument(skip_all, fields(model = %config.model()))]
    pub fn from_config(config: &GeneratorConfig) -> ScrivenerResult<Self> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            GenerationError::new(GenerationErrorKind::MissingApiKey(
                config.api_key_env().join(", "),
            ))
        })?;
        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key.
    #[instrument(skip_all, fields(model = %config.model()))]
    pub fn with_api_key(
        api_key: impl Into<String>,
        config: &GeneratorConfig,
    ) -> ScrivenerResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Http(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        debug!(base_url = %config.base_url(), "Created OpenRouter client");

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url().trim_end_matches('/').to_string(),
            model: config.model().clone(),
            referer: config.referer().clone(),
            app_title: config.app_title().clone(),
            timeout: config.timeout(),
            limiter: RequestLimiter::new(*config.requests_per_minute(), *config.max_concurrent()),
            retry: RetrySettings::from(config),
        })
    }

    /// Replace the retry settings.
    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the request limiter.
    pub fn with_limiter(mut self, limiter: RequestLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Chat completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send_once(&self, body: &ChatCompletionRequest) -> Result<String, GenerationError> {
        let _permit = self.limiter.acquire().await?;

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.app_title)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    let millis = self.timeout.as_millis() as u64;
                    GenerationError::new(GenerationErrorKind::Timeout(millis))
                } else {
                    GenerationError::new(GenerationErrorKind::Http(e.to_string()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(GenerationError::new(GenerationErrorKind::RateLimited));
            }
            return Err(GenerationError::new(GenerationErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::ResponseParsing(e.to_string()))
        })?;

        if let Some(usage) = parsed.usage() {
            LlmMetrics::get().record_tokens(
                &self.model,
                *usage.prompt_tokens(),
                *usage.completion_tokens(),
            );
        }

        parsed
            .first_text()
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::EmptyResponse))
    }

    async fn send_with_retry(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<String, GenerationError> {
        if !self.retry.enabled {
            return self.send_once(body).await;
        }

        let strategy = ExponentialBackoff::from_millis(self.retry.initial_backoff_ms)
            .factor(2)
            .max_delay(self.retry.max_delay)
            .map(jitter)
            .take(self.retry.max_retries);

        let client = self;
        let attempts = AtomicUsize::new(0);
        let attempts = &attempts;
        Retry::spawn(strategy, move || async move {
            if attempts.fetch_add(1, Ordering::Relaxed) > 0 {
                LlmMetrics::get().record_retry(PROVIDER, &client.model);
            }
            match client.send_once(body).await {
                Ok(text) => Ok(text),
                Err(e) if e.is_retryable() => {
                    let (_, _, max_delay_secs) = e.retry_strategy_params();
                    warn!(
                        error = %e,
                        model = %client.model,
                        max_delay_secs,
                        "Model request failed, will retry"
                    );
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "Permanent model error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await
    }
}

#[async_trait]
impl TextGenerator for OpenRouterClient {
    #[instrument(
        skip(self, request),
        fields(
            model = %self.model,
            max_tokens = *request.max_tokens(),
            prompt_chars = request.prompt().len()
        )
    )]
    async fn generate(&self, request: &GenerateRequest) -> ScrivenerResult<String> {
        let body = ChatCompletionRequest::from_request(&self.model, request);
        let started = Instant::now();

        let result = self.send_with_retry(&body).await;

        let metrics = LlmMetrics::get();
        match &result {
            Ok(text) => {
                let elapsed = started.elapsed().as_secs_f64();
                metrics.record_request(PROVIDER, &self.model, elapsed);
                debug!(chars = text.len(), elapsed_secs = elapsed, "Model request succeeded");
            }
            Err(e) => {
                metrics.record_error(PROVIDER, &self.model, &e.kind);
                warn!(error = %e, "Model request failed");
            }
        }

        result.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
