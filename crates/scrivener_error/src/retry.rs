//! Retry classification shared by outbound clients.

/// Trait for errors that support retry logic.
///
/// Transient conditions (rate limits, overloaded upstreams, dropped connections)
/// report `true` from [`is_retryable`](RetryableError::is_retryable); permanent
/// conditions (bad credentials, malformed requests) report `false`.
///
/// # Examples
///
/// ```
/// use scrivener_error::{GenerationError, GenerationErrorKind, RetryableError};
///
/// let err = GenerationError::new(GenerationErrorKind::Api {
///     status: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// let (backoff, retries, _max_delay) = err.retry_strategy_params();
/// assert_eq!(backoff, 2000);
/// assert_eq!(retries, 4);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (1000, 3, 20)
    }
}
