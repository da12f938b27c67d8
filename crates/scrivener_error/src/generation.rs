//! Text generation error types.

use crate::RetryableError;

/// Text generation failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// No API key was found for the configured provider
    #[display("No API key configured (checked: {})", _0)]
    MissingApiKey(String),
    /// Transport-level failure
    #[display("Request failed: {}", _0)]
    Http(String),
    /// Provider answered with a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
    /// Provider rejected the request for quota reasons
    #[display("Rate limit exceeded")]
    RateLimited,
    /// The call did not complete within its deadline
    #[display("Timed out after {}ms", _0)]
    Timeout(u64),
    /// Response body could not be decoded
    #[display("Failed to parse response: {}", _0)]
    ResponseParsing(String),
    /// Provider returned no usable text
    #[display("Empty response")]
    EmptyResponse,
    /// No generator is available (offline mode)
    #[display("Text generator unavailable: {}", _0)]
    Unavailable(String),
}

impl GenerationErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationErrorKind::Api { status, .. } => {
                matches!(*status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            GenerationErrorKind::Http(_) => true,
            GenerationErrorKind::RateLimited => true,
            _ => false,
        }
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            GenerationErrorKind::RateLimited => (5000, 3, 40),
            GenerationErrorKind::Api { status, .. } => match *status {
                429 => (5000, 3, 40),
                503 => (2000, 4, 30),
                500 | 502 | 504 => (1000, 3, 8),
                _ => (2000, 3, 30),
            },
            GenerationErrorKind::Http(_) => (1000, 3, 10),
            _ => (1000, 3, 20),
        }
    }
}

/// Text generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use scrivener_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::EmptyResponse);
/// assert!(format!("{}", err).contains("Empty response"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for GenerationError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}
