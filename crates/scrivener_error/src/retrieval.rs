//! Content retrieval error types.

use crate::RetryableError;

/// Content retrieval failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RetrievalErrorKind {
    /// Transport-level failure
    #[display("Request to {} failed: {}", service, message)]
    Http {
        /// Retriever name
        service: String,
        /// Underlying error
        message: String,
    },
    /// Service answered with a non-success status
    #[display("{} returned status {}", service, status)]
    Status {
        /// Retriever name
        service: String,
        /// HTTP status code
        status: u16,
    },
    /// The call did not complete within its deadline
    #[display("{} timed out after {}ms", service, millis)]
    Timeout {
        /// Retriever name
        service: String,
        /// Deadline in milliseconds
        millis: u64,
    },
    /// Response body could not be decoded
    #[display("Failed to decode response from {}: {}", service, message)]
    Decode {
        /// Retriever name
        service: String,
        /// Decoder message
        message: String,
    },
    /// Service answered without usable text
    #[display("{} returned no usable content", _0)]
    Empty(String),
}

impl RetrievalErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            RetrievalErrorKind::Status { status, .. } => {
                matches!(*status, 408 | 429 | 502 | 503 | 504)
            }
            RetrievalErrorKind::Http { .. } => true,
            _ => false,
        }
    }
}

/// Content retrieval error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Retrieval Error: {} at line {} in {}", kind, line, file)]
pub struct RetrievalError {
    /// The kind of error that occurred
    pub kind: RetrievalErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RetrievalError {
    /// Create a new RetrievalError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RetrievalErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for RetrievalError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (500, 2, 4)
    }
}
