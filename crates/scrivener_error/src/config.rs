//! Configuration loading errors.

/// Stages of configuration loading that can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A legacy environment variable could not be applied
    #[display("Invalid override for {}: {}", key, reason)]
    Override {
        /// Dotted configuration key the variable maps to
        key: String,
        /// Underlying message
        reason: String,
    },
    /// Files and environment could not be merged
    #[display("Failed to build configuration: {}", _0)]
    Sources(String),
    /// Merged values did not match the configuration schema
    #[display("Failed to parse configuration: {}", _0)]
    Shape(String),
}

/// Configuration error with source location.
///
/// # Examples
///
/// ```
/// use scrivener_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::Shape(
///     "missing field `primary_url`".to_string(),
/// ));
/// assert!(err.to_string().contains("primary_url"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// What went wrong
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a configuration error at the caller's location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
