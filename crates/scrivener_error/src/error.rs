//! Top-level error wrapper types.

use crate::{
    BuilderError, ConfigError, GenerationError, JsonError, ParseError, PipelineError,
    RetrievalError, StorageError,
};

/// Every error condition the workspace can surface.
///
/// # Examples
///
/// ```
/// use scrivener_error::{RetrievalError, RetrievalErrorKind, ScrivenerError, ScrivenerErrorKind};
///
/// let err: ScrivenerError = RetrievalError::new(RetrievalErrorKind::Empty("primary".into())).into();
/// assert!(matches!(err.kind(), ScrivenerErrorKind::Retrieval(_)));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ScrivenerErrorKind {
    /// JSON rendering error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Text generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Content retrieval error
    #[from(RetrievalError)]
    Retrieval(RetrievalError),
    /// Generated output could not be parsed
    #[from(ParseError)]
    Parse(ParseError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Scrivener error with kind discrimination.
///
/// # Examples
///
/// ```
/// use scrivener_error::{ConfigError, ConfigErrorKind, ScrivenerResult};
///
/// fn might_fail() -> ScrivenerResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::Sources("unreadable file".into())))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Scrivener Error: {}", _0)]
pub struct ScrivenerError(Box<ScrivenerErrorKind>);

impl ScrivenerError {
    /// Create a new error from a kind.
    pub fn new(kind: ScrivenerErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ScrivenerErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to ScrivenerErrorKind
impl<T> From<T> for ScrivenerError
where
    T: Into<ScrivenerErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Scrivener operations.
pub type ScrivenerResult<T> = std::result::Result<T, ScrivenerError>;
