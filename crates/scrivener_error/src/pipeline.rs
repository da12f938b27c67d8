//! Chapter pipeline error types.

/// Request-level failures surfaced by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Request failed validation before any stage ran
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
    /// The continuation target does not exist and the policy rejects it
    #[display("Previous chapter {} not found", _0)]
    MissingPredecessor(i64),
    /// A stage failed in a way no agent could absorb
    #[display("Chapter generation failed: {}", _0)]
    GenerationFailed(String),
    /// The chapter could not be persisted
    #[display("Chapter persistence failed: {}", _0)]
    Persistence(String),
    /// The caller cancelled the request before persistence
    #[display("Chapter generation cancelled")]
    Cancelled,
}

/// Pipeline error with source location tracking.
///
/// # Examples
///
/// ```
/// use scrivener_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::MissingPredecessor(42));
/// assert!(format!("{}", err).contains("42"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The kind of error that occurred
    pub kind: PipelineErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
