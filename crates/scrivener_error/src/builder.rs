//! Errors from assembling typed values with generated builders.

/// Why a builder refused to produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BuilderErrorKind {
    /// A required field was never set or failed validation
    #[display("{} is incomplete: {}", target, reason)]
    Incomplete {
        /// Type being built
        target: &'static str,
        /// Message reported by the builder
        reason: String,
    },
}

/// Builder error with location tracking.
///
/// # Examples
///
/// ```
/// use scrivener_error::{BuilderError, BuilderErrorKind};
///
/// let err = BuilderError::incomplete("GenerateRequest", "`prompt` must be initialized");
/// assert!(matches!(
///     err.kind(),
///     BuilderErrorKind::Incomplete { target: "GenerateRequest", .. }
/// ));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Builder Error: {} at line {} in {}", kind, line, file)]
pub struct BuilderError {
    kind: BuilderErrorKind,
    line: u32,
    file: &'static str,
}

impl BuilderError {
    /// Create a builder error with caller location tracking.
    #[track_caller]
    pub fn new(kind: BuilderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for [`BuilderErrorKind::Incomplete`].
    #[track_caller]
    pub fn incomplete(target: &'static str, reason: impl ToString) -> Self {
        Self::new(BuilderErrorKind::Incomplete {
            target,
            reason: reason.to_string(),
        })
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BuilderErrorKind {
        &self.kind
    }
}
