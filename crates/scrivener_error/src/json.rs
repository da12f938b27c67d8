//! JSON rendering errors.

/// A value could not be encoded as JSON.
///
/// `subject` names what was being encoded, usually a type name.
///
/// # Examples
///
/// ```
/// use scrivener_error::JsonError;
///
/// let err = JsonError::new("ChapterResult", "key must be a string");
/// assert_eq!(err.subject, "ChapterResult");
/// assert!(err.to_string().contains("Could not encode ChapterResult"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Could not encode {} as JSON: {} at line {} in {}", subject, reason, line, file)]
pub struct JsonError {
    /// What was being encoded
    pub subject: &'static str,
    /// Serializer message
    pub reason: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Record an encoding failure at the caller's location.
    #[track_caller]
    pub fn new(subject: &'static str, reason: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            subject,
            reason: reason.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
