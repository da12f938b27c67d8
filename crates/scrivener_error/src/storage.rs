//! Chapter store failures.

/// Ways a chapter store read or write can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Stored document could not be encoded or decoded
    #[display("Serialization failed: {}", _0)]
    Serialization(String),
    /// A back-reference points at a chapter that does not exist
    #[display("Chapter {} referenced as predecessor does not exist", _0)]
    DanglingReference(i64),
    /// A predecessor chapter number does not line up with the new chapter
    #[display("Chapter number {} does not follow predecessor number {}", actual, predecessor)]
    ChapterSequence {
        /// Number of the referenced chapter
        predecessor: u32,
        /// Number of the chapter being appended
        actual: u32,
    },
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use scrivener_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::DanglingReference(7));
/// assert!(err.to_string().contains("Chapter 7 referenced as predecessor"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
