//! Errors raised while interpreting generated text.

/// Reasons a generated response could not be turned into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ParseErrorKind {
    /// No JSON structure was found in the response
    #[display("No JSON found in response (length: {})", _0)]
    NoJson(usize),
    /// JSON was found but did not match the expected shape
    #[display("Invalid JSON: {}", _0)]
    InvalidJson(String),
    /// Too few plot points survived line parsing
    #[display("Expected at least {} plot points, parsed {}", expected, found)]
    TooFewPlotPoints {
        /// Minimum usable count
        expected: usize,
        /// Count actually parsed
        found: usize,
    },
    /// Search query shorter than the minimum length
    #[display("Search query too short: {:?}", _0)]
    QueryTooShort(String),
    /// Style guide response contained no recognised section headers
    #[display("No style guide sections recognised")]
    NoSections,
    /// Parsed collection was empty
    #[display("No {} extracted", _0)]
    EmptyCollection(String),
    /// Response was blank
    #[display("Blank response")]
    Blank,
}

/// Parse error with source location tracking.
///
/// # Examples
///
/// ```
/// use scrivener_error::{ParseError, ParseErrorKind};
///
/// let err = ParseError::new(ParseErrorKind::TooFewPlotPoints { expected: 3, found: 1 });
/// assert!(format!("{}", err).contains("parsed 1"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Parse Error: {} at line {} in {}", kind, line, file)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ParseError {
    /// Create a new ParseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ParseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
