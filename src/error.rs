//! Error types for xsd-frontend
//!
//! A schema either compiles completely or the whole parse aborts with a
//! single [`ParseError`] carrying the tag name and the 1-based line/column
//! of the closing event that triggered the failure.

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for schema compilation
#[derive(Error, Debug)]
pub enum Error {
    /// Schema parsing/building error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// XML tokenization error (reader adapter only)
    #[error("XML error: {0}")]
    Xml(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A 1-based line/column source position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Line number, 1-based
    pub line: u64,
    /// Column number, 1-based
    pub column: u64,
}

impl Position {
    /// Create a new position
    pub fn new(line: u64, column: u64) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Category of schema parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Grammar feature deliberately out of scope (abstract types, mixed
    /// content, element defaults, substitution groups, occurs constraints
    /// on sequence)
    UnsupportedConstruct,
    /// A qualified-name string that does not parse as `prefix:local` or
    /// `local`, or whose prefix has no active binding
    MalformedReference,
    /// A required attribute is absent (e.g. an enumeration restriction
    /// without an enclosing named simpleType)
    MissingAttribute,
    /// An element name outside the recognized vocabulary
    UnknownTag,
    /// An attribute is present but its value is unusable (e.g. a
    /// non-numeric maxOccurs)
    InvalidAttribute,
}

impl ParseErrorKind {
    /// Short human-readable label for the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::UnsupportedConstruct => "unsupported construct",
            ParseErrorKind::MalformedReference => "malformed reference",
            ParseErrorKind::MissingAttribute => "missing required attribute",
            ParseErrorKind::UnknownTag => "unknown tag",
            ParseErrorKind::InvalidAttribute => "invalid attribute",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Schema parse failure, bound to the closing tag that exposed it
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Failure category
    pub kind: ParseErrorKind,
    /// Local name of the element whose closing event triggered the failure
    pub tag: String,
    /// Error message
    pub message: String,
    /// Position of the element's closing tag
    pub position: Position,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(
        kind: ParseErrorKind,
        tag: impl Into<String>,
        message: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            kind,
            tag: tag.into(),
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in <{}> at {}: {}",
            self.kind, self.tag, self.position, self.message
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(
            ParseErrorKind::MissingAttribute,
            "simpleType",
            "enumeration restriction requires a name",
            Position::new(12, 7),
        );

        let msg = format!("{}", err);
        assert!(msg.contains("missing required attribute"));
        assert!(msg.contains("<simpleType>"));
        assert!(msg.contains("12:7"));
    }

    #[test]
    fn test_error_conversion() {
        let parse_err = ParseError::new(
            ParseErrorKind::UnknownTag,
            "bogus",
            "not part of the supported XSD vocabulary",
            Position::new(1, 1),
        );
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 42).to_string(), "3:42");
    }
}
