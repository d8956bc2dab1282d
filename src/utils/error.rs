//! Error handling for textchart conversions
//!
//! This module provides a unified error type and result type for all
//! conversion operations. Only failures that abort a whole run live here;
//! recoverable row-level problems are reported as
//! [`Diagnostic`](crate::utils::diagnostics::Diagnostic)s instead.

use std::fmt;

/// Conversion error type
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Parse error - the source document is not well-formed XML
    ParseError {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },
    /// Header spans disagree with the number of resolved sub-column titles
    StructuralMismatch { declared: usize, resolved: usize },
    /// A required element is absent from the document
    MissingElement { element: String },
    /// Invalid input
    InvalidInput { message: String },
    /// IO error (for file operations)
    IoError { message: String },
    /// The output writer failed
    RenderError { message: String },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::ParseError {
                message,
                line,
                column,
            } => {
                if let (Some(l), Some(c)) = (line, column) {
                    write!(f, "Parse error at line {}, column {}: {}", l, c, message)
                } else if let Some(l) = line {
                    write!(f, "Parse error at line {}: {}", l, message)
                } else {
                    write!(f, "Parse error: {}", message)
                }
            }
            ConversionError::StructuralMismatch { declared, resolved } => {
                write!(
                    f,
                    "Header column mismatch: {} columns in title1 (including blank and analysis columns), {} in title2",
                    declared, resolved
                )
            }
            ConversionError::MissingElement { element } => {
                write!(f, "Missing element: <{}>", element)
            }
            ConversionError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            ConversionError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
            ConversionError::RenderError { message } => {
                write!(f, "Render error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::IoError {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "xlsx")]
impl From<rust_xlsxwriter::XlsxError> for ConversionError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ConversionError::RenderError {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for ConversionError {
    fn from(err: serde_json::Error) -> Self {
        ConversionError::RenderError {
            message: err.to_string(),
        }
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

// Convenience constructors for errors
impl ConversionError {
    pub fn parse(message: impl Into<String>) -> Self {
        ConversionError::ParseError {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn parse_at(message: impl Into<String>, line: usize, column: usize) -> Self {
        ConversionError::ParseError {
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    pub fn missing(element: impl Into<String>) -> Self {
        ConversionError::MissingElement {
            element: element.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ConversionError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        ConversionError::RenderError {
            message: message.into(),
        }
    }

    /// Whether the error was raised by header validation
    pub fn is_structural(&self) -> bool {
        matches!(self, ConversionError::StructuralMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ConversionError::parse("unexpected token");
        assert!(err.to_string().contains("Parse error"));
        assert!(err.to_string().contains("unexpected token"));
    }

    #[test]
    fn test_parse_error_with_location() {
        let err = ConversionError::parse_at("unexpected token", 10, 5);
        let msg = err.to_string();
        assert!(msg.contains("line 10"));
        assert!(msg.contains("column 5"));
    }

    #[test]
    fn test_structural_mismatch_display() {
        let err = ConversionError::StructuralMismatch {
            declared: 6,
            resolved: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("6 columns in title1"));
        assert!(msg.contains("7 in title2"));
        assert!(err.is_structural());
    }

    #[test]
    fn test_missing_element() {
        let err = ConversionError::missing("chart");
        assert_eq!(err.to_string(), "Missing element: <chart>");
        assert!(!err.is_structural());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: ConversionError = io.into();
        assert!(err.to_string().starts_with("IO error"));
    }
}
