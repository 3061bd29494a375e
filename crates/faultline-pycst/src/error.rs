//! Parse error types

use thiserror::Error;

/// Errors produced while lexing or parsing source text
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("Unterminated string literal starting on line {line}")]
    UnterminatedString { line: usize },

    #[error("Unclosed '{bracket}' opened on line {line}")]
    UnclosedBracket { bracket: char, line: usize },

    #[error("Unindent on line {line} does not match any outer indentation level")]
    BadDedent { line: usize },

    #[error("Expected {expected}, found '{found}' on line {line}")]
    Expected {
        expected: String,
        found: String,
        line: usize,
    },
}

impl ParseError {
    /// The 1-indexed source line the error was reported on
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnterminatedString { line }
            | ParseError::UnclosedBracket { line, .. }
            | ParseError::BadDedent { line }
            | ParseError::Expected { line, .. } => *line,
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
