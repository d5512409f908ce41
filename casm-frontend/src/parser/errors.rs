//! Parse error types for the CASM parser
//!
//! This module defines all error types that can occur during parsing.

use crate::lexer::Token;
use casm_common::{CompilerError, SourceLocation};
use thiserror::Error;

/// Parse error types specific to the parser
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("Expected {expected}, found '{}' ({})", found.text, found.kind)]
    UnexpectedToken { expected: String, found: Token },

    #[error("Unexpected end of file, expected {expected}")]
    UnexpectedEndOfFile {
        expected: String,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseError::UnexpectedToken { found, .. } => found.location(),
            ParseError::UnexpectedEndOfFile { location, .. } => location,
        }
    }
}

impl From<ParseError> for CompilerError {
    fn from(err: ParseError) -> Self {
        let location = err.location().clone();
        CompilerError::parse_error(err.to_string(), location)
    }
}
