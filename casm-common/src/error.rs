//! Error handling for the CASM compiler
//!
//! Fatal problems (unreadable input, malformed syntax, unwritable output) are
//! `CompilerError`s and abort the compilation. Everything the code generator
//! can recover from is recorded as a `Diagnostic` in an `ErrorReporter` and
//! the run carries on with a best-effort default.

use crate::source_loc::{SourceLocation, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Lexical error at {location}: {message}")]
    LexError {
        location: SourceLocation,
        message: String,
    },

    #[error("Parse error at {location}: {message}")]
    ParseError {
        location: SourceLocation,
        message: String,
    },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    /// Create a lexer error
    pub fn lexer_error(message: String, location: SourceLocation) -> Self {
        CompilerError::LexError { location, message }
    }

    /// Create a parse error
    pub fn parse_error(message: String, location: SourceLocation) -> Self {
        CompilerError::ParseError { location, message }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        CompilerError::Unsupported {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with optional location and severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Option<SourceSpan>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn warning(message: String, span: Option<SourceSpan>) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            span,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some(span) => write!(f, "{}: {}: {}", self.severity, span.start, self.message)?,
            None => write!(f, "{}: {}", self.severity, self.message)?,
        }

        for note in &self.notes {
            write!(f, "\n  note: {}", note)?;
        }

        Ok(())
    }
}

/// Error reporter for collecting and displaying diagnostics
#[derive(Debug, Clone, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an already built diagnostic
    pub fn report(&mut self, diagnostic: Diagnostic) -> &mut Diagnostic {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Note => {}
        }
        let index = self.diagnostics.len();
        self.diagnostics.push(diagnostic);
        &mut self.diagnostics[index]
    }

    /// Report a warning diagnostic
    pub fn warning(&mut self, message: String, span: Option<SourceSpan>) -> &mut Diagnostic {
        self.report(Diagnostic::warning(message, span))
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            eprintln!("{}", diagnostic);
        }
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        match (self.error_count, self.warning_count) {
            (0, 0) => "No errors or warnings".to_string(),
            (0, w) => format!("{} warning{}", w, if w == 1 { "" } else { "s" }),
            (e, 0) => format!("{} error{}", e, if e == 1 { "" } else { "s" }),
            (e, w) => format!(
                "{} error{} and {} warning{}",
                e,
                if e == 1 { "" } else { "s" },
                w,
                if w == 1 { "" } else { "s" }
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> SourceSpan {
        SourceSpan::new(
            SourceLocation::new("test.casm", 1, 1),
            SourceLocation::new("test.casm", 1, 5),
        )
    }

    #[test]
    fn test_diagnostic_creation() {
        let diag = Diagnostic::warning("Test warning".to_string(), Some(span()));
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.message, "Test warning");
        assert_eq!(diag.span, Some(span()));
    }

    #[test]
    fn test_diagnostic_display() {
        let located = Diagnostic::warning("no string found".to_string(), Some(span()));
        assert_eq!(located.to_string(), "warning: test.casm:1:1: no string found");

        let bare = Diagnostic::warning("odd".to_string(), None).with_note("context".to_string());
        assert_eq!(bare.to_string(), "warning: odd\n  note: context");
    }

    #[test]
    fn test_error_reporter() {
        let mut reporter = ErrorReporter::new();
        assert_eq!(reporter.warning_count(), 0);

        reporter.warning("Test warning".to_string(), None);
        assert_eq!(reporter.warning_count(), 1);

        reporter
            .report(Diagnostic::warning("Second".to_string(), Some(span())))
            .notes
            .push("extra".to_string());
        assert_eq!(reporter.warning_count(), 2);
        assert_eq!(reporter.diagnostics()[1].notes, vec!["extra".to_string()]);

        let note = Diagnostic {
            severity: Severity::Note,
            ..Diagnostic::warning("fyi".to_string(), None)
        };
        reporter.report(note);
        assert_eq!(reporter.warning_count(), 2);
        assert_eq!(reporter.into_diagnostics().len(), 3);
    }

    #[test]
    fn test_summary() {
        let mut reporter = ErrorReporter::new();
        assert_eq!(reporter.summary(), "No errors or warnings");

        reporter.warning("Warning 1".to_string(), None);
        assert_eq!(reporter.summary(), "1 warning");

        reporter.warning("Warning 2".to_string(), None);
        assert_eq!(reporter.summary(), "2 warnings");

        reporter.report(Diagnostic {
            severity: Severity::Error,
            ..Diagnostic::warning("Error 1".to_string(), Some(span()))
        });
        assert_eq!(reporter.summary(), "1 error and 2 warnings");
    }

    #[test]
    fn test_error_display() {
        let err = CompilerError::parse_error(
            "Expected ';'".to_string(),
            SourceLocation::new("test.casm", 4, 2),
        );
        assert_eq!(err.to_string(), "Parse error at test.casm:4:2: Expected ';'");

        let io: CompilerError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(io.to_string(), "IO error: gone");
    }
}
