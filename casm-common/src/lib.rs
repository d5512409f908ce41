//! CASM Compiler - Common Types and Utilities
//!
//! This crate contains the source position types, the compiler error type and
//! the diagnostic reporter shared by every stage of the CASM compiler.

pub mod error;
pub mod source_loc;

pub use error::{CompilerError, Diagnostic, ErrorReporter, Severity};
pub use source_loc::{SourceLocation, SourceSpan, SourceTracker};
