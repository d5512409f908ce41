//! Per-compilation state
//!
//! A [`CompileSession`] owns both registries, the string label and scope
//! bindings recorded by the pre-scan, and the diagnostics collected while
//! emitting. It is created fresh for every call to
//! [`generate_nasm`](crate::generate_nasm).

use crate::calls::CallRegistry;
use crate::strings::{ScopeId, StringRegistry};
use casm_common::{Diagnostic, ErrorReporter, SourceSpan};
use casm_frontend::NodeId;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Positional parameters a system call can carry, one per argument register
pub const MAX_SYSCALL_PARAMS: usize = 7;

/// Code generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodegenOptions {
    /// Function `_start` jumps to; its returns exit the program
    pub entry_function: String,
    pub exit_label: String,
    pub start_label: String,
    pub string_label_prefix: String,
    pub return_label_prefix: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            entry_function: "main".to_string(),
            exit_label: "_exit".to_string(),
            start_label: "_start".to_string(),
            string_label_prefix: "str_".to_string(),
            return_label_prefix: "ret_".to_string(),
        }
    }
}

impl CodegenOptions {
    pub fn with_entry(mut self, entry_function: impl Into<String>) -> Self {
        self.entry_function = entry_function.into();
        self
    }

    /// Label placed before a function's epilogue when an early `return`
    /// has to jump to it
    pub fn epilogue_label(&self, function: &str) -> String {
        format!("{}_epilogue", function)
    }
}

pub struct CompileSession {
    pub options: CodegenOptions,
    pub strings: StringRegistry,
    pub calls: CallRegistry,
    reporter: ErrorReporter,
    string_labels: HashMap<NodeId, String>,
    statement_scopes: HashMap<NodeId, ScopeId>,
    defined_return_labels: HashSet<String>,
}

impl CompileSession {
    pub fn new(options: CodegenOptions) -> Self {
        Self {
            strings: StringRegistry::new(options.string_label_prefix.clone()),
            calls: CallRegistry::new(options.return_label_prefix.clone()),
            options,
            reporter: ErrorReporter::new(),
            string_labels: HashMap::new(),
            statement_scopes: HashMap::new(),
            defined_return_labels: HashSet::new(),
        }
    }

    /// Register a string literal node and remember its label
    pub fn bind_string(&mut self, node: NodeId, literal: &str) -> String {
        let label = self.strings.register(literal).label.clone();
        self.string_labels.insert(node, label.clone());
        label
    }

    pub fn string_label(&self, node: NodeId) -> Option<&str> {
        self.string_labels.get(&node).map(String::as_str)
    }

    pub fn set_scope(&mut self, statement: NodeId, scope: ScopeId) {
        self.statement_scopes.insert(statement, scope);
    }

    /// Scope a statement was visited under; outermost if never visited
    pub fn scope_of(&self, statement: NodeId) -> ScopeId {
        self.statement_scopes
            .get(&statement)
            .copied()
            .unwrap_or(ScopeId::OUTERMOST)
    }

    /// Record that a return label has been placed; false if it already was
    pub fn define_return_label(&mut self, label: &str) -> bool {
        self.defined_return_labels.insert(label.to_string())
    }

    /// Non-fatal problem, kept for the driver to print
    pub fn warn(&mut self, message: String, span: Option<&SourceSpan>) {
        match span {
            Some(span) => debug!("warning at {}: {}", span.start, message),
            None => debug!("warning: {}", message),
        }
        self.reporter.warning(message, span.cloned());
    }

    /// [`warn`](Self::warn) with an explanatory note attached
    pub fn warn_with_note(&mut self, message: String, note: String, span: Option<&SourceSpan>) {
        debug!("warning: {} ({})", message, note);
        self.reporter
            .report(Diagnostic::warning(message, span.cloned()).with_note(note));
    }

    pub fn warning_count(&self) -> usize {
        self.reporter.warning_count()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.reporter.into_diagnostics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casm_common::Severity;
    use casm_frontend::{Ast, NodeKind};

    #[test]
    fn test_default_options() {
        let options = CodegenOptions::default();
        assert_eq!(options.entry_function, "main");
        assert_eq!(options.exit_label, "_exit");
        assert_eq!(options.epilogue_label("b"), "b_epilogue");
        assert_eq!(options.with_entry("start").entry_function, "start");
    }

    #[test]
    fn test_string_bindings_use_prefix() {
        let mut ast = Ast::new();
        let node = ast.push(NodeKind::Str, "\"x\"", SourceSpan::dummy());

        let options = CodegenOptions {
            string_label_prefix: "msg".to_string(),
            ..CodegenOptions::default()
        };
        let mut session = CompileSession::new(options);
        assert_eq!(session.bind_string(node, "\"x\""), "msg0");
        assert_eq!(session.string_label(node), Some("msg0"));
        assert_eq!(session.strings.length_of("msg0"), Some(1));
    }

    #[test]
    fn test_scopes_and_return_labels() {
        let mut ast = Ast::new();
        let stmt = ast.push(NodeKind::Move, "move", SourceSpan::dummy());
        let other = ast.push(NodeKind::Return, "return", SourceSpan::dummy());

        let mut session = CompileSession::new(CodegenOptions::default());
        let scope = session.strings.enter_scope();
        session.set_scope(stmt, scope);

        assert_eq!(session.scope_of(stmt), scope);
        assert_eq!(session.scope_of(other), ScopeId::OUTERMOST);
        assert!(session.define_return_label("ret_0_a_b"));
        assert!(!session.define_return_label("ret_0_a_b"));
    }

    #[test]
    fn test_warnings_become_diagnostics() {
        let mut session = CompileSession::new(CodegenOptions::default());
        session.warn("something odd".to_string(), None);

        assert_eq!(session.warning_count(), 1);
        let diagnostics = session.into_diagnostics();
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].message, "something odd");
    }

    #[test]
    fn test_warning_with_note() {
        let mut session = CompileSession::new(CodegenOptions::default());
        session.warn_with_note("odd".to_string(), "because".to_string(), None);

        assert_eq!(session.warning_count(), 1);
        assert_eq!(session.into_diagnostics()[0].to_string(), "warning: odd\n  note: because");
    }
}
