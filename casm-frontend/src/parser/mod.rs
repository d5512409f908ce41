//! CASM Recursive Descent Parser
//!
//! Builds the arena [`Ast`] from the token stream. The top level is a
//! sequence of `func NAME { ... }` definitions; each statement in a block is
//! terminated by `;`. The first syntax error aborts the parse.

pub mod errors;
pub mod statements;

use crate::ast::{Ast, NodeId};
use crate::lexer::{Token, TokenKind};
use casm_common::{CompilerError, SourceLocation};
use log::{debug, warn};
use std::collections::VecDeque;

pub use errors::ParseError;

/// CASM Parser
pub struct Parser {
    pub(crate) tokens: VecDeque<Token>,
    pub(crate) ast: Ast,
    last_location: SourceLocation,
    dropped_statements: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let last_location = tokens
            .last()
            .map(|t| t.span.end.clone())
            .unwrap_or_else(SourceLocation::dummy);

        Self {
            tokens: tokens.into(),
            ast: Ast::new(),
            last_location,
            dropped_statements: 0,
        }
    }

    /// Peek at current token without consuming
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().map_or(TokenKind::EndOfFile, |t| t.kind)
    }

    /// Get current token and advance; the EOF token is never consumed
    pub(crate) fn advance(&mut self) -> Option<Token> {
        match self.peek_kind() {
            TokenKind::EndOfFile => None,
            _ => self.tokens.pop_front(),
        }
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consume token if it matches expected kind
    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect and consume a specific token kind
    pub(crate) fn expect(&mut self, kind: TokenKind, context: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.unexpected(format!("'{}' {}", kind, context)))
    }

    /// Error describing the current token as not being `expected`
    pub(crate) fn unexpected(&self, expected: String) -> ParseError {
        match self.peek() {
            Some(token) if token.kind != TokenKind::EndOfFile => ParseError::UnexpectedToken {
                expected,
                found: token.clone(),
            },
            Some(token) => ParseError::UnexpectedEndOfFile {
                expected,
                location: token.span.start.clone(),
            },
            None => ParseError::UnexpectedEndOfFile {
                expected,
                location: self.last_location.clone(),
            },
        }
    }

    /// Number of statements found outside any function and discarded
    pub fn dropped_statements(&self) -> usize {
        self.dropped_statements
    }

    /// Parse a whole program and run the sibling fix-up pass
    pub fn parse_program(&mut self) -> Result<Ast, CompilerError> {
        let mut functions: Vec<NodeId> = Vec::new();

        while !self.check(TokenKind::EndOfFile) {
            if self.check(TokenKind::FuncKw) {
                functions.push(self.parse_function()?);
                continue;
            }

            let stmt = self.parse_statement()?;
            self.expect(TokenKind::Semicolon, "after statement")?;
            let node = self.ast.node(stmt);
            warn!(
                "{}: '{}' statement outside of any function ignored",
                node.span.start, node.text
            );
            self.dropped_statements += 1;
        }

        let head = self.ast.chain(&functions);
        self.ast.set_head(head);
        self.ast.link_siblings();

        debug!(
            "parsed {} function(s), {} node(s)",
            functions.len(),
            self.ast.len()
        );
        Ok(std::mem::take(&mut self.ast))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::lexer::Lexer;

    fn parse(input: &str) -> Result<Ast, CompilerError> {
        let mut lexer = Lexer::new(input, "test.casm");
        let tokens = lexer.tokenize()?;
        Parser::new(tokens).parse_program()
    }

    #[test]
    fn test_parse_simple_function() {
        let ast = parse(r#"func main { move(&1, "hi"); move(&2, &strlen&); return(); }"#).unwrap();

        let functions: Vec<NodeId> = ast.functions().collect();
        assert_eq!(functions.len(), 1);
        assert_eq!(ast.node(functions[0]).text, "main");

        let body: Vec<NodeId> = ast.siblings(ast.body(functions[0])).collect();
        let kinds: Vec<NodeKind> = body.iter().map(|&id| ast.node(id).kind).collect();
        assert_eq!(kinds, vec![NodeKind::Move, NodeKind::Move, NodeKind::Return]);

        let first = ast.node(body[0]);
        let dst = ast.node(first.first_child.unwrap());
        let src = ast.node(first.second_child.unwrap());
        assert_eq!((dst.kind, dst.text.as_str()), (NodeKind::Register, "&1"));
        assert_eq!((src.kind, src.text.as_str()), (NodeKind::Str, "\"hi\""));

        // Fix-up pass ran
        assert_eq!(ast.node(body[1]).prev, Some(body[0]));
        assert_eq!(ast.node(body[2]).prev, Some(body[1]));
    }

    #[test]
    fn test_parse_multiple_functions() {
        let ast = parse("func a { call(b); return(); }\nfunc b { return(); }").unwrap();
        let names: Vec<&str> = ast.functions().map(|f| ast.node(f).text.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        let b = ast.function("b").unwrap();
        assert_eq!(ast.node(b).prev, ast.function("a"));
    }

    #[test]
    fn test_statement_outside_function_is_dropped() {
        let mut lexer = Lexer::new("move(r1, 1);\nfunc main { return; }", "test.casm");
        let mut parser = Parser::new(lexer.tokenize().unwrap());
        let ast = parser.parse_program().unwrap();

        assert_eq!(parser.dropped_statements(), 1);
        assert_eq!(ast.functions().count(), 1);
    }

    #[test]
    fn test_missing_semicolon() {
        match parse("func main { return() }") {
            Err(CompilerError::ParseError { location, message }) => {
                assert!(message.contains("';'"), "{message}");
                assert_eq!(location.column, 22);
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_end_of_file() {
        match parse("func main { return();") {
            Err(CompilerError::ParseError { message, .. }) => {
                assert!(message.starts_with("Unexpected end of file"), "{message}");
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        assert!(matches!(
            parse("func main { @ }"),
            Err(CompilerError::ParseError { .. })
        ));
    }

    #[test]
    fn test_empty_program() {
        let ast = parse("' nothing here\n").unwrap();
        assert_eq!(ast.head(), None);
        assert!(ast.is_empty());
    }
}
