//! CASM Compiler - Frontend
//!
//! This crate provides the frontend components for the CASM compiler:
//! - Lexer: tokenizes CASM source code
//! - Parser: builds the AST from tokens
//! - AST: arena-backed syntax tree with sibling back-links

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{Ast, Node, NodeId, NodeKind};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser};

use casm_common::CompilerError;

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Parse CASM source code into an AST
    pub fn parse_source(source: &str, filename: &str) -> Result<Ast, CompilerError> {
        let tokens = Self::tokenize_source(source, filename)?;
        let mut parser = Parser::new(tokens);
        parser.parse_program()
    }

    /// Tokenize source code (for `--dump-tokens` and verbose output)
    pub fn tokenize_source(source: &str, filename: &str) -> Result<Vec<Token>, CompilerError> {
        let mut lexer = Lexer::new(source, filename);
        lexer.tokenize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontend_parse_simple_function() {
        let source = r#"
func main {
    move(&1, "hi");
    move(&2, &strlen&);
    return();
}
"#;

        let ast = Frontend::parse_source(source, "hello.casm").unwrap();
        let main = ast.function("main").unwrap();
        assert_eq!(ast.siblings(ast.body(main)).count(), 3);
        assert_eq!(ast.node(main).span.start.line, 2);
        assert_eq!(ast.node(main).span.start.filename, "hello.casm");
    }

    #[test]
    fn test_frontend_tokenize() {
        let tokens = Frontend::tokenize_source("move(r1, 42);", "t.casm").unwrap();

        // move ( r1 , 42 ) ; EOF
        assert_eq!(tokens.len(), 8);
        assert_eq!(tokens[0].kind, TokenKind::Move);
        assert_eq!(tokens[2].kind, TokenKind::Register);
        assert_eq!(tokens[4].kind, TokenKind::Number);
        assert_eq!(tokens[7].kind, TokenKind::EndOfFile);
    }

    #[test]
    fn test_frontend_reports_lex_error() {
        let result = Frontend::parse_source("func main { move(r1, \"x); }", "t.casm");
        assert!(matches!(result, Err(CompilerError::LexError { .. })));
    }
}
