//! Token definitions for the CASM lexer
//!
//! This module defines token kinds and the Token struct.

use casm_common::{SourceLocation, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// CASM token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Instructions
    Move,
    Add,
    Sub,
    Compare,
    Jump,
    JumpEqual,
    JumpNotEqual,
    Return,
    Call,
    Syscall,

    /// `func` (or the older `label`) introducing a function
    FuncKw,

    // Operands
    LabelName,
    Register,
    Number,
    String,
    /// `&strlen&` or the legacy `[counter]`
    Strlen,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,

    Unknown,
    EndOfFile,
}

impl TokenKind {
    /// Keyword lookup for a scanned identifier
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        let kind = match ident {
            "move" => TokenKind::Move,
            "add" => TokenKind::Add,
            "sub" => TokenKind::Sub,
            "compare" => TokenKind::Compare,
            "jump" => TokenKind::Jump,
            "jump_equal" => TokenKind::JumpEqual,
            "jump_not_equal" => TokenKind::JumpNotEqual,
            "return" => TokenKind::Return,
            "call" => TokenKind::Call,
            "sys_call" | "syscall" => TokenKind::Syscall,
            "func" | "label" => TokenKind::FuncKw,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Move => "move",
            TokenKind::Add => "add",
            TokenKind::Sub => "sub",
            TokenKind::Compare => "compare",
            TokenKind::Jump => "jump",
            TokenKind::JumpEqual => "jump_equal",
            TokenKind::JumpNotEqual => "jump_not_equal",
            TokenKind::Return => "return",
            TokenKind::Call => "call",
            TokenKind::Syscall => "sys_call",
            TokenKind::FuncKw => "func",
            TokenKind::LabelName => "label name",
            TokenKind::Register => "register",
            TokenKind::Number => "number",
            TokenKind::String => "string literal",
            TokenKind::Strlen => "&strlen&",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Unknown => "unknown token",
            TokenKind::EndOfFile => "EOF",
        };
        write!(f, "{name}")
    }
}

/// A token with its source text and location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: SourceSpan,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn eof(location: SourceLocation) -> Self {
        Self {
            kind: TokenKind::EndOfFile,
            text: String::new(),
            span: SourceSpan::from_location(location),
        }
    }

    /// Position of the first character of the token
    pub fn location(&self) -> &SourceLocation {
        &self.span.start
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfFile => write!(f, "EOF at {}", self.span.start),
            _ => write!(f, "'{}' ({}) at {}", self.text, self.kind, self.span.start),
        }
    }
}
