//! CASM Lexer
//!
//! Tokenizes CASM source into a flat stream of tokens. Whitespace and
//! `'` line comments are skipped; every token keeps its source text and
//! the position it started at.

pub mod literals;
pub mod operators;
pub mod token;

pub use token::{Token, TokenKind};

use casm_common::{CompilerError, SourceLocation, SourceTracker};
use log::trace;

/// CASM Lexer
pub struct Lexer {
    pub(crate) input: Vec<char>,
    pub(crate) position: usize,
    pub(crate) tracker: SourceTracker,
}

impl Lexer {
    /// Create a new lexer for `input`, attributing positions to `filename`
    pub fn new(input: &str, filename: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            tracker: SourceTracker::new(filename),
        }
    }

    /// Get current character
    pub(crate) fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    pub(crate) fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    /// True if the input at the current position starts with `s`
    pub(crate) fn looking_at(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, ch)| self.peek_char(i) == Some(ch))
    }

    /// Advance to next character
    pub(crate) fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.position += 1;
        self.tracker.advance(ch);
        Some(ch)
    }

    pub(crate) fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.tracker.location()
    }

    /// Source text consumed since `start`
    pub(crate) fn text_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    /// Skip whitespace and `'` comments
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '\'' {
                while let Some(c) = self.current_char() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    /// Tokenize an identifier, keyword or `rN` register
    fn tokenize_identifier(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let ident = self.text_from(start);
        if let Some(keyword) = TokenKind::keyword(&ident) {
            return keyword;
        }

        let mut chars = ident.chars();
        match (chars.next(), chars.next()) {
            (Some('r'), Some(d)) if d.is_ascii_digit() => TokenKind::Register,
            _ => TokenKind::LabelName,
        }
    }

    /// Get next token
    pub fn next_token(&mut self) -> Result<Token, CompilerError> {
        self.skip_trivia();

        let start_location = self.current_location();
        let start = self.position;

        let kind = match self.current_char() {
            None => return Ok(Token::eof(start_location)),

            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => self.tokenize_identifier(),

            Some(ch) if ch.is_ascii_digit() => self.tokenize_number()?,

            Some('"') => self.tokenize_string_literal()?,

            Some('&') => self.tokenize_ampersand(),

            Some('[') => self.tokenize_bracket(),

            Some(ch) => self.tokenize_punctuation(ch),
        };

        let token = Token::new(kind, self.text_from(start), self.tracker.span_from(start_location));
        trace!("lexed {}", token);
        Ok(token)
    }

    /// Tokenize entire input into a vector of tokens ending with EOF
    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompilerError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::EndOfFile;
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }
}
