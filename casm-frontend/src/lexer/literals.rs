//! Literal scanning for the CASM lexer
//!
//! Numbers and string literals keep their source spelling in the token text.
//! Escape sequences are not decoded here: the code generator needs the raw
//! literal both for the data section and for its length computation.

use crate::lexer::{Lexer, TokenKind};
use casm_common::CompilerError;

impl Lexer {
    /// Tokenize a decimal or `0x` hexadecimal number
    pub fn tokenize_number(&mut self) -> Result<TokenKind, CompilerError> {
        let start_location = self.current_location();

        if self.current_char() == Some('0') && matches!(self.peek_char(1), Some('x') | Some('X')) {
            self.advance_by(2);
            let digits_start = self.position;

            while let Some(ch) = self.current_char() {
                if ch.is_ascii_hexdigit() {
                    self.advance();
                } else {
                    break;
                }
            }

            let digits = self.text_from(digits_start);
            if digits.is_empty() {
                return Err(CompilerError::lexer_error(
                    format!("Invalid hex literal: 0x{}", digits),
                    start_location,
                ));
            }

            return Ok(TokenKind::Number);
        }

        // Any digit run is accepted; the text goes to the assembler unparsed
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        Ok(TokenKind::Number)
    }

    /// Tokenize a double-quoted string literal, quotes included
    pub fn tokenize_string_literal(&mut self) -> Result<TokenKind, CompilerError> {
        let start_location = self.current_location();
        self.advance(); // Skip opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(TokenKind::String);
                }
                '\\' => {
                    // Skip the backslash and whatever it escapes
                    self.advance();
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }

        Err(CompilerError::lexer_error(
            "Unterminated string literal".to_string(),
            start_location,
        ))
    }
}
