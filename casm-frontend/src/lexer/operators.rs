//! Punctuation and sigil handling for the CASM lexer
//!
//! Covers the single-character delimiters plus the two sigil forms that
//! start with `&`: the `&strlen&` length-of operator and `&N` registers.

use crate::lexer::{Lexer, TokenKind};

const STRLEN: &str = "&strlen&";
const LEGACY_STRLEN: &str = "[counter]";

impl Lexer {
    /// `&strlen&`, `&<digits>`, or a stray `&`
    pub fn tokenize_ampersand(&mut self) -> TokenKind {
        if self.looking_at(STRLEN) {
            self.advance_by(STRLEN.chars().count());
            return TokenKind::Strlen;
        }

        if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // '&'
            while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            return TokenKind::Register;
        }

        self.advance();
        TokenKind::Unknown
    }

    /// `[counter]`, the older spelling of `&strlen&`
    pub fn tokenize_bracket(&mut self) -> TokenKind {
        if self.looking_at(LEGACY_STRLEN) {
            self.advance_by(LEGACY_STRLEN.chars().count());
            TokenKind::Strlen
        } else {
            self.advance();
            TokenKind::Unknown
        }
    }

    pub fn tokenize_punctuation(&mut self, ch: char) -> TokenKind {
        self.advance();
        match ch {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            _ => TokenKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{Lexer, TokenKind};

    #[test]
    fn test_strlen_spellings() {
        let mut lexer = Lexer::new("&strlen& [counter]", "test.casm");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Strlen);
        assert_eq!(tokens[0].text, "&strlen&");
        assert_eq!(tokens[1].kind, TokenKind::Strlen);
        assert_eq!(tokens[1].text, "[counter]");
    }

    #[test]
    fn test_stray_sigils() {
        let mut lexer = Lexer::new("& [x", "test.casm");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].text, "[");
        assert_eq!(tokens[2].kind, TokenKind::LabelName);
    }

    #[test]
    fn test_delimiters() {
        let mut lexer = Lexer::new("(){},;", "test.casm");
        let kinds: Vec<TokenKind> = lexer.tokenize().unwrap().into_iter().map(|t| t.kind).collect();

        assert_eq!(
            kinds,
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::EndOfFile,
            ]
        );
    }
}
