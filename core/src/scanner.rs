//! Scanner for PMSL source text
//!
//! Converts source text into the token stream consumed by the parser.
//!
//! - `//` line comments and whitespace are skipped
//! - identifiers that spell a keyword become keyword tokens
//! - string literals keep their quotes and escapes in the token text
//! - anything unrecognised becomes an `Invalid` token, which the parser
//!   reports like any other unexpected token

use tracing::warn;

use crate::token::{Position, Token, TokenKind, TokenSource};

pub struct Scanner<'a> {
    input: &'a str,
    /// Byte offset of the next unread character
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scan the whole input, including the trailing `Eof` token
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn position(&self) -> Position {
        Position::new(self.pos, self.line, self.column)
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else if ch == '/' && self.peek_second() == Some('/') {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.bump();
        }
    }

    fn scan_string(&mut self) -> TokenKind {
        // opening quote
        self.bump();
        while let Some(ch) = self.bump() {
            match ch {
                '"' => return TokenKind::StringLiteral,
                '\\' => {
                    self.bump();
                }
                _ => {}
            }
        }
        TokenKind::Invalid
    }
}

impl TokenSource for Scanner<'_> {
    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.position();
        let Some(ch) = self.peek() else {
            return Token::new(TokenKind::Eof, "", start);
        };

        let kind = if ch.is_ascii_alphabetic() || ch == '_' {
            self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
            let word = &self.input[start.offset..self.pos];
            TokenKind::keyword(word).unwrap_or(TokenKind::Identifier)
        } else if ch.is_ascii_digit() {
            self.bump_while(|c| c.is_ascii_digit());
            TokenKind::IntegerLiteral
        } else if ch == '"' {
            self.scan_string()
        } else {
            self.bump();
            TokenKind::punctuation(ch).unwrap_or(TokenKind::Invalid)
        };

        let text = &self.input[start.offset..self.pos];
        if kind == TokenKind::Invalid {
            warn!(position = %start, text, "unrecognised input");
        }
        Token::new(kind, text, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("workflow order end"),
            vec![
                TokenKind::Workflow,
                TokenKind::Identifier,
                TokenKind::End,
                TokenKind::Eof
            ]
        );
        // keywords are case-sensitive and must match the whole word
        assert_eq!(
            kinds("End ending _if"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("(),;=><+-*/"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Eq,
                TokenKind::Gt,
                TokenKind::Lt,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_literals_keep_source_text() {
        let tokens = Scanner::new(r#"42 "say \"hi\"""#).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::IntegerLiteral);
        assert_eq!(tokens[0].text, "42");
        assert_eq!(tokens[1].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[1].text, r#""say \"hi\"""#);
        assert!(tokens[2].is_eof());
    }

    #[test]
    fn test_positions() {
        let tokens = Scanner::new("node a\n  end").tokenize();
        assert_eq!(tokens[0].position, Position::new(0, 1, 1));
        assert_eq!(tokens[1].position, Position::new(5, 1, 6));
        assert_eq!(tokens[2].position, Position::new(9, 2, 3));
        assert_eq!(tokens[3].position, Position::new(12, 2, 6));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a // comment ( ) \n b / c"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Slash,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_invalid_input() {
        let tokens = Scanner::new("a # b").tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Invalid);
        assert_eq!(tokens[1].text, "#");

        let tokens = Scanner::new("x = \"open").tokenize();
        assert_eq!(tokens[2].kind, TokenKind::Invalid);
        assert_eq!(tokens[2].text, "\"open");
        assert!(tokens[3].is_eof());
    }

    #[test]
    fn test_eof_repeats() {
        let mut scanner = Scanner::new("");
        assert!(scanner.next_token().is_eof());
        assert!(scanner.next_token().is_eof());
    }
}
