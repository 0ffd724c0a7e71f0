//! Token types shared by the scanner and the parser

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location of a token (line and column are 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset into the source
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /* ===================== Keywords ===================== */
    Workflow,
    End,
    Node,
    State,
    Join,
    Enter,
    Leave,
    Transition,
    To,
    If,
    Then,
    For,
    Do,
    Var,
    Def,
    Return,
    True,
    False,
    And,
    Or,
    Not,

    /* ===================== Punctuation ===================== */
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Eq,
    Gt,
    Lt,
    Plus,
    Minus,
    Star,
    Slash,

    /* ===================== Literals ===================== */
    Identifier,
    IntegerLiteral,
    StringLiteral,

    /// Input the scanner could not classify
    Invalid,
    Eof,
}

impl TokenKind {
    /// Map an identifier-shaped word to its keyword kind, if it is one
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "workflow" => TokenKind::Workflow,
            "end" => TokenKind::End,
            "node" => TokenKind::Node,
            "state" => TokenKind::State,
            "join" => TokenKind::Join,
            "enter" => TokenKind::Enter,
            "leave" => TokenKind::Leave,
            "transition" => TokenKind::Transition,
            "to" => TokenKind::To,
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "for" => TokenKind::For,
            "do" => TokenKind::Do,
            "var" => TokenKind::Var,
            "def" => TokenKind::Def,
            "return" => TokenKind::Return,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            _ => return None,
        };
        Some(kind)
    }

    /// Map a single punctuation character to its kind
    pub fn punctuation(ch: char) -> Option<TokenKind> {
        let kind = match ch {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '=' => TokenKind::Eq,
            '>' => TokenKind::Gt,
            '<' => TokenKind::Lt,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            _ => return None,
        };
        Some(kind)
    }

    /// Human readable name used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Workflow => "'workflow'",
            TokenKind::End => "'end'",
            TokenKind::Node => "'node'",
            TokenKind::State => "'state'",
            TokenKind::Join => "'join'",
            TokenKind::Enter => "'enter'",
            TokenKind::Leave => "'leave'",
            TokenKind::Transition => "'transition'",
            TokenKind::To => "'to'",
            TokenKind::If => "'if'",
            TokenKind::Then => "'then'",
            TokenKind::For => "'for'",
            TokenKind::Do => "'do'",
            TokenKind::Var => "'var'",
            TokenKind::Def => "'def'",
            TokenKind::Return => "'return'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::And => "'and'",
            TokenKind::Or => "'or'",
            TokenKind::Not => "'not'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Eq => "'='",
            TokenKind::Gt => "'>'",
            TokenKind::Lt => "'<'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Identifier => "identifier",
            TokenKind::IntegerLiteral => "integer literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Invalid => "invalid input",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token produced by a [`TokenSource`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

/// Producer of tokens consumed by the parser.
///
/// Implementations must keep returning an `Eof` token once the input is
/// exhausted.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

/// Token source over an already-lexed token list
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: std::vec::IntoIter<Token>,
    last: Position,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            last: Position::default(),
        }
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) => {
                self.last = token.position;
                token
            }
            None => Token::new(TokenKind::Eof, "", self.last),
        }
    }
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    fn next_token(&mut self) -> Token {
        (**self).next_token()
    }
}
