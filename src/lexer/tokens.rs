use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::SourceLocation;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("if", TokenKind::If);
        map.insert("then", TokenKind::Then);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("in", TokenKind::In);
        map.insert("unary", TokenKind::Unary);
        map.insert("binary", TokenKind::Binary);
        map.insert("var", TokenKind::Var);
        map.insert("import", TokenKind::Import);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    /// End of statement, produced for every line break.
    EOS,
    /// Placeholder for text the lexer rejected; the error is kept by the token stream.
    Invalid,

    Number,
    String,
    Char,
    Identifier,

    /// A run of operator characters, e.g. `+`, `<=` or `|>`.
    Op,
    /// `..`
    Range,

    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
    Comma,
    Colon,

    // Reserved
    If,
    Then,
    Else,
    For,
    In,
    Unary,
    Binary,
    Var,
    Import,
    True,
    False,
}

impl TokenKind {
    /// Tokens that may begin an argument of a juxtaposed application.
    pub fn starts_term(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::Char
                | TokenKind::True
                | TokenKind::False
                | TokenKind::OpenParen
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub location: SourceLocation,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::EOS => write!(f, "end of line"),
            TokenKind::EOF => write!(f, "end of file"),
            _ => write!(f, "{}", self.value),
        }
    }
}

impl Token {
    /// True for an operator token spelled exactly `spelling`.
    pub fn is_op(&self, spelling: &str) -> bool {
        self.kind == TokenKind::Op && self.value == spelling
    }
}
