use std::collections::VecDeque;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    SourceLocation, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// A lazy producer of tokens.
///
/// Once the input is exhausted every further call returns an EOF token.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, Error>;
}

/// A handler consumes the matched text and returns the token it produced,
/// or `None` for skipped input such as whitespace and comments.
pub type RegexHandler = fn(&mut Lexer, &str) -> Result<Option<Token>, Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    static ref TOKEN_PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^[ \t\r]+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^\n").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::EOS) },
        RegexPattern { regex: Regex::new("^#[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^\\.\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Range) },
        RegexPattern {
            regex: Regex::new("^([0-9]+\\.[0-9]*([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+|[0-9]+|\\.[0-9]+([eE][+-]?[0-9]+)?)").unwrap(),
            handler: number_handler,
        },
        RegexPattern { regex: Regex::new("^\"(\\\\.|[^\"\\\\\n])*\"").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^'(\\\\.|[^'\\\\\n])*'").unwrap(), handler: char_handler },
        RegexPattern { regex: Regex::new("^[\"'][^\n]*").unwrap(), handler: unterminated_handler },
        RegexPattern { regex: Regex::new("^[!%&*+\\-./<=>?@^|~]+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Op) },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen) },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen) },
        RegexPattern { regex: Regex::new("^\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket) },
        RegexPattern { regex: Regex::new("^\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket) },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma) },
        RegexPattern { regex: Regex::new("^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon) },
    ];
}

pub struct Lexer {
    source: String,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(source: String) -> Lexer {
        Lexer {
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }

    /// Moves past `text`, which must be the next input, keeping line and column in step.
    pub fn advance_str(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += text.len();
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Result<Token, Error> {
        loop {
            if self.at_eof() {
                return Ok(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), self.location()));
            }

            let matched = TOKEN_PATTERNS.iter().find_map(|pattern| {
                pattern
                    .regex
                    .find(self.remainder())
                    .map(|found| (pattern.handler, found.as_str().to_string()))
            });

            match matched {
                Some((handler, text)) => {
                    if let Some(token) = handler(self, &text)? {
                        return Ok(token);
                    }
                }
                None => {
                    let location = self.location();
                    let unknown = self.remainder().chars().next().map(String::from).unwrap_or_default();
                    self.advance_str(&unknown);
                    return Err(Error::new(ErrorImpl::UnrecognisedToken { token: unknown }, location));
                }
            }
        }
    }
}

/// A pre-lexed token list, mostly useful for driving the parser in tests.
impl TokenSource for VecDeque<Token> {
    fn next_token(&mut self) -> Result<Token, Error> {
        match self.pop_front() {
            Some(token) => Ok(token),
            None => Ok(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), SourceLocation::null())),
        }
    }
}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    lexer.advance_str(matched);
    Ok(None)
}

fn number_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let location = lexer.location();

    // `0..10` is `0` followed by a range, not `0.` followed by `.10`
    let matched = match matched.strip_suffix('.') {
        Some(digits) if lexer.remainder()[matched.len()..].starts_with('.') => digits,
        _ => matched,
    };
    lexer.advance_str(matched);
    Ok(Some(MK_TOKEN!(TokenKind::Number, String::from(matched), location)))
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let location = lexer.location();
    lexer.advance_str(matched);

    let kind = RESERVED_LOOKUP.get(matched).copied().unwrap_or(TokenKind::Identifier);
    Ok(Some(MK_TOKEN!(kind, String::from(matched), location)))
}

fn string_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let location = lexer.location();
    lexer.advance_str(matched);

    let string_literal = unescape(&matched[1..matched.len() - 1]);
    Ok(Some(MK_TOKEN!(TokenKind::String, string_literal, location)))
}

fn char_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let location = lexer.location();
    lexer.advance_str(matched);

    let decoded = unescape(&matched[1..matched.len() - 1]);
    match decoded.chars().count() {
        0 => Err(Error::new(ErrorImpl::EmptyCharLiteral, location)),
        1 => Ok(Some(MK_TOKEN!(TokenKind::Char, decoded, location))),
        _ => Err(Error::new(
            ErrorImpl::OverlongCharLiteral { literal: String::from(matched) },
            location,
        )),
    }
}

fn unterminated_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let location = lexer.location();
    lexer.advance_str(matched);
    Err(Error::new(
        ErrorImpl::UnterminatedLiteral { literal: String::from(matched) },
        location,
    ))
}

fn unescape(literal: &str) -> String {
    let mut result = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some('x') => {
                let mut hex = String::new();
                while hex.len() < 2 {
                    match chars.peek() {
                        Some(digit) if digit.is_ascii_hexdigit() => {
                            hex.push(*digit);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
            }
            // Unknown escapes keep the backslash
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

/// Lexes a whole source into a token vector ending with EOF.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let mut lexer = Lexer::new(String::from(source));
    let mut tokens = vec![];

    loop {
        let token = lexer.next_token()?;
        let at_end = token.kind == TokenKind::EOF;
        tokens.push(token);

        if at_end {
            return Ok(tokens);
        }
    }
}
