//! Lexical analysis.
//!
//! The lexer is a lazy token source: the parser pulls one token at a time
//! through the [`lexer::TokenSource`] trait. It handles:
//!
//! - Keywords, identifiers, numbers, character and string literals
//! - Runs of operator characters, so user-defined operators lex as one token
//! - Line breaks as end-of-statement tokens, for the layout rule
//! - Comments and whitespace

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
