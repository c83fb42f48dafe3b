//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It handles:
//!
//! - Expression parsing by precedence climbing over a mutable operator table
//! - User `unary`/`binary` operator declarations, usable as soon as they are parsed
//! - Call-versus-definition disambiguation through checkpoints on the token stream
//! - Layout-sensitive blocks, relaxed to line-based blocks in interactive mode
//! - Type annotations on variables, parameters and return values

pub mod expr;
pub mod lookups;
pub mod operators;
pub mod parser;
pub mod stmt;
pub mod stream;
pub mod types;

#[cfg(test)]
mod tests;
