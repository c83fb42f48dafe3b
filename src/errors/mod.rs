//! Error types and error handling for the front end.
//!
//! Every failure carries a source location and maps onto one of five
//! kinds: lexing, syntax, unbound names, type mismatches and infinite
//! types. Detection sites return these errors instead of panicking;
//! callers decide whether to abort a module or only one statement.

pub mod errors;
