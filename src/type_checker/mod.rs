//! Type inference module.
//!
//! Infers a type for every node of a parsed module:
//!
//! - `types`: the type store, a union-find arena of type expressions
//! - `unify`: pruning, the occurs check, unification and instantiation
//! - `env`: scoped name bindings and the non-generic set
//! - `type_checker`: the analyzer walking the AST
//!
//! Errors are reported per top-level statement, so one bad definition does
//! not hide the types of the others.

pub mod env;
pub mod type_checker;
pub mod types;
pub mod unify;
