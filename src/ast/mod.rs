/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The node arena, node kinds, modules and programs
/// - expressions: Payloads of expression nodes
/// - statements: Payloads of declarations and blocks
/// - types: Type annotations written in source
/// - dump: S-expression rendering of a tree
pub mod ast;
pub mod dump;
pub mod expressions;
pub mod statements;
pub mod types;
