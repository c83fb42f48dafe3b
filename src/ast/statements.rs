use crate::{parser::operators::Arity, SourceLocation};

use super::{ast::NodeId, types::TypeAnnotation};

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub annotation: Option<TypeAnnotation>,
    pub location: SourceLocation,
}

/// `var x = e`, `x = e` or `x:type = e`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub annotation: Option<TypeAnnotation>,
    pub init: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrototypeKind {
    Function,
    Operator(Arity),
}

/// A function signature. Without a body it declares an imported function.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    /// Callable name; operators are named `unary<op>` or `binary<op>`.
    pub name: String,
    /// Spelling of the operator for operator prototypes.
    pub operator: Option<String>,
    pub kind: PrototypeKind,
    pub precedence: u32,
    pub parameters: Vec<Parameter>,
    pub return_annotation: Option<TypeAnnotation>,
}

impl Prototype {
    pub fn is_operator(&self) -> bool {
        matches!(self.kind, PrototypeKind::Operator(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub prototype: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<NodeId>,
}
