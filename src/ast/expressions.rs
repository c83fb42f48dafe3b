use std::fmt::Display;

use super::ast::NodeId;

/// Numeric literal, integer unless written with a decimal point or exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberLiteral {
    Int(i64),
    Double(f64),
}

impl Display for NumberLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberLiteral::Int(value) => write!(f, "{}", value),
            NumberLiteral::Double(value) => write!(f, "{:?}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Char(char),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpr {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: String,
    pub operand: NodeId,
}

impl UnaryExpr {
    /// Name of the function implementing a user overload of this operator.
    pub fn function_name(&self) -> String {
        format!("unary{}", self.operator)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub operator: String,
    pub left: NodeId,
    pub right: NodeId,
}

impl BinaryExpr {
    pub fn function_name(&self) -> String {
        format!("binary{}", self.operator)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionExpr {
    pub condition: NodeId,
    pub then_body: NodeId,
    pub else_body: NodeId,
}

/// `for var in start..end` or `for var in start..step..end`.
///
/// `end` holds the loop test `var < end`. Without an explicit step, `step` is
/// the literal `1`, written as `1.0` once the start turns out to be a double.
#[derive(Debug, Clone, PartialEq)]
pub struct ForExpr {
    pub variable: String,
    pub start: NodeId,
    pub end: NodeId,
    pub step: NodeId,
    pub body: NodeId,
    pub default_step: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: String,
    pub arguments: Vec<NodeId>,
}
