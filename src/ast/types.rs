use std::fmt::Display;

use crate::SourceLocation;

/// A type written in source, e.g. the `int` in `x:int`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub name: String,
    pub location: SourceLocation,
}

impl Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
