//! Type expressions and the store that owns them.
//!
//! Type variables form a union-find: a bound variable links to its instance,
//! and [`TypeStore::prune`](super::unify) follows the links to the
//! representative. Bindings are never undone.

use std::{collections::HashMap, fmt::Display};

/// Spelling of the function type operator.
pub const FUNCTION_TYPE: &str = "->";

/// Handle of a type expression in a [`TypeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Variable { instance: Option<TypeId> },
    /// A named type constructor. Functions use [`FUNCTION_TYPE`] with the
    /// parameter types followed by the return type.
    Operator { name: String, args: Vec<TypeId> },
}

#[derive(Debug, Clone, Default)]
pub struct TypeStore {
    types: Vec<TypeExpr>,
}

impl TypeStore {
    pub fn new() -> Self {
        TypeStore { types: vec![] }
    }

    fn push(&mut self, expr: TypeExpr) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(expr);
        id
    }

    pub fn new_variable(&mut self) -> TypeId {
        self.push(TypeExpr::Variable { instance: None })
    }

    pub fn new_operator(&mut self, name: &str, args: Vec<TypeId>) -> TypeId {
        self.push(TypeExpr::Operator {
            name: String::from(name),
            args,
        })
    }

    pub fn new_function(&mut self, parameters: Vec<TypeId>, ret: TypeId) -> TypeId {
        let mut args = parameters;
        args.push(ret);
        self.new_operator(FUNCTION_TYPE, args)
    }

    pub fn get(&self, id: TypeId) -> &TypeExpr {
        &self.types[id.index()]
    }

    /// Links an unbound variable to `instance`.
    pub(super) fn bind(&mut self, variable: TypeId, instance: TypeId) {
        if let TypeExpr::Variable { instance: slot } = &mut self.types[variable.index()] {
            debug_assert!(slot.is_none(), "type variable bound twice");
            *slot = Some(instance);
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Fully resolved structure of `id`, with every bound variable replaced by its instance.
    pub fn resolve(&self, id: TypeId) -> Type {
        let id = self.prune(id);
        match self.get(id) {
            TypeExpr::Variable { .. } => Type::Var(id.0),
            TypeExpr::Operator { name, args } => Type::Oper {
                name: name.clone(),
                args: args.iter().map(|arg| self.resolve(*arg)).collect(),
            },
        }
    }
}

/// A resolved type, detached from the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Var(u32),
    Oper { name: String, args: Vec<Type> },
}

impl Type {
    pub fn named(name: &str) -> Self {
        Type::Oper {
            name: String::from(name),
            args: vec![],
        }
    }

    pub fn function(parameters: Vec<Type>, ret: Type) -> Self {
        let mut args = parameters;
        args.push(ret);
        Type::Oper {
            name: String::from(FUNCTION_TYPE),
            args,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Oper { name, .. } if name == FUNCTION_TYPE)
    }

    /// Parameter types and return type of a function type.
    pub fn function_parts(&self) -> Option<(&[Type], &Type)> {
        match self {
            Type::Oper { name, args } if name == FUNCTION_TYPE => {
                args.split_last().map(|(ret, parameters)| (parameters, ret))
            }
            _ => None,
        }
    }

    /// Renumbers variables from zero in order of first appearance, so equal
    /// shapes print the same regardless of where their variables were allocated.
    pub fn canonical(&self) -> Type {
        let mut names = HashMap::new();
        self.renumber(&mut names)
    }

    fn renumber(&self, names: &mut HashMap<u32, u32>) -> Type {
        match self {
            Type::Var(id) => {
                let next = names.len() as u32;
                Type::Var(*names.entry(*id).or_insert(next))
            }
            Type::Oper { name, args } => Type::Oper {
                name: name.clone(),
                args: args.iter().map(|arg| arg.renumber(names)).collect(),
            },
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some((parameters, ret)) = self.function_parts() {
            if parameters.is_empty() {
                write!(f, "() -> ")?;
            }
            for parameter in parameters {
                if parameter.is_function() {
                    write!(f, "({}) -> ", parameter)?;
                } else {
                    write!(f, "{} -> ", parameter)?;
                }
            }
            return write!(f, "{}", ret);
        }

        match self {
            Type::Var(id) => write!(f, "'t{}", id),
            Type::Oper { name, args } => {
                write!(f, "{}", name)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
        }
    }
}
