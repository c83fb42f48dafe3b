//! Unification over the [`TypeStore`].

use std::{collections::HashMap, fmt::Display};

use log::trace;

use super::types::{Type, TypeExpr, TypeId, TypeStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifyError {
    Mismatch { expected: Type, found: Type },
    InfiniteType { variable: Type, type_: Type },
}

impl Display for UnifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnifyError::Mismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            UnifyError::InfiniteType { variable, type_ } => {
                write!(f, "infinite type: {} occurs in {}", variable, type_)
            }
        }
    }
}

impl TypeStore {
    /// Follows instance links to the representative of `id`.
    pub fn prune(&self, id: TypeId) -> TypeId {
        let mut current = id;
        while let TypeExpr::Variable { instance: Some(instance) } = self.get(current) {
            current = *instance;
        }
        current
    }

    /// Whether the variable `variable` appears anywhere inside `haystack`.
    pub fn occurs_in(&self, variable: TypeId, haystack: TypeId) -> bool {
        let variable = self.prune(variable);
        let haystack = self.prune(haystack);

        if variable == haystack {
            return true;
        }

        match self.get(haystack) {
            TypeExpr::Variable { .. } => false,
            TypeExpr::Operator { args, .. } => args.iter().any(|arg| self.occurs_in(variable, *arg)),
        }
    }

    /// A variable is generic unless it occurs in one of the non-generic types.
    pub fn is_generic(&self, variable: TypeId, nogens: &[TypeId]) -> bool {
        !nogens.iter().any(|nogen| self.occurs_in(variable, *nogen))
    }

    /// Makes `t1` and `t2` the same type.
    ///
    /// `t1` is the expected side in reported mismatches. When two unbound
    /// variables meet, a non-generic one stays the representative.
    pub fn unify(&mut self, t1: TypeId, t2: TypeId, nogens: &[TypeId]) -> Result<(), UnifyError> {
        let a = self.prune(t1);
        let b = self.prune(t2);
        trace!("unify: {} with {}", self.resolve(a), self.resolve(b));

        if a == b {
            return Ok(());
        }

        match (self.get(a).clone(), self.get(b).clone()) {
            (TypeExpr::Variable { .. }, TypeExpr::Variable { .. }) => {
                if self.is_generic(a, nogens) {
                    self.bind(a, b);
                } else {
                    self.bind(b, a);
                }
                Ok(())
            }
            (TypeExpr::Variable { .. }, TypeExpr::Operator { .. }) => self.bind_checked(a, b),
            (TypeExpr::Operator { .. }, TypeExpr::Variable { .. }) => self.bind_checked(b, a),
            (
                TypeExpr::Operator { name: a_name, args: a_args },
                TypeExpr::Operator { name: b_name, args: b_args },
            ) => {
                if a_name != b_name || a_args.len() != b_args.len() {
                    return Err(UnifyError::Mismatch {
                        expected: self.resolve(a),
                        found: self.resolve(b),
                    });
                }

                for (a_arg, b_arg) in a_args.into_iter().zip(b_args) {
                    self.unify(a_arg, b_arg, nogens)?;
                }
                Ok(())
            }
        }
    }

    fn bind_checked(&mut self, variable: TypeId, instance: TypeId) -> Result<(), UnifyError> {
        if self.occurs_in(variable, instance) {
            return Err(UnifyError::InfiniteType {
                variable: self.resolve(variable),
                type_: self.resolve(instance),
            });
        }

        self.bind(variable, instance);
        Ok(())
    }

    /// Copies `id`, replacing each generic variable with a fresh one.
    ///
    /// Within one call a variable always maps to the same copy. Non-generic
    /// variables, and subterms without generic variables, stay shared.
    pub fn fresh(&mut self, id: TypeId, nogens: &[TypeId]) -> TypeId {
        let mut mapping = HashMap::new();
        self.fresh_with(id, nogens, &mut mapping)
    }

    fn fresh_with(&mut self, id: TypeId, nogens: &[TypeId], mapping: &mut HashMap<TypeId, TypeId>) -> TypeId {
        let id = self.prune(id);

        match self.get(id).clone() {
            TypeExpr::Variable { .. } => {
                if !self.is_generic(id, nogens) {
                    return id;
                }
                *mapping.entry(id).or_insert_with(|| self.new_variable())
            }
            TypeExpr::Operator { name, args } => {
                let copied: Vec<TypeId> = args.iter().map(|arg| self.fresh_with(*arg, nogens, mapping)).collect();

                if copied.iter().zip(&args).all(|(copy, arg)| self.prune(*arg) == *copy) {
                    return id;
                }
                self.new_operator(&name, copied)
            }
        }
    }

    /// Unbound variables reachable from `id`, in order of first appearance.
    pub fn free_variables(&self, id: TypeId) -> Vec<TypeId> {
        let mut variables = vec![];
        self.collect_variables(id, &mut variables);
        variables
    }

    fn collect_variables(&self, id: TypeId, variables: &mut Vec<TypeId>) {
        let id = self.prune(id);
        match self.get(id) {
            TypeExpr::Variable { .. } => {
                if !variables.contains(&id) {
                    variables.push(id);
                }
            }
            TypeExpr::Operator { args, .. } => {
                for arg in args {
                    self.collect_variables(*arg, variables);
                }
            }
        }
    }
}
