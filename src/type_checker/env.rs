use std::collections::HashMap;

use log::debug;

use super::types::{TypeId, TypeStore};

/// The named primitive types every environment starts with.
#[derive(Debug, Clone, Copy)]
pub struct Primitives {
    pub int: TypeId,
    pub double: TypeId,
    pub bool: TypeId,
    pub char: TypeId,
    pub string: TypeId,
    pub unit: TypeId,
}

/// Lexically scoped bindings from names to types.
///
/// Scopes nest strictly. The global scope is never left. Alongside the scopes
/// sits the non-generic list: types whose variables stand for one particular
/// binding and so are shared rather than copied by [`TypeEnv::retrieve`].
#[derive(Debug, Clone)]
pub struct TypeEnv {
    scopes: Vec<HashMap<String, TypeId>>,
    named_types: HashMap<String, TypeId>,
    primitives: Primitives,
    non_generic: Vec<TypeId>,
}

impl TypeEnv {
    pub fn new(store: &mut TypeStore) -> Self {
        let primitives = Primitives {
            int: store.new_operator("int", vec![]),
            double: store.new_operator("double", vec![]),
            bool: store.new_operator("bool", vec![]),
            char: store.new_operator("char", vec![]),
            string: store.new_operator("string", vec![]),
            unit: store.new_operator("unit", vec![]),
        };

        let named_types = HashMap::from([
            (String::from("int"), primitives.int),
            (String::from("double"), primitives.double),
            (String::from("bool"), primitives.bool),
            (String::from("char"), primitives.char),
            (String::from("string"), primitives.string),
            (String::from("unit"), primitives.unit),
        ]);

        TypeEnv {
            scopes: vec![HashMap::new()],
            named_types,
            primitives,
            non_generic: vec![],
        }
    }

    pub fn primitives(&self) -> &Primitives {
        &self.primitives
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
        debug!("entered scope {}", self.scopes.len() - 1);
    }

    pub fn leave_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            debug!("left scope {}", self.scopes.len());
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Binds `name` in the innermost scope and returns what it shadowed there.
    pub fn bind(&mut self, name: &str, ty: TypeId) -> Option<TypeId> {
        self.scopes
            .last_mut()
            .and_then(|scope| scope.insert(String::from(name), ty))
    }

    /// Puts back the innermost binding of `name` as it was before [`TypeEnv::bind`].
    pub fn restore(&mut self, name: &str, previous: Option<TypeId>) {
        if let Some(scope) = self.scopes.last_mut() {
            match previous {
                Some(ty) => scope.insert(String::from(name), ty),
                None => scope.remove(name),
            };
        }
    }

    /// The innermost binding of `name`, without instantiating it.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name).copied())
    }

    pub fn lookup_type(&self, name: &str) -> Option<TypeId> {
        self.named_types.get(name).copied()
    }

    /// Looks up `name` and instantiates its generic variables afresh.
    pub fn retrieve(&self, name: &str, store: &mut TypeStore) -> Option<TypeId> {
        let ty = self.lookup(name)?;
        Some(store.fresh(ty, &self.non_generic))
    }

    pub fn non_generic(&self) -> &[TypeId] {
        &self.non_generic
    }

    pub fn push_non_generic(&mut self, ty: TypeId) {
        self.non_generic.push(ty);
    }

    pub fn non_generic_mark(&self) -> usize {
        self.non_generic.len()
    }

    /// Drops every non-generic type added since `mark` was taken.
    pub fn restore_non_generic(&mut self, mark: usize) {
        self.non_generic.truncate(mark);
    }
}
