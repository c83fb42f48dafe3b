//! Hindley-Milner inference over the AST arena.
//!
//! Every analyzed node gets its [`TypeId`] recorded in the arena. Function
//! parameters, and the function being defined, are non-generic while its body
//! is analyzed. Once the definition is complete they are released, so later
//! uses of the function instantiate its type afresh.

use log::{debug, trace};

use crate::{
    ast::{
        ast::{Ast, Module, NodeId, NodeKind},
        expressions::{BinaryExpr, ConditionExpr, ForExpr, Literal, NumberLiteral, UnaryExpr},
        statements::{FunctionDecl, Parameter, Prototype, VarDecl},
        types::TypeAnnotation,
    },
    errors::errors::{Error, ErrorImpl},
    SourceLocation,
};

use super::{
    env::TypeEnv,
    types::{Type, TypeExpr, TypeId, TypeStore, FUNCTION_TYPE},
    unify::UnifyError,
};

const COMPARISON_OPERATORS: [&str; 6] = ["<", ">", "==", "!=", "<=", ">="];
const LOGICAL_OPERATORS: [&str; 2] = ["&&", "||"];
const ARITHMETIC_OPERATORS: [&str; 4] = ["+", "-", "*", "/"];

#[derive(Debug, Clone)]
pub struct TypeChecker {
    store: TypeStore,
    env: TypeEnv,
    /// Most recently entered node, used to place errors in their function.
    last_visited: Option<NodeId>,
}

impl TypeChecker {
    pub fn new() -> Self {
        let mut store = TypeStore::new();
        let env = TypeEnv::new(&mut store);

        TypeChecker {
            store,
            env,
            last_visited: None,
        }
    }

    pub fn store(&self) -> &TypeStore {
        &self.store
    }

    pub fn env(&self) -> &TypeEnv {
        &self.env
    }

    pub fn resolve(&self, ty: TypeId) -> Type {
        self.store.resolve(ty)
    }

    /// Unifies `expected` with `found` under the current non-generic set.
    pub fn unify(&mut self, expected: TypeId, found: TypeId) -> Result<(), UnifyError> {
        self.store.unify(expected, found, self.env.non_generic())
    }

    /// Analyzes every top-level statement of `module`.
    ///
    /// An error abandons only the statement it occurred in; the errors are returned in source order.
    pub fn analyze_module(&mut self, module: &mut Module) -> Vec<Error> {
        debug!("analyzing module `{}`", module.name);

        let mut errors = vec![];
        let mut last = None;

        for statement in module.statements().to_vec() {
            match self.analyze_statement(&mut module.ast, statement) {
                Ok(ty) => last = Some(ty),
                Err(error) => errors.push(error),
            }
        }

        let ty = last.unwrap_or(self.env.primitives().unit);
        module.ast.set_type(module.root, ty);
        errors
    }

    /// Analyzes one top-level statement.
    pub fn analyze_statement(&mut self, ast: &mut Ast, statement: NodeId) -> Result<TypeId, Error> {
        let depth = self.env.depth();
        let mark = self.env.non_generic_mark();

        match self.analyze(ast, statement) {
            Ok(ty) => {
                if let Some(name) = ast.declared_name(statement) {
                    debug!("{} : {}", name, self.resolve(ty).canonical());
                }
                Ok(ty)
            }
            Err(error) => {
                let function = self
                    .last_visited
                    .and_then(|node| ast.enclosing_function(node))
                    .and_then(|function| ast.declared_name(function))
                    .unwrap_or("<top level>");
                debug!("abandoned statement {} in `{}`: {}", statement, function, error);

                while self.env.depth() > depth {
                    self.env.leave_scope();
                }
                self.env.restore_non_generic(mark);
                Err(error)
            }
        }
    }

    /// Infers the type of `node` and records it in the arena.
    pub fn analyze(&mut self, ast: &mut Ast, node: NodeId) -> Result<TypeId, Error> {
        self.last_visited = Some(node);
        let location = ast.location(node);
        trace!("analyze: {} {:?}", node, ast.kind(node).get_node_type());

        let ty = match ast.kind(node).clone() {
            NodeKind::Number(NumberLiteral::Int(_)) => self.env.primitives().int,
            NodeKind::Number(NumberLiteral::Double(_)) => self.env.primitives().double,
            NodeKind::Literal(Literal::Bool(_)) => self.env.primitives().bool,
            NodeKind::Literal(Literal::Char(_)) => self.env.primitives().char,
            NodeKind::Literal(Literal::Str(_)) => self.env.primitives().string,
            NodeKind::Identifier(identifier) => self.retrieve(&identifier.name, location)?,
            NodeKind::Var(var) => self.analyze_var(ast, &var)?,
            NodeKind::Unary(unary) => self.analyze_unary(ast, &unary, location)?,
            NodeKind::Binary(binary) => self.analyze_binary(ast, &binary, location)?,
            NodeKind::Condition(condition) => self.analyze_condition(ast, &condition)?,
            NodeKind::For(for_expr) => self.analyze_for(ast, &for_expr)?,
            NodeKind::Call(call) => self.analyze_call(ast, &call.callee, &call.arguments, location)?,
            NodeKind::Prototype(prototype) => self.analyze_prototype(&prototype)?,
            NodeKind::Function(function) => self.analyze_function(ast, &function, location)?,
            NodeKind::Block(block) => self.scoped(|checker| {
                let mut last = checker.env.primitives().unit;
                for statement in &block.statements {
                    last = checker.analyze(ast, *statement)?;
                }
                Ok(last)
            })?,
        };

        ast.set_type(node, ty);
        Ok(ty)
    }

    /// Runs `f` in a fresh scope, leaving it again whether or not `f` succeeds.
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        self.env.enter_scope();
        let result = f(self);
        self.env.leave_scope();
        result
    }

    fn retrieve(&mut self, name: &str, location: SourceLocation) -> Result<TypeId, Error> {
        self.env.retrieve(name, &mut self.store).ok_or_else(|| {
            Error::new(
                ErrorImpl::VariableNotDeclared {
                    variable: String::from(name),
                },
                location,
            )
        })
    }

    fn unify_at(&mut self, expected: TypeId, found: TypeId, location: SourceLocation) -> Result<(), Error> {
        self.unify(expected, found).map_err(|error| unify_error(error, location))
    }

    fn annotation_type(&self, annotation: &TypeAnnotation) -> Result<TypeId, Error> {
        self.env.lookup_type(&annotation.name).ok_or_else(|| {
            Error::new(
                ErrorImpl::UnknownType {
                    type_: annotation.name.clone(),
                },
                annotation.location,
            )
        })
    }

    fn parameter_type(&mut self, parameter: &Parameter) -> Result<TypeId, Error> {
        match &parameter.annotation {
            Some(annotation) => self.annotation_type(annotation),
            None => Ok(self.store.new_variable()),
        }
    }

    fn is_named(&self, ty: TypeId, expected: &str) -> bool {
        matches!(
            self.store.get(self.store.prune(ty)),
            TypeExpr::Operator { name, args } if name == expected && args.is_empty()
        )
    }

    /// Accepts `int`, `double`, or a type not yet known.
    fn expect_numeric(&self, ty: TypeId, location: SourceLocation) -> Result<(), Error> {
        let pruned = self.store.prune(ty);
        if let TypeExpr::Variable { .. } = self.store.get(pruned) {
            return Ok(());
        }
        if self.is_named(pruned, "int") || self.is_named(pruned, "double") {
            return Ok(());
        }

        Err(Error::new(
            ErrorImpl::TypeMatchError {
                expected: String::from("int or double"),
                received: self.resolve(pruned).to_string(),
            },
            location,
        ))
    }

    fn analyze_var(&mut self, ast: &mut Ast, var: &VarDecl) -> Result<TypeId, Error> {
        let ty = self.analyze(ast, var.init)?;

        if let Some(annotation) = &var.annotation {
            let expected = self.annotation_type(annotation)?;
            self.unify_at(expected, ty, ast.location(var.init))?;
        }

        self.env.bind(&var.name, ty);
        Ok(ty)
    }

    fn analyze_unary(&mut self, ast: &mut Ast, unary: &UnaryExpr, location: SourceLocation) -> Result<TypeId, Error> {
        let function = unary.function_name();
        if self.env.lookup(&function).is_some() {
            return self.analyze_call(ast, &function, &[unary.operand], location);
        }

        match unary.operator.as_str() {
            "-" => {
                let ty = self.analyze(ast, unary.operand)?;
                self.expect_numeric(ty, ast.location(unary.operand))?;
                Ok(ty)
            }
            "!" => {
                let ty = self.analyze(ast, unary.operand)?;
                let bool_type = self.env.primitives().bool;
                self.unify_at(bool_type, ty, ast.location(unary.operand))?;
                Ok(bool_type)
            }
            _ => Err(Error::new(ErrorImpl::VariableNotDeclared { variable: function }, location)),
        }
    }

    fn analyze_binary(&mut self, ast: &mut Ast, binary: &BinaryExpr, location: SourceLocation) -> Result<TypeId, Error> {
        let function = binary.function_name();
        if self.env.lookup(&function).is_some() {
            return self.analyze_call(ast, &function, &[binary.left, binary.right], location);
        }

        let operator = binary.operator.as_str();
        let builtin = COMPARISON_OPERATORS.contains(&operator)
            || LOGICAL_OPERATORS.contains(&operator)
            || ARITHMETIC_OPERATORS.contains(&operator);
        if !builtin {
            return Err(Error::new(ErrorImpl::VariableNotDeclared { variable: function }, location));
        }

        // Both operands share one type; there is no implicit promotion
        let left = self.analyze(ast, binary.left)?;
        let right = self.analyze(ast, binary.right)?;
        self.unify_at(left, right, ast.location(binary.right))?;

        let bool_type = self.env.primitives().bool;
        if COMPARISON_OPERATORS.contains(&operator) {
            return Ok(bool_type);
        }
        if LOGICAL_OPERATORS.contains(&operator) {
            self.unify_at(bool_type, left, ast.location(binary.left))?;
            return Ok(bool_type);
        }

        self.expect_numeric(left, ast.location(binary.left))?;
        Ok(left)
    }

    fn analyze_condition(&mut self, ast: &mut Ast, condition: &ConditionExpr) -> Result<TypeId, Error> {
        let test = self.analyze(ast, condition.condition)?;
        if !self.is_named(test, "int") {
            let bool_type = self.env.primitives().bool;
            self.unify_at(bool_type, test, ast.location(condition.condition))?;
        }

        let then_type = self.analyze(ast, condition.then_body)?;
        let else_type = self.analyze(ast, condition.else_body)?;
        self.unify_at(then_type, else_type, ast.location(condition.else_body))?;

        Ok(then_type)
    }

    fn analyze_for(&mut self, ast: &mut Ast, for_expr: &ForExpr) -> Result<TypeId, Error> {
        let start = self.analyze(ast, for_expr.start)?;
        self.expect_numeric(start, ast.location(for_expr.start))?;

        let mark = self.env.non_generic_mark();
        let result = self.scoped(|checker| {
            checker.env.bind(&for_expr.variable, start);
            checker.env.push_non_generic(start);

            if for_expr.default_step {
                // The implicit step takes the type of the start
                ast.set_type(for_expr.step, start);
            } else {
                let step = checker.analyze(ast, for_expr.step)?;
                checker.unify_at(start, step, ast.location(for_expr.step))?;
            }

            let end = checker.analyze(ast, for_expr.end)?;
            let bool_type = checker.env.primitives().bool;
            checker.unify_at(bool_type, end, ast.location(for_expr.end))?;

            checker.analyze(ast, for_expr.body)
        });
        self.env.restore_non_generic(mark);
        result?;

        if for_expr.default_step && self.store.resolve(start) == Type::named("double") {
            ast.set_number(for_expr.step, NumberLiteral::Double(1.0));
        }
        Ok(self.env.primitives().int)
    }

    fn analyze_call(
        &mut self,
        ast: &mut Ast,
        callee: &str,
        arguments: &[NodeId],
        location: SourceLocation,
    ) -> Result<TypeId, Error> {
        let function = self.retrieve(callee, location)?;

        let mut argument_types = vec![];
        for argument in arguments {
            argument_types.push(self.analyze(ast, *argument)?);
        }

        let pruned = self.store.prune(function);
        if let TypeExpr::Operator { name, args } = self.store.get(pruned).clone() {
            if name == FUNCTION_TYPE {
                let expected = args.len() - 1;
                let received = arguments.len();
                if received > expected {
                    return Err(Error::new(ErrorImpl::UnexpectedArguments { expected, received }, location));
                }
                if received < expected {
                    return Err(Error::new(ErrorImpl::MissingArguments { expected, received }, location));
                }

                for ((parameter, argument_type), argument) in args.iter().zip(&argument_types).zip(arguments) {
                    self.unify(*parameter, *argument_type)
                        .map_err(|error| argument_error(error, ast.location(*argument)))?;
                }
                return Ok(self.store.prune(args[expected]));
            }
        }

        // Not yet known to be a function: constrain it to one of the right shape
        let ret = self.store.new_variable();
        let expected = self.store.new_function(argument_types, ret);
        self.unify_at(function, expected, location)?;

        Ok(self.store.prune(ret))
    }

    fn analyze_prototype(&mut self, prototype: &Prototype) -> Result<TypeId, Error> {
        let mut parameters = vec![];
        for parameter in &prototype.parameters {
            parameters.push(self.parameter_type(parameter)?);
        }

        let ret = match &prototype.return_annotation {
            Some(annotation) => self.annotation_type(annotation)?,
            None => self.env.primitives().unit,
        };

        let ty = self.store.new_function(parameters, ret);
        self.env.bind(&prototype.name, ty);
        Ok(ty)
    }

    fn analyze_function(&mut self, ast: &mut Ast, function: &FunctionDecl, location: SourceLocation) -> Result<TypeId, Error> {
        let prototype = match ast.kind(function.prototype) {
            NodeKind::Prototype(prototype) => prototype.clone(),
            _ => return self.analyze(ast, function.body),
        };

        // Bound before the body so recursive calls resolve to the same type
        let own_type = self.store.new_variable();
        let shadowed = self.env.bind(&prototype.name, own_type);
        let mark = self.env.non_generic_mark();
        self.env.push_non_generic(own_type);

        let result = self.scoped(|checker| {
            let mut parameters = vec![];
            for parameter in &prototype.parameters {
                let ty = checker.parameter_type(parameter)?;
                checker.env.push_non_generic(ty);
                checker.env.bind(&parameter.name, ty);
                parameters.push(ty);
            }

            let body = checker.analyze(ast, function.body)?;
            if let Some(annotation) = &prototype.return_annotation {
                let expected = checker.annotation_type(annotation)?;
                checker.unify_at(expected, body, ast.location(function.body))?;
            }

            let signature = checker.store.new_function(parameters, body);
            checker.unify_at(own_type, signature, location)?;
            Ok(checker.store.prune(own_type))
        });

        self.env.restore_non_generic(mark);

        match result {
            Ok(ty) => {
                ast.set_type(function.prototype, ty);
                Ok(ty)
            }
            Err(error) => {
                self.env.restore(&prototype.name, shadowed);
                Err(error)
            }
        }
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        TypeChecker::new()
    }
}

fn unify_error(error: UnifyError, location: SourceLocation) -> Error {
    match error {
        UnifyError::Mismatch { expected, found } => Error::new(
            ErrorImpl::TypeMatchError {
                expected: expected.to_string(),
                received: found.to_string(),
            },
            location,
        ),
        UnifyError::InfiniteType { variable, type_ } => Error::new(
            ErrorImpl::InfiniteType {
                variable: variable.to_string(),
                type_: type_.to_string(),
            },
            location,
        ),
    }
}

fn argument_error(error: UnifyError, location: SourceLocation) -> Error {
    match error {
        UnifyError::Mismatch { expected, found } => Error::new(
            ErrorImpl::ArgumentTypeMatchError {
                expected: expected.to_string(),
                received: found.to_string(),
            },
            location,
        ),
        error => unify_error(error, location),
    }
}
