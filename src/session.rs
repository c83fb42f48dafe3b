//! Compilation sessions.
//!
//! A session owns one parser, and with it one operator table, plus one type
//! checker. Operators and definitions from earlier modules stay visible to
//! later ones in the same session, and separate sessions share nothing.

use log::{debug, error};

use crate::{
    ast::ast::{Module, NodeId, NodeKind, Program},
    errors::errors::Error,
    parser::parser::{ParseMode, Parser},
    type_checker::{type_checker::TypeChecker, types::Type},
};

/// Declarations every session starts with, compiled as the module `builtins`.
pub const PRELUDE: &str = "\
import sin x:double -> double
import cos x:double -> double
import sqrt x:double -> double
import print x -> unit
import putchar c:char -> unit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: ParseMode,
    /// Whether to load [`PRELUDE`] when the session starts.
    pub prelude: bool,
}

impl SessionConfig {
    pub fn interactive() -> Self {
        SessionConfig {
            mode: ParseMode::Interactive,
            ..SessionConfig::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            mode: ParseMode::Batch,
            prelude: true,
        }
    }
}

pub struct Session {
    config: SessionConfig,
    parser: Parser,
    checker: TypeChecker,
    program: Program,
    /// Statements accepted by [`Session::submit`], in order.
    interactive: Option<Module>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, Vec<Error>> {
        let mut session = Session {
            config,
            parser: Parser::new(config.mode),
            checker: TypeChecker::new(),
            program: Program::new(),
            interactive: None,
        };

        if config.prelude {
            session.load_prelude()?;
        }
        Ok(session)
    }

    fn load_prelude(&mut self) -> Result<(), Vec<Error>> {
        let mut module = self
            .parser
            .parse_module("builtins", PRELUDE)
            .map_err(|error| log_errors(vec![error]))?;

        let errors = self.checker.analyze_module(&mut module);
        if !errors.is_empty() {
            return Err(log_errors(errors));
        }

        self.program.builtins = Some(module);
        Ok(())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn checker(&self) -> &TypeChecker {
        &self.checker
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn interactive(&self) -> Option<&Module> {
        self.interactive.as_ref()
    }

    /// Parses and analyzes a whole module.
    ///
    /// A lex or syntax error stops at the first error. Type errors are
    /// collected from every top-level statement. Only a module without errors
    /// joins the program. A rejected module leaves the operator table and the
    /// global bindings as they were before it.
    pub fn compile(&mut self, name: &str, source: &str) -> Result<&Module, Vec<Error>> {
        debug!("compiling module `{}`", name);
        let operators = self.parser.operators().clone();
        let checker = self.checker.clone();

        let mut module = match self.parser.parse_module(name, source) {
            Ok(module) => module,
            Err(error) => {
                self.parser.replace_operators(operators);
                return Err(log_errors(vec![error]));
            }
        };

        let errors = self.checker.analyze_module(&mut module);
        if !errors.is_empty() {
            self.parser.replace_operators(operators);
            self.checker = checker;
            return Err(log_errors(errors));
        }

        self.program.modules.push(module);
        Ok(&self.program.modules[self.program.modules.len() - 1])
    }

    /// Parses and analyzes each top-level statement of `source` on its own.
    ///
    /// A statement with an error is reported and dropped. The others are
    /// appended to the interactive module, so later input can use them.
    pub fn submit(&mut self, source: &str) -> Vec<Result<NodeId, Error>> {
        let mut module = self.interactive.take().unwrap_or_else(|| Module::new("interactive"));
        let mut results = vec![];

        for parsed in self.parser.parse_statements(&mut module, source) {
            let result = parsed.and_then(|statement| {
                self.checker.analyze_statement(&mut module.ast, statement)?;
                Ok(statement)
            });

            match &result {
                Ok(statement) => module.ast.append_statement(module.root, *statement),
                Err(err) => error!("{}", err),
            }
            results.push(result);
        }

        self.interactive = Some(module);
        results
    }

    /// The resolved type of `node`, once it has been analyzed.
    pub fn type_of(&self, module: &Module, node: NodeId) -> Option<Type> {
        module.ast.get_type(node).map(|ty| self.checker.resolve(ty))
    }

    /// The type currently bound to a global name.
    pub fn lookup(&self, name: &str) -> Option<Type> {
        self.checker.env().lookup(name).map(|ty| self.checker.resolve(ty))
    }

    /// Parameter types and return type of a function or prototype.
    pub fn signature(&self, module: &Module, node: NodeId) -> Option<(Vec<Type>, Type)> {
        let prototype = match module.ast.kind(node) {
            NodeKind::Function(function) => function.prototype,
            NodeKind::Prototype(_) => node,
            _ => return None,
        };

        let ty = self.type_of(module, prototype)?;
        let (parameters, ret) = ty.function_parts()?;
        Some((parameters.to_vec(), ret.clone()))
    }
}

fn log_errors(errors: Vec<Error>) -> Vec<Error> {
    for err in &errors {
        error!("{}", err);
    }
    errors
}
