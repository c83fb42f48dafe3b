//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct. Expressions are parsed by
//! precedence climbing over the parser's own [`OperatorTable`], so operators
//! declared in the source take effect for the rest of the session. Statements
//! and prefix terms are dispatched through lookup tables keyed by token kind.

use std::collections::HashMap;

use log::{debug, trace};

use crate::{
    ast::ast::{Ast, Module, NodeId, NodeKind},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    SourceLocation,
};

use super::{
    lookups::{create_token_lookups, NUDHandler, NUDLookup, StmtHandler, StmtLookup},
    operators::{Arity, OperatorTable},
    stmt::{parse_block, parse_stmt},
    stream::{Checkpoint, TokenStream},
};

/// How blocks end and how errors are recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Whole files. Blocks follow the layout rule and the first error aborts the module.
    #[default]
    Batch,
    /// One statement at a time. A line break closes open blocks and errors only drop their statement.
    Interactive,
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    tokens: TokenStream,
    /// Arena of the module currently being parsed
    ast: Ast,
    operators: OperatorTable,
    mode: ParseMode,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Cleared while the arguments of an application are parsed
    allow_application: bool,
}

impl Parser {
    pub fn new(mode: ParseMode) -> Self {
        Parser::with_operators(mode, OperatorTable::new())
    }

    pub fn with_operators(mode: ParseMode, operators: OperatorTable) -> Self {
        let mut parser = Parser {
            tokens: TokenStream::empty(),
            ast: Ast::new(),
            operators,
            mode,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            allow_application: true,
        };
        create_token_lookups(&mut parser);
        parser
    }

    /// Swaps in `operators`, returning the table in use until now.
    pub fn replace_operators(&mut self, operators: OperatorTable) -> OperatorTable {
        std::mem::replace(&mut self.operators, operators)
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == ParseMode::Interactive
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Replaces the token stream, e.g. to parse from a pre-lexed source.
    pub fn set_tokens(&mut self, tokens: TokenStream) {
        self.tokens = tokens;
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.tokens.current()
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.tokens.current_kind()
    }

    pub fn current_location(&self) -> SourceLocation {
        self.tokens.current_location()
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Token {
        self.tokens.advance()
    }

    pub fn skip_eos(&mut self) {
        while self.current_token_kind() == TokenKind::EOS {
            self.advance();
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn checkpoint(&mut self) -> Checkpoint {
        self.tokens.checkpoint()
    }

    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.tokens.rewind(checkpoint)
    }

    pub fn commit(&mut self, checkpoint: Checkpoint) {
        self.tokens.commit(checkpoint)
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// A token the lexer rejected always reports the lexer's error.
    pub fn expect_error(&mut self, expected_kind: TokenKind, error: Option<Error>) -> Result<Token, Error> {
        if self.current_token_kind() == expected_kind {
            return Ok(self.advance());
        }

        match error {
            Some(error) if self.current_token_kind() != TokenKind::Invalid => Err(error),
            _ => Err(self.unexpected_token_error()),
        }
    }

    /// Expects the operator token spelled `spelling`.
    pub fn expect_operator(&mut self, spelling: &str) -> Result<Token, Error> {
        if self.current_token().is_op(spelling) {
            return Ok(self.advance());
        }
        Err(self.detailed_error(&format!("expected `{}`", spelling)))
    }

    /// Error for the current token, or the lexer's error if the token was rejected.
    pub fn unexpected_token_error(&self) -> Error {
        let token = self.current_token();

        if token.kind == TokenKind::Invalid {
            if let Some(error) = self.tokens.lex_error() {
                return error;
            }
        }

        Error::new(ErrorImpl::UnexpectedToken { token: token.to_string() }, token.location)
    }

    pub fn detailed_error(&self, message: &str) -> Error {
        let token = self.current_token();

        if token.kind == TokenKind::Invalid {
            return self.unexpected_token_error();
        }

        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.to_string(),
                message: String::from(message),
            },
            token.location,
        )
    }

    /// Precedence of the current token as a binary operator, if it is one.
    pub fn current_binary_precedence(&self) -> Option<u32> {
        let token = self.current_token();
        match token.kind {
            TokenKind::Op => self.operators.binary_precedence(&token.value),
            _ => None,
        }
    }

    pub fn register_operator(&mut self, spelling: &str, precedence: u32, arity: Arity) {
        self.operators.register(spelling, precedence, arity);
    }

    pub fn allows_application(&self) -> bool {
        self.allow_application
    }

    /// Sets whether identifiers may start applications, returning the previous setting.
    pub fn set_application(&mut self, allow: bool) -> bool {
        std::mem::replace(&mut self.allow_application, allow)
    }

    pub fn push_node(&mut self, kind: NodeKind, location: SourceLocation) -> NodeId {
        self.ast.push(kind, location)
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    fn begin(&mut self, source: &str) {
        self.tokens = TokenStream::new(Box::new(Lexer::new(String::from(source))));
        self.allow_application = true;
    }

    /// Skips the rest of the current statement.
    pub fn synchronize(&mut self) {
        while !matches!(self.current_token_kind(), TokenKind::EOS | TokenKind::EOF) {
            self.advance();
        }
    }

    /// Parses a whole source as one module. The first error aborts the module.
    pub fn parse_module(&mut self, name: &str, source: &str) -> Result<Module, Error> {
        debug!("parsing module `{}`", name);
        self.begin(source);
        self.ast = Ast::new();

        let root = self.parse_to_end();

        let ast = std::mem::take(&mut self.ast);
        self.tokens = TokenStream::empty();

        Ok(Module {
            name: String::from(name),
            ast,
            root: root?,
        })
    }

    fn parse_to_end(&mut self) -> Result<NodeId, Error> {
        let root = parse_block(self, None)?;
        self.skip_eos();

        if self.has_tokens() {
            return Err(self.unexpected_token_error());
        }
        Ok(root)
    }

    /// Parses each top-level statement of `source` into `module`'s arena.
    ///
    /// Statements are returned in order but not appended to the module's root
    /// block; the caller decides which ones to keep. A failed statement is
    /// skipped up to the next line break and parsing carries on.
    pub fn parse_statements(&mut self, module: &mut Module, source: &str) -> Vec<Result<NodeId, Error>> {
        self.begin(source);
        self.ast = std::mem::take(&mut module.ast);

        let mut results = vec![];
        loop {
            self.skip_eos();
            if !self.has_tokens() {
                break;
            }

            trace!("parse_statements: next token = {:?}", self.current_token());
            let result = parse_stmt(self).and_then(|statement| match self.current_token_kind() {
                TokenKind::EOS | TokenKind::EOF => Ok(statement),
                _ => Err(self.detailed_error("expected end of statement")),
            });

            if result.is_err() {
                self.synchronize();
            }
            results.push(result);
        }

        module.ast = std::mem::take(&mut self.ast);
        self.tokens = TokenStream::empty();
        results
    }
}

/// Parses `source` as a single module with a fresh batch parser.
pub fn parse(name: &str, source: &str) -> Result<Module, Error> {
    Parser::new(ParseMode::Batch).parse_module(name, source)
}
