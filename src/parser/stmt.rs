use log::trace;

use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        statements::{Block, FunctionDecl, Parameter, Prototype, PrototypeKind, VarDecl},
        types::TypeAnnotation,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    SourceLocation,
};

use super::{
    expr::parse_expr,
    operators::{Arity, DEFAULT_BINARY_PRECEDENCE, MAX_PRECEDENCE, MIN_PRECEDENCE},
    parser::Parser,
    types::{parse_optional_annotation, parse_return_annotation},
};

pub fn parse_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    trace!("parse_stmt: next token = {:?}", parser.current_token());

    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    parse_expr(parser, 0)
}

fn ends_block(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::EOF | TokenKind::Else | TokenKind::CloseParen | TokenKind::CloseBracket
    )
}

/// Parses a sequence of statements.
///
/// `header` is the location of the construct that opened a nested block;
/// the top-level block has none and runs to the end of input. A nested block
/// ends at a structural token or, in batch mode, at the first statement that
/// starts left of the block's column. The column starts at the header's and
/// then follows the most recent statement.
pub fn parse_block(parser: &mut Parser, header: Option<SourceLocation>) -> Result<NodeId, Error> {
    trace!("parse_block: header = {:?}, next token = {:?}", header, parser.current_token());

    let nested = header.is_some();
    let layout = nested && !parser.is_interactive();
    let mut column = header.map(|location| location.column).unwrap_or(0);
    let mut statements = vec![];
    let mut location = None;

    loop {
        // Line breaks stay unread if the block ends here, so enclosing blocks see them
        let checkpoint = parser.checkpoint();
        parser.skip_eos();

        let current = parser.current_token();
        if ends_block(current.kind) || (layout && current.location.column < column) {
            parser.rewind(checkpoint);
            break;
        }
        parser.commit(checkpoint);

        let start = parser.current_location();
        let statement = parse_stmt(parser)?;
        column = start.column;
        location.get_or_insert(start);
        statements.push(statement);

        match parser.current_token_kind() {
            TokenKind::EOS if nested && parser.is_interactive() => break,
            TokenKind::EOS => {}
            kind if ends_block(kind) => break,
            _ => return Err(parser.detailed_error("expected end of statement")),
        }
    }

    let location = location.or(header).unwrap_or_else(|| parser.current_location());
    Ok(parser.push_node(NodeKind::Block(Block { statements }), location))
}

/// `var name [:type] = init`
pub fn parse_var_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let var_token = parser.advance();

    let error = parser.detailed_error("expected identifier during variable declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;
    let annotation = parse_optional_annotation(parser)?;
    parser.expect_operator("=")?;

    finish_var(parser, name.value, annotation, var_token.location)
}

fn finish_var(
    parser: &mut Parser,
    name: String,
    annotation: Option<TypeAnnotation>,
    location: SourceLocation,
) -> Result<NodeId, Error> {
    let init = parse_expr(parser, 0)?;

    Ok(parser.push_node(NodeKind::Var(VarDecl { name, annotation, init }), location))
}

/// A statement led by an identifier: a variable binding, a function
/// definition, or an expression.
///
/// `f x y = body` and the application `f x y` share a prefix, so the
/// parameter list is parsed speculatively and rewound unless `=` follows it.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let checkpoint = parser.checkpoint();
    let name = parser.advance();

    if parser.current_token().is_op("=") {
        parser.commit(checkpoint);
        parser.advance();
        return finish_var(parser, name.value, None, name.location);
    }

    if parser.current_token_kind() == TokenKind::Colon {
        parser.commit(checkpoint);
        let annotation = parse_optional_annotation(parser)?;
        parser.expect_operator("=")?;
        return finish_var(parser, name.value, annotation, name.location);
    }

    if parser.current_token_kind() == TokenKind::Identifier {
        if let Some((parameters, return_annotation)) = try_parse_definition_header(parser) {
            parser.commit(checkpoint);
            trace!("parse_identifier_stmt: defining `{}`", name.value);

            let prototype = parser.push_node(
                NodeKind::Prototype(Prototype {
                    name: name.value,
                    operator: None,
                    kind: PrototypeKind::Function,
                    precedence: 0,
                    parameters,
                    return_annotation,
                }),
                name.location,
            );
            return parse_function_body(parser, prototype);
        }
    }

    parser.rewind(checkpoint);
    parse_expr(parser, 0)
}

/// Parses `params [-> type] =`, or returns `None` if the tokens do not form a definition header.
fn try_parse_definition_header(parser: &mut Parser) -> Option<(Vec<Parameter>, Option<TypeAnnotation>)> {
    let parameters = parse_parameters(parser).ok()?;
    let return_annotation = parse_return_annotation(parser).ok()?;

    if !parser.current_token().is_op("=") {
        return None;
    }
    parser.advance();

    Some((parameters, return_annotation))
}

/// Parameters are bare identifiers with optional annotations, optionally wrapped in parentheses.
fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, Error> {
    let parenthesized = parser.current_token_kind() == TokenKind::OpenParen;
    if parenthesized {
        parser.advance();
    }

    let mut parameters = vec![];
    while parser.current_token_kind() == TokenKind::Identifier {
        let token = parser.advance();
        let annotation = parse_optional_annotation(parser)?;

        parameters.push(Parameter {
            name: token.value,
            annotation,
            location: token.location,
        });
    }

    if parenthesized {
        let error = parser.detailed_error("expected `)` after parameters");
        parser.expect_error(TokenKind::CloseParen, Some(error))?;
    }

    Ok(parameters)
}

fn parse_function_body(parser: &mut Parser, prototype: NodeId) -> Result<NodeId, Error> {
    let header = parser.ast().location(prototype);
    let body = parse_block(parser, Some(header))?;

    if let NodeKind::Block(block) = parser.ast().kind(body) {
        if block.statements.is_empty() {
            return Err(parser.detailed_error("expected function body"));
        }
    }

    Ok(parser.push_node(NodeKind::Function(FunctionDecl { prototype, body }), header))
}

/// `import name params [-> type]` declares a function implemented elsewhere.
pub fn parse_import_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let import_token = parser.advance();

    let error = parser.detailed_error("expected function name after `import`");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;
    let parameters = parse_parameters(parser)?;
    let return_annotation = parse_return_annotation(parser)?;

    Ok(parser.push_node(
        NodeKind::Prototype(Prototype {
            name: name.value,
            operator: None,
            kind: PrototypeKind::Function,
            precedence: 0,
            parameters,
            return_annotation,
        }),
        import_token.location,
    ))
}

/// `unary op (x) = body` or `binary op [precedence] (a b) = body`
pub fn parse_operator_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let keyword = parser.advance();
    let arity = match keyword.kind {
        TokenKind::Unary => Arity::Unary,
        _ => Arity::Binary,
    };

    let error = parser.detailed_error(&format!("expected operator symbol after `{}`", keyword.value));
    let operator = parser.expect_error(TokenKind::Op, Some(error))?;

    let precedence = parse_precedence_token(parser);
    let precedence = validate_precedence(&operator.value, arity, precedence)?;
    let parameters = parse_parameters(parser)?;
    let return_annotation = parse_return_annotation(parser)?;

    if parameters.len() != arity.count() {
        return Err(Error::new(
            ErrorImpl::InvalidOperatorArity {
                operator: operator.value,
                expected: arity.count(),
                received: parameters.len(),
            },
            keyword.location,
        ));
    }

    if parser.current_token().is_op("=") {
        parser.advance();
    }

    let prototype = push_operator_prototype(
        parser,
        &operator.value,
        arity,
        precedence,
        parameters,
        return_annotation,
        keyword.location,
    );
    parse_function_body(parser, prototype)
}

/// `(op) [precedence] params = body`, or a parenthesized expression.
pub fn parse_paren_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let checkpoint = parser.checkpoint();
    let open = parser.advance();

    if parser.current_token_kind() != TokenKind::Op {
        parser.rewind(checkpoint);
        return parse_expr(parser, 0);
    }
    let operator = parser.advance();

    if parser.current_token_kind() != TokenKind::CloseParen {
        parser.rewind(checkpoint);
        return parse_expr(parser, 0);
    }
    parser.advance();
    parser.commit(checkpoint);

    let precedence = parse_precedence_token(parser);
    let parameters = parse_parameters(parser)?;
    let return_annotation = parse_return_annotation(parser)?;
    parser.expect_operator("=")?;

    let arity = match parameters.len() {
        1 => Arity::Unary,
        2 => Arity::Binary,
        received => {
            return Err(Error::new(
                ErrorImpl::InvalidOperatorArity {
                    operator: operator.value,
                    expected: Arity::Binary.count(),
                    received,
                },
                open.location,
            ))
        }
    };
    let precedence = validate_precedence(&operator.value, arity, precedence)?;

    let prototype = push_operator_prototype(
        parser,
        &operator.value,
        arity,
        precedence,
        parameters,
        return_annotation,
        open.location,
    );
    parse_function_body(parser, prototype)
}

fn parse_precedence_token(parser: &mut Parser) -> Option<Token> {
    if parser.current_token_kind() == TokenKind::Number {
        return Some(parser.advance());
    }
    None
}

fn validate_precedence(operator: &str, arity: Arity, token: Option<Token>) -> Result<u32, Error> {
    let token = match (token, arity) {
        (None, Arity::Unary) => return Ok(0),
        (None, Arity::Binary) => return Ok(DEFAULT_BINARY_PRECEDENCE),
        (Some(token), Arity::Unary) => {
            return Err(Error::new(
                ErrorImpl::UnaryPrecedence {
                    operator: String::from(operator),
                },
                token.location,
            ))
        }
        (Some(token), Arity::Binary) => token,
    };

    match token.value.parse::<u32>() {
        Ok(precedence) if (MIN_PRECEDENCE..=MAX_PRECEDENCE).contains(&precedence) => Ok(precedence),
        _ => Err(Error::new(
            ErrorImpl::PrecedenceOutOfRange {
                operator: String::from(operator),
                precedence: token.value,
            },
            token.location,
        )),
    }
}

/// Pushes a validated operator prototype and makes the operator available to the rest of the parse.
fn push_operator_prototype(
    parser: &mut Parser,
    operator: &str,
    arity: Arity,
    precedence: u32,
    parameters: Vec<Parameter>,
    return_annotation: Option<TypeAnnotation>,
    location: SourceLocation,
) -> NodeId {
    let prototype = parser.push_node(
        NodeKind::Prototype(Prototype {
            name: format!("{}{}", arity.prefix(), operator),
            operator: Some(String::from(operator)),
            kind: PrototypeKind::Operator(arity),
            precedence,
            parameters,
            return_annotation,
        }),
        location,
    );

    parser.register_operator(operator, precedence, arity);
    prototype
}
