use log::trace;

use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        expressions::{
            BinaryExpr, CallExpr, ConditionExpr, ForExpr, IdentifierExpr, Literal, NumberLiteral, UnaryExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{parser::Parser, stmt::parse_block};

/// Parses an expression whose binary operators all bind at least as tightly as `min_precedence`.
pub fn parse_expr(parser: &mut Parser, min_precedence: u32) -> Result<NodeId, Error> {
    trace!("parse_expr: next token = {:?}", parser.current_token());
    let lhs = parse_unary(parser)?;
    parse_binary(parser, min_precedence, lhs)
}

pub fn parse_binary(parser: &mut Parser, min_precedence: u32, mut lhs: NodeId) -> Result<NodeId, Error> {
    loop {
        let precedence = match parser.current_binary_precedence() {
            Some(precedence) if precedence >= min_precedence => precedence,
            _ => return Ok(lhs),
        };

        let operator = parser.advance();
        parser.skip_eos();
        let mut rhs = parse_unary(parser)?;

        if let Some(next) = parser.current_binary_precedence() {
            if next > precedence {
                rhs = parse_binary(parser, precedence + 1, rhs)?;
            }
        }

        let location = parser.ast().location(lhs);
        lhs = parser.push_node(
            NodeKind::Binary(BinaryExpr {
                operator: operator.value,
                left: lhs,
                right: rhs,
            }),
            location,
        );
    }
}

/// Any operator symbol in term position is a prefix operator.
pub fn parse_unary(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.current_token();
    if token.kind != TokenKind::Op || token.value == "=" {
        return parse_primary(parser);
    }

    let operator = parser.advance();
    let operand = parse_unary(parser)?;

    Ok(parser.push_node(
        NodeKind::Unary(UnaryExpr {
            operator: operator.value,
            operand,
        }),
        operator.location,
    ))
}

pub fn parse_primary(parser: &mut Parser) -> Result<NodeId, Error> {
    let kind = parser.current_token_kind();

    match parser.get_nud_lookup().get(&kind).copied() {
        Some(handler) => handler(parser),
        None => {
            let error = parser.unexpected_token_error();
            if !matches!(kind, TokenKind::EOS | TokenKind::EOF) {
                parser.advance();
            }
            Err(error)
        }
    }
}

pub fn parse_number_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.advance();
    let is_double = token.value.contains(&['.', 'e', 'E'][..]);

    let value = if is_double {
        token.value.parse().map(NumberLiteral::Double).ok()
    } else {
        token.value.parse().map(NumberLiteral::Int).ok()
    };

    match value {
        Some(value) => Ok(parser.push_node(NodeKind::Number(value), token.location)),
        None => Err(Error::new(ErrorImpl::NumberParseError { token: token.value }, token.location)),
    }
}

pub fn parse_literal_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.advance();

    let literal = match token.kind {
        TokenKind::True => Literal::Bool(true),
        TokenKind::False => Literal::Bool(false),
        TokenKind::Char => match token.value.chars().next() {
            Some(ch) => Literal::Char(ch),
            None => return Err(Error::new(ErrorImpl::EmptyCharLiteral, token.location)),
        },
        _ => Literal::Str(token.value),
    };

    Ok(parser.push_node(NodeKind::Literal(literal), token.location))
}

/// An identifier, or an application when it is followed by argument terms.
///
/// Arguments are prefix terms; an identifier inside the argument list does
/// not start an application of its own, so `f g x` applies `f` to `g` and `x`.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.advance();

    if !parser.allows_application() || !parser.current_token_kind().starts_term() {
        return Ok(parser.push_node(NodeKind::Identifier(IdentifierExpr { name: token.value }), token.location));
    }

    let previous = parser.set_application(false);
    let arguments = parse_arguments(parser);
    parser.set_application(previous);

    Ok(parser.push_node(
        NodeKind::Call(CallExpr {
            callee: token.value,
            arguments: arguments?,
        }),
        token.location,
    ))
}

fn parse_arguments(parser: &mut Parser) -> Result<Vec<NodeId>, Error> {
    let mut arguments = vec![];
    while parser.current_token_kind().starts_term() {
        arguments.push(parse_unary(parser)?);
    }
    Ok(arguments)
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    parser.advance();

    let previous = parser.set_application(true);
    let result = parse_grouped(parser);
    parser.set_application(previous);

    result
}

fn parse_grouped(parser: &mut Parser) -> Result<NodeId, Error> {
    parser.skip_eos();
    let expr = parse_expr(parser, 0)?;
    parser.skip_eos();

    let error = parser.detailed_error("expected `)`");
    parser.expect_error(TokenKind::CloseParen, Some(error))?;
    Ok(expr)
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let if_token = parser.advance();
    let condition = parse_expr(parser, 0)?;

    // `then` is optional and may open the next line
    let checkpoint = parser.checkpoint();
    parser.skip_eos();
    if parser.current_token_kind() == TokenKind::Then {
        parser.commit(checkpoint);
        parser.advance();
    } else {
        parser.rewind(checkpoint);
    }

    let then_body = parse_block(parser, Some(if_token.location))?;

    parser.skip_eos();
    let error = parser.detailed_error("expected `else`");
    let else_token = parser.expect_error(TokenKind::Else, Some(error))?;
    let else_body = parse_block(parser, Some(else_token.location))?;

    Ok(parser.push_node(
        NodeKind::Condition(ConditionExpr {
            condition,
            then_body,
            else_body,
        }),
        if_token.location,
    ))
}

/// `for i in start..end body` or `for i in start..step..end body`.
pub fn parse_for_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let for_token = parser.advance();

    let error = parser.detailed_error("expected identifier after `for`");
    let variable = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let error = parser.detailed_error("expected `in`");
    parser.expect_error(TokenKind::In, Some(error))?;

    // Range bounds never start applications, so `for i in 0..n body` keeps `body` as the loop body
    let previous = parser.set_application(false);
    let range = parse_range(parser);
    parser.set_application(previous);
    let (start, second, third) = range?;

    let default_step = third.is_none();
    let (step, limit) = match third {
        Some(limit) => (second, limit),
        None => {
            let location = parser.ast().location(second);
            (parser.push_node(NodeKind::Number(NumberLiteral::Int(1)), location), second)
        }
    };

    let start_location = parser.ast().location(start);
    let loop_variable = parser.push_node(
        NodeKind::Identifier(IdentifierExpr {
            name: variable.value.clone(),
        }),
        start_location,
    );

    let limit_location = parser.ast().location(limit);
    let end = parser.push_node(
        NodeKind::Binary(BinaryExpr {
            operator: String::from("<"),
            left: loop_variable,
            right: limit,
        }),
        limit_location,
    );

    let body = parse_block(parser, Some(for_token.location))?;

    Ok(parser.push_node(
        NodeKind::For(ForExpr {
            variable: variable.value,
            start,
            end,
            step,
            body,
            default_step,
        }),
        for_token.location,
    ))
}

fn parse_range(parser: &mut Parser) -> Result<(NodeId, NodeId, Option<NodeId>), Error> {
    let start = parse_expr(parser, 0)?;

    let error = parser.detailed_error("expected `..` after the start value");
    parser.expect_error(TokenKind::Range, Some(error))?;

    let second = parse_expr(parser, 0)?;
    if parser.current_token_kind() != TokenKind::Range {
        return Ok((start, second, None));
    }

    parser.advance();
    Ok((start, second, Some(parse_expr(parser, 0)?)))
}
