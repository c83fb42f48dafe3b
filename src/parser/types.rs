//! Type annotation parsing.
//!
//! Annotations are bare type names: `x:int`, `f x:double -> double`.
//! Names are resolved later against the type environment.

use crate::{
    ast::types::TypeAnnotation,
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

pub fn parse_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let error = parser.detailed_error("expected a type name");
    let token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(TypeAnnotation {
        name: token.value,
        location: token.location,
    })
}

/// Parses `: type` if the current token is a colon.
pub fn parse_optional_annotation(parser: &mut Parser) -> Result<Option<TypeAnnotation>, Error> {
    if parser.current_token_kind() != TokenKind::Colon {
        return Ok(None);
    }

    parser.advance();
    Ok(Some(parse_type(parser)?))
}

/// Parses `-> type` if the current token is an arrow.
pub fn parse_return_annotation(parser: &mut Parser) -> Result<Option<TypeAnnotation>, Error> {
    if !parser.current_token().is_op("->") {
        return Ok(None);
    }

    parser.advance();
    Ok(Some(parse_type(parser)?))
}
