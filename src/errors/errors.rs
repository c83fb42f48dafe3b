use std::fmt::Display;

use thiserror::Error;

use crate::SourceLocation;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    location: SourceLocation,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, location: SourceLocation) -> Self {
        Error {
            internal_error: error_impl,
            location,
        }
    }

    pub fn get_location(&self) -> SourceLocation {
        self.location
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::EmptyCharLiteral
            | ErrorImpl::OverlongCharLiteral { .. }
            | ErrorImpl::UnterminatedLiteral { .. } => ErrorKind::LexError,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::InvalidOperatorArity { .. }
            | ErrorImpl::PrecedenceOutOfRange { .. }
            | ErrorImpl::UnaryPrecedence { .. } => ErrorKind::SyntaxError,
            ErrorImpl::VariableNotDeclared { .. } | ErrorImpl::UnknownType { .. } => {
                ErrorKind::NameError
            }
            ErrorImpl::TypeMatchError { .. }
            | ErrorImpl::ArgumentTypeMatchError { .. }
            | ErrorImpl::UnexpectedArguments { .. }
            | ErrorImpl::MissingArguments { .. } => ErrorKind::TypeMismatch,
            ErrorImpl::InfiniteType { .. } => ErrorKind::InfiniteType,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::EmptyCharLiteral => "EmptyCharLiteral",
            ErrorImpl::OverlongCharLiteral { .. } => "OverlongCharLiteral",
            ErrorImpl::UnterminatedLiteral { .. } => "UnterminatedLiteral",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InvalidOperatorArity { .. } => "InvalidOperatorArity",
            ErrorImpl::PrecedenceOutOfRange { .. } => "PrecedenceOutOfRange",
            ErrorImpl::UnaryPrecedence { .. } => "UnaryPrecedence",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::InfiniteType { .. } => "InfiniteType",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::EmptyCharLiteral => ErrorTip::Suggestion(String::from(
                "Character literals must contain exactly one character",
            )),
            ErrorImpl::OverlongCharLiteral { literal } => ErrorTip::Suggestion(format!(
                "Character literal `{}` holds more than one character, use a string instead",
                literal
            )),
            ErrorImpl::UnterminatedLiteral { literal } => {
                ErrorTip::Suggestion(format!("Literal `{}` is missing its closing quote", literal))
            }
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a line break?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::InvalidOperatorArity { operator, expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Operator `{}` takes {} parameter(s), {} given",
                    operator, expected, received
                ))
            }
            ErrorImpl::PrecedenceOutOfRange { precedence, .. } => ErrorTip::Suggestion(format!(
                "Precedence `{}` must be an integer between 1 and 100",
                precedence
            )),
            ErrorImpl::UnaryPrecedence { operator } => ErrorTip::Suggestion(format!(
                "Remove the precedence from unary operator `{}`",
                operator
            )),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::InfiniteType { variable, type_ } => ErrorTip::Suggestion(format!(
                "`{}` would have to contain itself through `{}`",
                variable, type_
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} at {}: {}", self.get_kind(), self.location, self.internal_error)
    }
}

impl std::error::Error for Error {}

/// The coarse error taxonomy reported to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LexError,
    SyntaxError,
    NameError,
    TypeMismatch,
    InfiniteType,
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("empty character literal")]
    EmptyCharLiteral,
    #[error("character literal too long: {literal:?}")]
    OverlongCharLiteral { literal: String },
    #[error("unterminated literal: {literal:?}")]
    UnterminatedLiteral { literal: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("operator {operator:?} expects {expected} parameter(s), received {received}")]
    InvalidOperatorArity { operator: String, expected: usize, received: usize },
    #[error("precedence {precedence:?} of operator {operator:?} is out of range")]
    PrecedenceOutOfRange { operator: String, precedence: String },
    #[error("unary operator {operator:?} cannot declare a precedence")]
    UnaryPrecedence { operator: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMatchError { expected: String, received: String },
    #[error("argument types do not match: expected {expected:?}, received {received:?}")]
    ArgumentTypeMatchError { expected: String, received: String },
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("missing arguments: expected {expected:?}, received {received:?}")]
    MissingArguments { expected: usize, received: usize },
    #[error("infinite type: {variable} occurs in {type_}")]
    InfiniteType { variable: String, type_: String },
}
