//! Unit tests for the lexer module.

use rstest::rstest;

use crate::{errors::errors::ErrorKind, SourceLocation};

use super::{
    lexer::{tokenize, Lexer, TokenSource},
    tokens::TokenKind,
};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).unwrap().iter().map(|token| token.kind).collect()
}

fn values(source: &str) -> Vec<String> {
    tokenize(source).unwrap().into_iter().map(|token| token.value).collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("if then else for in unary binary var import true false"),
        vec![
            TokenKind::If,
            TokenKind::Then,
            TokenKind::Else,
            TokenKind::For,
            TokenKind::In,
            TokenKind::Unary,
            TokenKind::Binary,
            TokenKind::Var,
            TokenKind::Import,
            TokenKind::True,
            TokenKind::False,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo bar baz_123 _underscore CamelCase iff").unwrap();

    for (token, expected) in tokens.iter().zip(["foo", "bar", "baz_123", "_underscore", "CamelCase", "iff"]) {
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.value, expected);
    }
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[rstest]
#[case("42", "42")]
#[case("3.14", "3.14")]
#[case("30.", "30.")]
#[case(".5", ".5")]
#[case("1e10", "1e10")]
#[case("2.5E-3", "2.5E-3")]
fn test_tokenize_numbers(#[case] source: &str, #[case] expected: &str) {
    let tokens = tokenize(source).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, expected);
    assert_eq!(tokens[1].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_range_between_numbers() {
    assert_eq!(values("0..10"), vec!["0", "..", "10", "EOF"]);
    assert_eq!(kinds("0..10"), vec![TokenKind::Number, TokenKind::Range, TokenKind::Number, TokenKind::EOF]);
    assert_eq!(values("1.5..3."), vec!["1.5", "..", "3.", "EOF"]);
}

#[test]
fn test_tokenize_operator_runs() {
    let tokens = tokenize("a |> b <= c -> d").unwrap();

    assert_eq!(tokens[1].kind, TokenKind::Op);
    assert_eq!(tokens[1].value, "|>");
    assert_eq!(tokens[3].value, "<=");
    assert_eq!(tokens[5].value, "->");
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) [ ] , :"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_strings() {
    let tokens = tokenize(r#""hello" "tab\there" "quote\"d" "\x41""#).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "tab\there");
    assert_eq!(tokens[2].value, "quote\"d");
    assert_eq!(tokens[3].value, "A");
}

#[test]
fn test_tokenize_chars() {
    let tokens = tokenize(r"'a' '\n' '\''").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Char);
    assert_eq!(tokens[0].value, "a");
    assert_eq!(tokens[1].value, "\n");
    assert_eq!(tokens[2].value, "'");
}

#[rstest]
#[case("''")]
#[case("'ab'")]
#[case("'a")]
#[case("\"open")]
#[case("$")]
fn test_tokenize_lex_errors(#[case] source: &str) {
    let error = tokenize(source).unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::LexError);
    assert_eq!(error.get_location(), SourceLocation::new(1, 1));
}

#[test]
fn test_line_breaks_are_end_of_statement() {
    assert_eq!(
        kinds("x\ny # comment\n\nz"),
        vec![
            TokenKind::Identifier,
            TokenKind::EOS,
            TokenKind::Identifier,
            TokenKind::EOS,
            TokenKind::EOS,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_token_locations() {
    let tokens = tokenize("fac n =\n    if n < 2 n").unwrap();

    assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
    assert_eq!(tokens[1].location, SourceLocation::new(1, 5));
    assert_eq!(tokens[2].location, SourceLocation::new(1, 7));
    assert_eq!(tokens[3].kind, TokenKind::EOS);
    assert_eq!(tokens[4].kind, TokenKind::If);
    assert_eq!(tokens[4].location, SourceLocation::new(2, 5));
    assert_eq!(tokens[6].location, SourceLocation::new(2, 10));
}

#[test]
fn test_lexer_recovers_after_error() {
    let mut lexer = Lexer::new(String::from("$ x"));

    assert!(lexer.next_token().is_err());
    let token = lexer.next_token().unwrap();
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(token.value, "x");
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new(String::from("x"));

    lexer.next_token().unwrap();
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::EOF);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::EOF);
}
