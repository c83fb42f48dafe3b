//! Unit tests for the parser module.

use std::collections::VecDeque;

use rstest::rstest;

use crate::{
    ast::{
        ast::{Module, NodeKind, NodeType},
        statements::PrototypeKind,
    },
    errors::errors::{ErrorImpl, ErrorKind},
    lexer::{lexer::tokenize, tokens::TokenKind},
};

use super::{
    expr::parse_expr,
    operators::{Arity, OperatorTable},
    parser::{parse, ParseMode, Parser},
    stream::TokenStream,
};

fn statements(source: &str) -> Vec<String> {
    let module = parse("test", source).unwrap();
    dump_statements(&module)
}

fn dump_statements(module: &Module) -> Vec<String> {
    module.statements().iter().map(|statement| module.ast.dump(*statement)).collect()
}

fn single(source: &str) -> String {
    let mut dumped = statements(source);
    assert_eq!(dumped.len(), 1, "expected one statement in {:?}", source);
    dumped.remove(0)
}

fn stream(source: &str) -> TokenStream {
    TokenStream::new(Box::new(VecDeque::from(tokenize(source).unwrap())))
}

#[rstest]
#[case("1+2*3", "(+ 1 (* 2 3))")]
#[case("1-2-3", "(- (- 1 2) 3)")]
#[case("1*2+3", "(+ (* 1 2) 3)")]
#[case("1 < 2 + 3 * 4 - 5", "(< 1 (- (+ 2 (* 3 4)) 5))")]
#[case("a == b && c || d", "(|| (&& (== a b) c) d)")]
#[case("(1 + 2) * 3", "(* (+ 1 2) 3)")]
#[case("-x * 2", "(* (- x) 2)")]
#[case("!flag", "(! flag)")]
#[case("1.5 + .5", "(+ 1.5 0.5)")]
fn test_parse_builtin_precedence(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(single(source), expected);
}

#[test]
fn test_parse_binary_continues_after_line_break() {
    assert_eq!(single("1 +\n  2"), "(+ 1 2)");
}

#[test]
fn test_parse_literals() {
    assert_eq!(single("true"), "true");
    assert_eq!(single("'c'"), "'c'");
    assert_eq!(single("\"hi\""), "\"hi\"");
}

#[test]
fn test_parse_user_binary_operator() {
    let dumped = statements("binary |> 9 (a b) = a+b\n3 |> 4 |> 2");

    assert_eq!(dumped[0], "(fn (proto binary|> a b) (block (+ a b)))");
    assert_eq!(dumped[1], "(|> (|> 3 4) 2)");
}

#[test]
fn test_user_operator_matches_builtin_shape() {
    let user = statements("binary |> 20 (a b) = a\n1 |> 2 |> 3");
    let builtin = statements("1 + 2 + 3");

    assert_eq!(user[1].replace("|>", "+"), builtin[0]);
}

#[rstest]
#[case("binary |> 5 a b = a\n1 |> 2 + 3", "(|> 1 (+ 2 3))")]
#[case("binary |> 50 a b = a\n1 + 2 |> 3", "(+ 1 (|> 2 3))")]
#[case("binary |> a b = a\n1 |> 2 * 3 + 4", "(+ (|> 1 (* 2 3)) 4)")]
fn test_user_operator_precedence(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(statements(source)[1], expected);
}

#[test]
fn test_operator_unknown_before_declaration() {
    let error = parse("test", "3 |> 4\nbinary |> 9 (a b) = a").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
}

#[test]
fn test_operator_registered_in_parser_table() {
    let mut parser = Parser::new(ParseMode::Batch);
    parser.parse_module("test", "binary <> 15 a b = a - b\nunary ~ (x) = 0 - x").unwrap();

    assert_eq!(parser.operators().lookup("<>"), Some((15, Arity::Binary)));
    assert_eq!(parser.operators().lookup("~"), Some((0, Arity::Unary)));
    assert!(parser.operators().is_user_defined("<>", Arity::Binary));
    assert!(!parser.operators().is_user_defined("+", Arity::Binary));

    // A fresh parser starts from the built-in table
    assert_eq!(Parser::new(ParseMode::Batch).operators().lookup("<>"), None);
}

#[test]
fn test_operator_shadowing_builtin() {
    let mut parser = Parser::new(ParseMode::Batch);
    let module = parser.parse_module("test", "binary + 50 (a b) = a\n1 * 2 + 3").unwrap();

    assert_eq!(dump_statements(&module)[1], "(* 1 (+ 2 3))");
    assert_eq!(parser.operators().lookup("+"), Some((50, Arity::Binary)));
}

#[test]
fn test_parse_unary_operator_definition() {
    let dumped = statements("unary ~ (x) = 0 - x\n~ 5");

    assert_eq!(dumped[0], "(fn (proto unary~ x) (block (- 0 x)))");
    assert_eq!(dumped[1], "(~ 5)");
}

#[test]
fn test_parse_parenthesized_operator_definition() {
    let module = parse("test", "(<>) 15 a b = a - b\n1 <> 2 * 3\n(!!) x = x").unwrap();
    let dumped = dump_statements(&module);

    assert_eq!(dumped[0], "(fn (proto binary<> a b) (block (- a b)))");
    assert_eq!(dumped[1], "(<> 1 (* 2 3))");
    assert_eq!(dumped[2], "(fn (proto unary!! x) (block x))");

    let NodeKind::Function(function) = module.ast.kind(module.statements()[0]) else {
        panic!("expected a function");
    };
    let NodeKind::Prototype(prototype) = module.ast.kind(function.prototype) else {
        panic!("expected a prototype");
    };
    assert_eq!(prototype.kind, PrototypeKind::Operator(Arity::Binary));
    assert_eq!(prototype.precedence, 15);
    assert_eq!(prototype.operator.as_deref(), Some("<>"));
    assert!(prototype.is_operator());
}

#[test]
fn test_parenthesized_expression_statement_rewinds() {
    assert_eq!(single("(-x)"), "(- x)");
    assert_eq!(single("(f 1) + 2"), "(+ (call f 1) 2)");
}

#[rstest]
#[case("unary - 5 (x) = 0 - x", "UnaryPrecedence")]
#[case("binary |> 101 (a b) = a", "PrecedenceOutOfRange")]
#[case("binary |> 0 (a b) = a", "PrecedenceOutOfRange")]
#[case("binary |> 2.5 (a b) = a", "PrecedenceOutOfRange")]
#[case("binary |> (a b c) = a", "InvalidOperatorArity")]
#[case("unary ~ (a b) = a", "InvalidOperatorArity")]
#[case("(<>) a b c = a", "InvalidOperatorArity")]
fn test_invalid_operator_definitions(#[case] source: &str, #[case] name: &str) {
    let error = parse("test", source).unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
    assert_eq!(error.get_error_name(), name);
}

#[test]
fn test_invalid_operator_is_not_registered() {
    let mut parser = Parser::new(ParseMode::Batch);

    assert!(parser.parse_module("test", "binary |> (a b c) = a").is_err());
    assert_eq!(parser.operators().lookup("|>"), None);
}

#[test]
fn test_parse_for_desugaring() {
    let module = parse("test", "for i in 0..10 body").unwrap();
    let statement = module.statements()[0];

    let NodeKind::For(for_expr) = module.ast.kind(statement) else {
        panic!("expected a for expression");
    };
    assert_eq!(for_expr.variable, "i");
    assert_eq!(module.ast.dump(for_expr.end), "(< i 10)");
    assert_eq!(module.ast.dump(for_expr.step), "1");
    assert_eq!(module.ast.dump(for_expr.body), "(block body)");
}

#[test]
fn test_parse_for_with_step() {
    assert_eq!(single("for i in 0..2..10 body"), "(for i 0 (< i 10) 2 (block body))");
    assert_eq!(single("for i in 1..n print i"), "(for i 1 (< i n) 1 (block (call print i)))");
}

#[test]
fn test_parse_for_requires_range() {
    let error = parse("test", "for i in 10 body").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
}

#[test]
fn test_parse_definition_versus_application() {
    assert_eq!(single("f x y = x + y"), "(fn (proto f x y) (block (+ x y)))");
    assert_eq!(single("f x y"), "(call f x y)");
    assert_eq!(single("f x + g y"), "(+ (call f x) (call g y))");
    assert_eq!(single("f (x + 1) y"), "(call f (+ x 1) y)");
    assert_eq!(single("f g x"), "(call f g x)");
    assert_eq!(single("f (g x)"), "(call f (call g x))");
}

#[test]
fn test_parse_definition_with_annotations() {
    let module = parse("test", "add x:int y:int -> int = x + y").unwrap();
    let NodeKind::Function(function) = module.ast.kind(module.statements()[0]) else {
        panic!("expected a function");
    };
    let NodeKind::Prototype(prototype) = module.ast.kind(function.prototype) else {
        panic!("expected a prototype");
    };

    assert_eq!(prototype.name, "add");
    assert_eq!(prototype.kind, PrototypeKind::Function);
    assert_eq!(prototype.parameters.len(), 2);
    assert_eq!(prototype.parameters[0].annotation.as_ref().map(|t| t.name.as_str()), Some("int"));
    assert_eq!(prototype.return_annotation.as_ref().map(|t| t.name.as_str()), Some("int"));
}

#[test]
fn test_application_with_non_identifier_argument_is_not_a_definition() {
    let error = parse("test", "f 1 = 2").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
}

#[test]
fn test_parse_variables() {
    assert_eq!(single("var x = 1"), "(var x 1)");
    assert_eq!(single("x = 1.5"), "(var x 1.5)");

    let module = parse("test", "x:int = 11").unwrap();
    let NodeKind::Var(var) = module.ast.kind(module.statements()[0]) else {
        panic!("expected a variable");
    };
    assert_eq!(var.annotation.as_ref().map(|t| t.name.as_str()), Some("int"));
}

#[test]
fn test_parse_import() {
    assert_eq!(single("import sqrt x:double -> double"), "(proto sqrt x)");
    assert_eq!(single("import putchar (c:char)"), "(proto putchar c)");
}

#[test]
fn test_parse_if_forms() {
    assert_eq!(single("if a then 1 else 2"), "(if a (block 1) (block 2))");
    assert_eq!(single("if n < 2 n\nelse 3"), "(if (< n 2) (block n) (block 3))");
    assert_eq!(
        single("if a then if b then 1 else 2 else 3"),
        "(if a (block (if b (block 1) (block 2))) (block 3))"
    );
}

#[test]
fn test_parse_if_requires_else() {
    let error = parse("test", "if a then 1").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_layout_ends_function_body() {
    let source = "fac n =\n    if n < 2 then n\n    else n * fac (n - 1)\nfac 5";
    let dumped = statements(source);

    assert_eq!(dumped.len(), 2);
    assert_eq!(
        dumped[0],
        "(fn (proto fac n) (block (if (< n 2) (block n) (block (* n (call fac (- n 1)))))))"
    );
    assert_eq!(dumped[1], "(call fac 5)");
}

#[test]
fn test_layout_nested_for_and_if() {
    let source = "loop n =\n  for i in 0..n\n      if i < 5 then print i\n      else print 0\n  n";
    let dumped = statements(source);

    assert_eq!(dumped.len(), 1);
    assert_eq!(
        dumped[0],
        "(fn (proto loop n) (block (for i 0 (< i n) 1 (block (if (< i 5) (block (call print i)) (block (call print 0))))) n))"
    );
}

#[test]
fn test_layout_strictly_less_column_closes_block() {
    // `print x` sits left of the loop body but right of the function body
    let source = "g x =\n    for i in 0..x\n        print i\n      print x\ng 3";
    let module = parse("test", source).unwrap();
    let dumped = dump_statements(&module);

    assert_eq!(dumped.len(), 2);
    assert_eq!(
        dumped[0],
        "(fn (proto g x) (block (for i 0 (< i x) 1 (block (call print i))) (call print x)))"
    );
}

#[test]
fn test_layout_multiple_statements_in_body() {
    let source = "distance x1 y1 x2 y2 =\n  xx = (x1 - x2) * (x1 - x2)\n  yy = (y1 - y2) * (y1 - y2)\n  sqrt (xx + yy)\nd = distance 0.0 0.0 3.0 4.0";
    let dumped = statements(source);

    assert_eq!(dumped.len(), 2);
    assert!(dumped[0].ends_with("(call sqrt (+ xx yy))))"));
    assert_eq!(dumped[1], "(var d (call distance 0.0 0.0 3.0 4.0))");
}

#[test]
fn test_statement_must_end_at_line_break() {
    let error = parse("test", "x = 1 2").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
}

#[test]
fn test_stray_close_paren_at_top_level() {
    let error = parse("test", "x = 1\n)").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
}

#[test]
fn test_lex_error_aborts_statement() {
    let error = parse("test", "x = 'ab'").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::LexError);
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::OverlongCharLiteral {
            literal: String::from("'ab'")
        }
    );
}

#[test]
fn test_parent_links() {
    let module = parse("test", "1+2*3").unwrap();
    let sum = module.statements()[0];
    let NodeKind::Binary(binary) = module.ast.kind(sum) else {
        panic!("expected a binary expression");
    };

    assert_eq!(module.ast.parent(binary.right), Some(sum));
    assert_eq!(module.ast.parent(binary.left), Some(sum));
    assert_eq!(module.ast.parent(sum), Some(module.root));
    assert_eq!(module.ast.parent(module.root), None);
    assert_eq!(module.ast.get(binary.right).kind.get_node_type(), NodeType::Binary);
}

#[test]
fn test_enclosing_function() {
    let module = parse("test", "f x =\n  x + 1").unwrap();
    let function = module.statements()[0];
    let NodeKind::Function(decl) = module.ast.kind(function) else {
        panic!("expected a function");
    };
    let NodeKind::Block(body) = module.ast.kind(decl.body) else {
        panic!("expected a block");
    };

    assert_eq!(module.ast.enclosing_function(body.statements[0]), Some(function));
    assert_eq!(module.ast.enclosing_function(function), None);
    assert_eq!(module.find_declaration("f"), Some(function));
}

#[test]
fn test_interactive_statements_recover() {
    let mut parser = Parser::new(ParseMode::Interactive);
    let mut module = Module::new("interactive");

    let results = parser.parse_statements(&mut module, "var = 3\ny = 2\nz = 1 )\nw = 4");

    assert_eq!(results.len(), 4);
    assert!(results[0].is_err());
    assert_eq!(module.ast.dump(*results[1].as_ref().unwrap()), "(var y 2)");
    assert!(results[2].is_err());
    assert_eq!(module.ast.dump(*results[3].as_ref().unwrap()), "(var w 4)");
}

#[test]
fn test_interactive_line_break_ends_blocks() {
    let mut parser = Parser::new(ParseMode::Interactive);
    let mut module = Module::new("interactive");

    let results = parser.parse_statements(&mut module, "f x =\n  x + 1\n  f 2");

    assert_eq!(results.len(), 2);
    assert_eq!(module.ast.dump(*results[0].as_ref().unwrap()), "(fn (proto f x) (block (+ x 1)))");
    assert_eq!(module.ast.dump(*results[1].as_ref().unwrap()), "(call f 2)");
}

#[test]
fn test_parse_from_token_source() {
    let mut parser = Parser::new(ParseMode::Batch);
    parser.set_tokens(stream("2 * 3 + 4"));

    let expr = parse_expr(&mut parser, 0).unwrap();

    assert_eq!(parser.ast().dump(expr), "(+ (* 2 3) 4)");
    assert!(!parser.has_tokens());
}

#[test]
fn test_with_custom_operator_table() {
    let mut operators = OperatorTable::empty();
    operators.register("+", 10, Arity::Binary);
    operators.register("*", 5, Arity::Binary);

    let mut parser = Parser::with_operators(ParseMode::Batch, operators);
    let module = parser.parse_module("test", "1 + 2 * 3").unwrap();

    assert_eq!(dump_statements(&module), vec!["(* (+ 1 2) 3)"]);
}

#[test]
fn test_token_stream_requeue_is_fifo() {
    let mut tokens = stream("c");
    let a = stream("a").advance();
    let b = stream("b").advance();

    tokens.requeue(vec![a, b]);

    assert_eq!(tokens.advance().value, "a");
    assert_eq!(tokens.advance().value, "b");
    assert_eq!(tokens.advance().value, "c");
    assert_eq!(tokens.current_kind(), TokenKind::EOF);
}

#[test]
fn test_token_stream_checkpoint_rewind() {
    let mut tokens = stream("a b c d");

    let outer = tokens.checkpoint();
    tokens.advance();
    let inner = tokens.checkpoint();
    tokens.advance();
    tokens.advance();
    tokens.rewind(inner);
    assert_eq!(tokens.current().value, "b");

    tokens.advance();
    tokens.rewind(outer);
    assert_eq!(tokens.current().value, "a");

    let checkpoint = tokens.checkpoint();
    tokens.advance();
    tokens.commit(checkpoint);
    assert_eq!(tokens.current().value, "b");
}

#[test]
fn test_token_stream_eof_is_sticky() {
    let mut tokens = stream("x");

    tokens.advance();
    assert_eq!(tokens.advance().kind, TokenKind::EOF);
    assert_eq!(tokens.advance().kind, TokenKind::EOF);
    assert_eq!(tokens.current_kind(), TokenKind::EOF);
}
