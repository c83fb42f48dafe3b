//! Integration tests for the whole front end.
//!
//! These tests drive sources through a session, from lexing and parsing with
//! user operators to type inference, and check the annotated result.

use mfront::{
    ast::ast::NodeKind,
    errors::errors::ErrorKind,
    parser::parser::parse,
    session::{Session, SessionConfig},
    type_checker::{
        type_checker::TypeChecker,
        types::{Type, TypeStore},
        unify::UnifyError,
    },
};
use rstest::rstest;

fn session() -> Session {
    Session::new(SessionConfig::default()).unwrap()
}

fn global_type(session: &Session, name: &str) -> String {
    session.lookup(name).unwrap().canonical().to_string()
}

#[test]
fn test_builtin_precedence_shape() {
    let module = parse("main", "1+2*3\n1-2-3").unwrap();
    let statements = module.statements();

    assert_eq!(module.ast.dump(statements[0]), "(+ 1 (* 2 3))");
    assert_eq!(module.ast.dump(statements[1]), "(- (- 1 2) 3)");
}

#[test]
fn test_unify_primitives() {
    let mut store = TypeStore::new();
    let int = store.new_operator("int", vec![]);
    let also_int = store.new_operator("int", vec![]);
    let double = store.new_operator("double", vec![]);

    assert!(store.unify(int, also_int, &[]).is_ok());
    assert!(matches!(store.unify(int, double, &[]), Err(UnifyError::Mismatch { .. })));
}

#[test]
fn test_occurs_check_rejects_self_reference() {
    let mut store = TypeStore::new();
    let x = store.new_variable();
    let function = store.new_function(vec![x], x);

    assert!(matches!(store.unify(x, function, &[]), Err(UnifyError::InfiniteType { .. })));
}

#[test]
fn test_let_polymorphism() {
    let mut session = session();
    let module = session.compile("main", "f a = a\ni = f 1\nd = f 1.0").unwrap();
    let i = module.find_declaration("i").unwrap();
    let d = module.find_declaration("d").unwrap();
    let module = session.program().module("main").unwrap();

    assert_eq!(session.type_of(module, i), Some(Type::named("int")));
    assert_eq!(session.type_of(module, d), Some(Type::named("double")));
    assert_eq!(global_type(&session, "f"), "'t0 -> 't0");
}

#[test]
fn test_dynamic_operator_shape_and_type() {
    let mut session = session();
    let source = "binary |> 9 (a b) = a+b\nr = 3 |> 4 |> 2";
    let module = session.compile("main", source).unwrap();
    let r = module.find_declaration("r").unwrap();

    let module = session.program().module("main").unwrap();
    assert_eq!(module.ast.dump(r), "(var r (|> (|> 3 4) 2))");
    assert_eq!(session.type_of(module, r), Some(Type::named("int")));
}

#[test]
fn test_for_desugaring() {
    let module = parse("main", "for i in 0..10 body").unwrap();
    let NodeKind::For(for_expr) = module.ast.kind(module.statements()[0]) else {
        panic!("expected a for expression");
    };

    assert_eq!(module.ast.dump(for_expr.end), "(< i 10)");
    assert_eq!(module.ast.dump(for_expr.step), "1");
}

#[test]
fn test_layout_termination() {
    let source = "\
loop n =
  for i in 0..n
    if i < 3 then
      print i
    else
      print 0
  n
total = loop 5
";
    let mut session = session();
    session.compile("main", source).unwrap();

    assert_eq!(global_type(&session, "loop"), "int -> int");
    assert_eq!(global_type(&session, "total"), "int");
}

#[test]
fn test_binary_operands_must_agree() {
    let mut session = session();
    let errors = session.compile("main", "var x = 1\nvar y = 1.5\nx + y").unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_kind(), ErrorKind::TypeMismatch);
    assert_eq!(errors[0].get_location().line, 3);
}

#[test]
fn test_program_with_prelude() {
    let source = "\
distance x1 y1 x2 y2 =
  dx = x1 - x2
  dy = y1 - y2
  sqrt (dx * dx + dy * dy)

# operators defined here apply to the rest of the file
binary ** 50 (base exp) =
  base * exp

d = distance 0.0 0.0 3.0 4.0
print (d ** 2.0)
putchar 'x'
";
    let mut session = session();
    session.compile("main", source).unwrap();

    assert_eq!(
        global_type(&session, "distance"),
        "double -> double -> double -> double -> double"
    );
    assert_eq!(global_type(&session, "binary**"), "'t0 -> 't0 -> 't0");
    assert_eq!(global_type(&session, "d"), "double");
}

#[rstest]
#[case("x = 'ab'", ErrorKind::LexError)]
#[case("x = \"open", ErrorKind::LexError)]
#[case("x = 1 2", ErrorKind::SyntaxError)]
#[case("binary |> 101 (a b) = a", ErrorKind::SyntaxError)]
#[case("x = unknown", ErrorKind::NameError)]
#[case("x = 1 + true", ErrorKind::TypeMismatch)]
#[case("f x = f", ErrorKind::InfiniteType)]
fn test_error_taxonomy(#[case] source: &str, #[case] kind: ErrorKind) {
    let mut session = session();
    let errors = session.compile("main", source).unwrap_err();

    assert_eq!(errors[0].get_kind(), kind);
}

#[test]
fn test_interactive_session() {
    let mut session = Session::new(SessionConfig::interactive()).unwrap();

    let results = session.submit("sq x = x * x\nbad = sq 2 + 1.5\ngood = sq 4");
    assert!(results[0].is_ok());
    assert_eq!(results[1].as_ref().unwrap_err().get_kind(), ErrorKind::TypeMismatch);
    assert!(results[2].is_ok());

    let results = session.submit("binary %% 45 (a b) = a - b\nr = good %% 2 * 3");
    assert!(results.iter().all(|result| result.is_ok()));

    let module = session.interactive().unwrap();
    assert_eq!(module.ast.dump(*results[1].as_ref().unwrap()), "(var r (* (%% good 2) 3))");
    assert_eq!(global_type(&session, "r"), "int");
    assert_eq!(session.lookup("bad"), None);
}

#[test]
fn test_checker_without_session() {
    let mut module = parse("main", "k a b = a\nx = k 1 'c'").unwrap();
    let mut checker = TypeChecker::new();

    assert!(checker.analyze_module(&mut module).is_empty());

    let x = module.find_declaration("x").unwrap();
    assert_eq!(checker.resolve(module.ast.get_type(x).unwrap()), Type::named("int"));
}
