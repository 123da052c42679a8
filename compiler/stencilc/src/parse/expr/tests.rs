#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use stencil_diagnostic::ErrorCode;
use stencil_lexer::{tokenize, Delimiters};

use crate::builtin::CoreExtension;
use crate::parse::{parse, ParseError};
use crate::registry::Registries;
use crate::{dump_tree, Extension};

fn registries() -> Registries {
    let extensions: Vec<Box<dyn Extension>> = vec![Box::new(CoreExtension)];
    Registries::build(&extensions).unwrap()
}

fn try_parse(src: &str) -> Result<String, ParseError> {
    let registries = registries();
    let tokens = tokenize(src, &registries.lexer_config(Delimiters::default())).unwrap();
    let arena = parse(tokens, &registries, None)?;
    Ok(dump_tree(&arena, &registries))
}

/// The tree of the single expression in `{{ src }}`, without the root and
/// print lines, dedented.
fn expr(src: &str) -> String {
    let tree = try_parse(&format!("{{{{ {src} }}}}")).unwrap();
    tree.lines()
        .skip(2)
        .map(|line| format!("{}\n", &line[4..]))
        .collect()
}

fn error(src: &str) -> ParseError {
    try_parse(&format!("{{{{ {src} }}}}")).unwrap_err()
}

#[test]
fn multiplication_binds_tighter() {
    assert_eq!(
        expr("2 + 3 * 4"),
        "operator + @1\n  data 2 @1\n  operator * @1\n    data 3 @1\n    data 4 @1\n"
    );
}

#[test]
fn left_associative_subtraction() {
    assert_eq!(
        expr("1 - 2 - 3"),
        "operator - @1\n  operator - @1\n    data 1 @1\n    data 2 @1\n  data 3 @1\n"
    );
}

#[test]
fn right_associative_power() {
    assert_eq!(
        expr("2 ** 3 ** 2"),
        "operator ** @1\n  data 2 @1\n  operator ** @1\n    data 3 @1\n    data 2 @1\n"
    );
}

#[test]
fn parentheses_group() {
    assert_eq!(
        expr("(2 + 3) * 4"),
        "operator * @1\n  operator + @1\n    data 2 @1\n    data 3 @1\n  data 4 @1\n"
    );
}

#[test]
fn longest_alias_wins() {
    assert_eq!(
        expr("x is not divisible by 3"),
        "operator is not divisible by @1\n  variable x @1\n  data 3 @1\n"
    );
    // `is not` alone is the negated identity test.
    assert_eq!(expr("x is not y"), "operator !== @1\n  variable x @1\n  variable y @1\n");
    assert_eq!(expr("x is empty"), "operator is empty @1\n  variable x @1\n");
    assert_eq!(
        expr("x not in xs"),
        "operator not in @1\n  variable x @1\n  variable xs @1\n"
    );
}

#[test]
fn index_versus_array_literal() {
    assert_eq!(expr("a[0]"), "index @1\n  variable a @1\n  data 0 @1\n");
    assert_eq!(
        expr("[1, 2, 3]"),
        "data list @1\n  data 1 @1\n  data 2 @1\n  data 3 @1\n"
    );
    assert_eq!(expr("[]"), "data list @1\n");
}

#[test]
fn attribute_access_and_method_calls() {
    assert_eq!(
        expr("user.name"),
        "index @1\n  variable user @1\n  identifier name @1\n"
    );
    assert_eq!(
        expr("s.replace(\"a\", \"b\")"),
        "method replace @1\n  variable s @1\n  data \"a\" @1\n  data \"b\" @1\n"
    );
}

#[test]
fn function_calls() {
    assert_eq!(expr("upper(name)"), "call upper @1\n  variable name @1\n");
    assert_eq!(expr("greet()"), "call greet @1\n");
}

#[test]
fn prefix_operators() {
    assert_eq!(
        expr("not a and b"),
        "operator and @1\n  operator not @1\n    variable a @1\n  variable b @1\n"
    );
    assert_eq!(
        expr("-2 ** 2"),
        "operator - @1\n  operator ** @1\n    data 2 @1\n    data 2 @1\n"
    );
}

#[test]
fn ternary_has_three_operands() {
    assert_eq!(
        expr("a ? 1 : 2"),
        "operator ? @1\n  variable a @1\n  data 1 @1\n  data 2 @1\n"
    );
}

#[test]
fn literals() {
    assert_eq!(expr("true"), "data true @1\n");
    assert_eq!(expr("null"), "data null @1\n");
    assert_eq!(expr("1.5"), "data 1.5 @1\n");
}

#[test]
fn range_binds_tighter_than_membership() {
    assert_eq!(
        expr("x in 1..3"),
        "operator in @1\n  variable x @1\n  operator .. @1\n    data 1 @1\n    data 3 @1\n"
    );
    assert_eq!(
        expr("x not in 1..3"),
        "operator not in @1\n  variable x @1\n  operator .. @1\n    data 1 @1\n    data 3 @1\n"
    );
}

#[test]
fn non_associative_chain_is_rejected() {
    let err = error("1 < 2 < 3");
    assert_eq!(err.code, ErrorCode::E1007);
    assert_eq!(err.message, "operator `less` cannot be chained");
    // The error names the non-associative operator, not the one after it.
    let err = error("1 < 2 == 3");
    assert_eq!(err.message, "operator `less` cannot be chained with `equal`");
    // Grouping makes it legal.
    assert!(try_parse("{{ (1 < 2) == true }}").is_ok());
}

#[test]
fn prefix_only_symbol_in_binary_position() {
    assert_eq!(error("a ! b").code, ErrorCode::E1009);
}

#[test]
fn missing_operand() {
    assert_eq!(error("1 +").code, ErrorCode::E1002);
}

#[test]
fn mismatched_bracket() {
    let err = error("(1 + 2");
    assert_eq!(err.code, ErrorCode::E1004);
    let err = error("[1, 2)");
    assert_eq!(err.code, ErrorCode::E1004);
}
