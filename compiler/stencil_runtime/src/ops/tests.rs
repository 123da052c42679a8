#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;

fn int(n: i64) -> Value {
    Value::Int(n)
}

#[test]
fn arithmetic_keeps_ints_integral() {
    assert_eq!(add(&int(2), &int(3)).unwrap(), int(5));
    assert_eq!(mul(&int(3), &int(4)).unwrap(), int(12));
    assert_eq!(div(&int(8), &int(2)).unwrap(), int(4));
    assert_eq!(div(&int(7), &int(2)).unwrap(), Value::Float(3.5));
    assert_eq!(add(&int(1), &Value::Float(0.5)).unwrap(), Value::Float(1.5));
    assert_eq!(pow(&int(2), &int(10)).unwrap(), int(1024));
}

#[test]
fn arithmetic_errors() {
    assert_eq!(div(&int(1), &int(0)), Err(RenderError::DivisionByZero));
    assert_eq!(rem(&int(1), &int(0)), Err(RenderError::DivisionByZero));
    assert_eq!(add(&int(i64::MAX), &int(1)), Err(RenderError::Overflow("+")));
    assert!(matches!(
        add(&Value::from("a"), &int(1)),
        Err(RenderError::UnsupportedOperands { op: "+", .. })
    ));
}

#[test]
fn equality_is_loose_identity_is_strict() {
    assert_eq!(eq(&int(1), &Value::Float(1.0)).unwrap(), Value::Bool(true));
    assert_eq!(identical(&int(1), &Value::Float(1.0)).unwrap(), Value::Bool(false));
    assert_eq!(ne(&Value::from("a"), &Value::from("b")).unwrap(), Value::Bool(true));
}

#[test]
fn comparisons() {
    assert_eq!(gt(&int(2), &int(1)).unwrap(), Value::Bool(true));
    assert_eq!(le(&Value::from("a"), &Value::from("b")).unwrap(), Value::Bool(true));
    assert!(lt(&Value::from("a"), &int(1)).is_err());
}

#[test]
fn containment_and_ranges() {
    let list = Value::from(vec![1, 2, 3]);
    assert_eq!(contains(&int(2), &list).unwrap(), Value::Bool(true));
    assert_eq!(contains(&Value::from("ell"), &Value::from("hello")).unwrap(), Value::Bool(true));
    assert_eq!(range(&int(1), &int(3)).unwrap(), list);
    assert_eq!(range(&int(3), &int(1)).unwrap(), Value::from(vec![3, 2, 1]));
}

#[test]
fn tests_on_values() {
    assert_eq!(is_even(&int(4)).unwrap(), Value::Bool(true));
    assert_eq!(is_odd(&int(4)).unwrap(), Value::Bool(false));
    assert_eq!(divisible_by(&int(9), &int(3)).unwrap(), Value::Bool(true));
    assert_eq!(is_empty(&Value::from("")).unwrap(), Value::Bool(true));
    assert_eq!(is_empty(&int(0)).unwrap(), Value::Bool(false));
    assert_eq!(is_set(&Value::Null).unwrap(), Value::Bool(false));
    assert_eq!(like(&Value::from("abc123"), &Value::from(r"\d+$")).unwrap(), Value::Bool(true));
    assert!(matches!(
        like(&Value::from("x"), &Value::from("(")),
        Err(RenderError::Pattern(_))
    ));
}

#[test]
fn indexing_returns_null_when_missing() {
    let list = Value::from(vec!["a", "b"]);
    assert_eq!(index(&list, &int(1)).unwrap(), Value::from("b"));
    assert_eq!(index(&list, &int(-1)).unwrap(), Value::from("b"));
    assert_eq!(index(&list, &int(5)).unwrap(), Value::Null);

    let map: Value = [("name".to_string(), Value::from("stencil"))]
        .into_iter()
        .collect();
    assert_eq!(index(&map, &Value::from("name")).unwrap(), Value::from("stencil"));
    assert_eq!(index(&Value::Null, &int(0)).unwrap(), Value::Null);
    assert!(index(&int(3), &int(0)).is_err());
}

#[test]
fn switch_cases_match_loosely() {
    assert!(matches_case(&int(2), &Value::Float(2.0)));
    assert!(!matches_case(&Value::from("2"), &int(2)));
}
