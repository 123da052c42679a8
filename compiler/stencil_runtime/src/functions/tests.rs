#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn string_functions() {
    assert_eq!(upper(&[Value::from("abc")]).unwrap(), Value::from("ABC"));
    assert_eq!(lower(&[Value::from("ÀB")]).unwrap(), Value::from("àb"));
    assert!(upper(&[Value::from(vec![1])]).is_err());
}

#[test]
fn length_counts_chars_and_items() {
    assert_eq!(length(&[Value::from("héllo")]).unwrap(), Value::Int(5));
    assert_eq!(length(&[Value::from(vec![1, 2])]).unwrap(), Value::Int(2));
    assert_eq!(length(&[]).unwrap(), Value::Int(0));
}

#[test]
fn join_with_and_without_separator() {
    let list = Value::from(vec![1, 2, 3]);
    assert_eq!(join(&[list.clone()]).unwrap(), Value::from("123"));
    assert_eq!(join(&[list, Value::from("-")]).unwrap(), Value::from("1-2-3"));
}

#[test]
fn range_steps() {
    let r = |args: &[Value]| range(args).unwrap();
    assert_eq!(r(&[Value::Int(1), Value::Int(3)]), Value::from(vec![1, 2, 3]));
    assert_eq!(
        r(&[Value::Int(5), Value::Int(1), Value::Int(-2)]),
        Value::from(vec![5, 3, 1])
    );
    assert!(range(&[Value::Int(1), Value::Int(2), Value::Int(0)]).is_err());
}

#[test]
fn abs_and_raw() {
    assert_eq!(abs(&[Value::Int(-4)]).unwrap(), Value::Int(4));
    assert_eq!(abs(&[Value::Float(-1.5)]).unwrap(), Value::Float(1.5));
    assert_eq!(raw(&[Value::from("<b>")]).unwrap(), Value::from("<b>"));
}

#[test]
fn lookup_by_name() {
    assert!(lookup("upper").is_some());
    assert!(lookup("replace").is_none());
}

#[test]
fn core_extension_methods() {
    let core = CoreExtension;
    assert_eq!(
        core.call("replace", &[Value::from("a-b-c"), Value::from("-"), Value::from("+")])
            .unwrap(),
        Value::from("a+b+c")
    );
    assert_eq!(
        core.call("split", &[Value::from("a,b"), Value::from(",")]).unwrap(),
        Value::from(vec!["a", "b"])
    );
    assert!(matches!(
        core.call("nope", &[]),
        Err(RenderError::UnknownFunction(_))
    ));
}
