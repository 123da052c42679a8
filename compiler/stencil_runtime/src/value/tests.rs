#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;
use crate::{Context, LoopState, Output};

#[test]
fn truthiness_and_emptiness_differ_on_zero() {
    assert!(!Value::Int(0).is_truthy());
    assert!(!Value::Int(0).is_empty());
    assert!(Value::Null.is_empty());
    assert!(Value::from("x").is_truthy());
    assert!(!Value::List(vec![]).is_truthy());
}

#[test]
fn display_forms() {
    assert_eq!(Value::Null.to_string(), "");
    assert_eq!(Value::Float(2.5).to_string(), "2.5");
    assert_eq!(Value::from(vec![1, 2]).to_string(), "1, 2");
    assert_eq!(Value::Bool(true).to_string(), "true");
}

#[test]
fn from_json() {
    let json: serde_json::Value =
        serde_json::from_str(r#"{"a": [1, 2.5, "x", null, true]}"#).unwrap();
    let value = Value::from(json);
    let expected: Value = [(
        "a".to_string(),
        Value::List(vec![
            Value::Int(1),
            Value::Float(2.5),
            Value::from("x"),
            Value::Null,
            Value::Bool(true),
        ]),
    )]
    .into_iter()
    .collect();
    assert_eq!(value, expected);
}

#[test]
fn iter_entries_by_shape() {
    let list = Value::from(vec!["a", "b"]);
    assert_eq!(
        list.iter_entries().unwrap(),
        vec![
            (Value::Int(0), Value::from("a")),
            (Value::Int(1), Value::from("b"))
        ]
    );
    assert!(Value::Null.iter_entries().unwrap().is_empty());
    assert!(Value::Int(3).iter_entries().is_err());
}

#[test]
fn context_scopes_shadow_and_pop() {
    let mut ctx: Context = [("x", Value::Int(1))].into_iter().collect();
    ctx.push_scope();
    ctx.set("x", Value::Int(2));
    assert_eq!(ctx.get("x"), Value::Int(2));
    ctx.pop_scope();
    assert_eq!(ctx.get("x"), Value::Int(1));
    assert_eq!(ctx.get("missing"), Value::Null);
    assert!(!ctx.contains("missing"));

    // The outermost scope survives extra pops.
    ctx.pop_scope();
    ctx.pop_scope();
    assert_eq!(ctx.depth(), 1);
}

#[test]
fn rollback_undoes_writes_to_the_shared_scope() {
    let mut ctx: Context = [("b", Value::Int(1))].into_iter().collect();
    ctx.push_scope();
    ctx.set("a", Value::Int(10));

    let checkpoint = ctx.checkpoint();
    ctx.set("a", Value::Int(11));
    ctx.set("b", Value::Int(7));
    ctx.set("c", Value::Int(3));
    assert_eq!(ctx.remove("a"), Some(Value::Int(11)));
    // Scopes pushed and popped in between do not disturb the rollback.
    ctx.push_scope();
    ctx.set("a", Value::Int(99));
    ctx.pop_scope();
    ctx.rollback(checkpoint);

    assert_eq!(ctx.get("a"), Value::Int(10));
    assert_eq!(ctx.get("b"), Value::Int(1));
    assert!(!ctx.contains("c"));
    assert_eq!(ctx.depth(), 2);
}

#[test]
fn nested_checkpoints_roll_back_independently() {
    let mut ctx = Context::new();
    let outer = ctx.checkpoint();
    ctx.set("x", Value::Int(1));
    let inner = ctx.checkpoint();
    ctx.set("x", Value::Int(2));
    ctx.rollback(inner);
    assert_eq!(ctx.get("x"), Value::Int(1));
    ctx.rollback(outer);
    assert!(!ctx.contains("x"));

    // With no checkpoint open, writes are not recorded.
    ctx.set("y", Value::Int(5));
    let checkpoint = ctx.checkpoint();
    ctx.rollback(checkpoint);
    assert_eq!(ctx.get("y"), Value::Int(5));
}

#[test]
fn output_escapes_strings_only_when_asked() {
    let mut out = Output::new();
    out.write_escaped(&Value::from("<a href=\"x\">&'"));
    out.write_str("|");
    out.write_value(&Value::from("<b>"));
    assert_eq!(out.as_str(), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;|<b>");
}

#[test]
fn loop_state_fields() {
    let mut state = LoopState::new(3);
    state.advance();
    let value = state.to_value();
    let field = |name: &str| crate::ops::index(&value, &Value::from(name)).unwrap();
    assert_eq!(field("index"), Value::Int(2));
    assert_eq!(field("index0"), Value::Int(1));
    assert_eq!(field("revindex"), Value::Int(2));
    assert_eq!(field("first"), Value::Bool(false));
    assert_eq!(field("last"), Value::Bool(false));
    assert_eq!(LoopState::at(2, 3).to_value(), {
        let mut s = LoopState::new(3);
        s.advance();
        s.advance();
        s.to_value()
    });
}
