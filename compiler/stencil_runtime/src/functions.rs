//! Built-in template functions.
//!
//! Simple functions are called directly by generated code
//! (`functions::upper(&[arg])?`). `replace` and `split` live on the `core`
//! runtime extension instead and are reached through
//! [`Environment::extension`](crate::Environment::extension).

use crate::environment::RuntimeExtension;
use crate::{RenderError, RenderResult, Value};

/// Signature shared by every callable a template can reach.
pub type NativeFn = fn(&[Value]) -> RenderResult<Value>;

fn arg<'a>(args: &'a [Value], index: usize) -> &'a Value {
    static NULL: Value = Value::Null;
    args.get(index).unwrap_or(&NULL)
}

fn string_arg(function: &'static str, args: &[Value], index: usize) -> RenderResult<String> {
    match arg(args, index) {
        Value::List(_) | Value::Map(_) => Err(RenderError::argument(
            function,
            format!("argument {} must be a scalar", index + 1),
        )),
        v => Ok(v.to_string()),
    }
}

pub fn length(args: &[Value]) -> RenderResult<Value> {
    let len = match arg(args, 0) {
        Value::Null => 0,
        Value::String(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Map(entries) => entries.len(),
        other => other.to_string().chars().count(),
    };
    Ok(Value::from(len))
}

pub fn upper(args: &[Value]) -> RenderResult<Value> {
    Ok(Value::String(string_arg("upper", args, 0)?.to_uppercase()))
}

pub fn lower(args: &[Value]) -> RenderResult<Value> {
    Ok(Value::String(string_arg("lower", args, 0)?.to_lowercase()))
}

/// `join(list, separator = "")`.
pub fn join(args: &[Value]) -> RenderResult<Value> {
    let separator = string_arg("join", args, 1)?;
    match arg(args, 0) {
        Value::List(items) => Ok(Value::String(
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(&separator),
        )),
        Value::Null => Ok(Value::String(String::new())),
        other => Err(RenderError::argument(
            "join",
            format!("expected list, got {}", other.type_name()),
        )),
    }
}

/// `range(start, end, step = 1)`, inclusive of `end`.
pub fn range(args: &[Value]) -> RenderResult<Value> {
    let bound = |i: usize| {
        arg(args, i)
            .as_int()
            .ok_or_else(|| RenderError::argument("range", format!("argument {} must be an int", i + 1)))
    };
    let (start, end) = (bound(0)?, bound(1)?);
    let step = if args.len() > 2 { bound(2)? } else { 1 };
    if step == 0 {
        return Err(RenderError::argument("range", "step must not be zero"));
    }
    let mut items = Vec::new();
    let mut current = start;
    while (step > 0 && current <= end) || (step < 0 && current >= end) {
        items.push(Value::Int(current));
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(Value::List(items))
}

/// Identity; registered as safe so its result is written unescaped.
pub fn raw(args: &[Value]) -> RenderResult<Value> {
    Ok(arg(args, 0).clone())
}

pub fn abs(args: &[Value]) -> RenderResult<Value> {
    match arg(args, 0) {
        Value::Int(n) => n
            .checked_abs()
            .map(Value::Int)
            .ok_or(RenderError::Overflow("abs")),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(RenderError::argument(
            "abs",
            format!("expected number, got {}", other.type_name()),
        )),
    }
}

/// Built-ins reachable by name, for method-call syntax (`name.upper()`).
pub fn lookup(name: &str) -> Option<NativeFn> {
    Some(match name {
        "length" => length,
        "upper" => upper,
        "lower" => lower,
        "join" => join,
        "range" => range,
        "raw" => raw,
        "abs" => abs,
        _ => return None,
    })
}

/// The `core` runtime extension: string helpers dispatched by method name.
#[derive(Debug, Default)]
pub struct CoreExtension;

impl CoreExtension {
    fn replace(args: &[Value]) -> RenderResult<Value> {
        let subject = string_arg("replace", args, 0)?;
        let from = string_arg("replace", args, 1)?;
        let to = string_arg("replace", args, 2)?;
        if from.is_empty() {
            return Ok(Value::String(subject));
        }
        Ok(Value::String(subject.replace(&from, &to)))
    }

    fn split(args: &[Value]) -> RenderResult<Value> {
        let subject = string_arg("split", args, 0)?;
        let separator = string_arg("split", args, 1)?;
        let parts: Vec<Value> = if separator.is_empty() {
            subject.chars().map(|c| Value::String(c.to_string())).collect()
        } else {
            subject.split(separator.as_str()).map(Value::from).collect()
        };
        Ok(Value::List(parts))
    }
}

impl RuntimeExtension for CoreExtension {
    fn name(&self) -> &str {
        "core"
    }

    fn methods(&self) -> &[&str] {
        &["replace", "split"]
    }

    fn call(&self, method: &str, args: &[Value]) -> RenderResult<Value> {
        match method {
            "replace" => Self::replace(args),
            "split" => Self::split(args),
            other => Err(RenderError::UnknownFunction(format!("core.{other}"))),
        }
    }
}

#[cfg(test)]
mod tests;
