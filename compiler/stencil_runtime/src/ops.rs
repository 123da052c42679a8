//! Operator implementations called from generated code.
//!
//! Every helper returns `RenderResult<Value>` so the compiler can emit the
//! same `ops::name(&left, &right)?` shape for all of them. Logical
//! operators are not here: they short-circuit, so the compiler inlines them.

use std::cmp::Ordering;

use regex::Regex;

use crate::{RenderError, RenderResult, Value};

fn numeric(
    op: &'static str,
    l: &Value,
    r: &Value,
    int: impl FnOnce(i64, i64) -> Option<i64>,
    float: impl FnOnce(f64, f64) -> f64,
) -> RenderResult<Value> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => int(*a, *b)
            .map(Value::Int)
            .ok_or(RenderError::Overflow(op)),
        _ => match (l.as_float(), r.as_float()) {
            (Some(a), Some(b)) => Ok(Value::Float(float(a, b))),
            _ => Err(RenderError::operands(op, l, r)),
        },
    }
}

pub fn add(l: &Value, r: &Value) -> RenderResult<Value> {
    numeric("+", l, r, i64::checked_add, |a, b| a + b)
}

pub fn sub(l: &Value, r: &Value) -> RenderResult<Value> {
    numeric("-", l, r, i64::checked_sub, |a, b| a - b)
}

pub fn mul(l: &Value, r: &Value) -> RenderResult<Value> {
    numeric("*", l, r, i64::checked_mul, |a, b| a * b)
}

/// Division; integer operands stay integral only when they divide evenly.
pub fn div(l: &Value, r: &Value) -> RenderResult<Value> {
    match (l, r) {
        (Value::Int(_), Value::Int(0)) => Err(RenderError::DivisionByZero),
        (Value::Int(a), Value::Int(b)) if a.checked_rem(*b) == Some(0) => a
            .checked_div(*b)
            .map(Value::Int)
            .ok_or(RenderError::Overflow("/")),
        _ => match (l.as_float(), r.as_float()) {
            (Some(_), Some(b)) if b == 0.0 => Err(RenderError::DivisionByZero),
            (Some(a), Some(b)) => Ok(Value::Float(a / b)),
            _ => Err(RenderError::operands("/", l, r)),
        },
    }
}

pub fn rem(l: &Value, r: &Value) -> RenderResult<Value> {
    if r.as_float() == Some(0.0) {
        return Err(RenderError::DivisionByZero);
    }
    numeric("%", l, r, i64::checked_rem, |a, b| a % b)
}

pub fn pow(l: &Value, r: &Value) -> RenderResult<Value> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) if *b >= 0 => u32::try_from(*b)
            .ok()
            .and_then(|e| a.checked_pow(e))
            .map(Value::Int)
            .ok_or(RenderError::Overflow("**")),
        _ => match (l.as_float(), r.as_float()) {
            (Some(a), Some(b)) => Ok(Value::Float(a.powf(b))),
            _ => Err(RenderError::operands("**", l, r)),
        },
    }
}

/// `~`: string concatenation of the display forms.
pub fn concat(l: &Value, r: &Value) -> RenderResult<Value> {
    Ok(Value::String(format!("{l}{r}")))
}

pub fn neg(v: &Value) -> RenderResult<Value> {
    match v {
        Value::Int(n) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or(RenderError::Overflow("-")),
        Value::Float(f) => Ok(Value::Float(-f)),
        other => Err(RenderError::operands("-", &Value::Null, other)),
    }
}

pub fn pos(v: &Value) -> RenderResult<Value> {
    match v {
        Value::Int(_) | Value::Float(_) => Ok(v.clone()),
        other => Err(RenderError::operands("+", &Value::Null, other)),
    }
}

/// Loose equality: numbers compare by value across int and float.
pub fn loose_eq(l: &Value, r: &Value) -> bool {
    match (l, r) {
        (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => {
            l.as_float() == r.as_float()
        }
        _ => l == r,
    }
}

pub fn eq(l: &Value, r: &Value) -> RenderResult<Value> {
    Ok(Value::Bool(loose_eq(l, r)))
}

pub fn ne(l: &Value, r: &Value) -> RenderResult<Value> {
    Ok(Value::Bool(!loose_eq(l, r)))
}

/// `===` / `is same as`: same type and same value.
pub fn identical(l: &Value, r: &Value) -> RenderResult<Value> {
    Ok(Value::Bool(l == r))
}

fn compare(op: &'static str, l: &Value, r: &Value) -> RenderResult<Ordering> {
    match (l, r) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => match (l.as_float(), r.as_float()) {
            (Some(a), Some(b)) => a
                .partial_cmp(&b)
                .ok_or_else(|| RenderError::operands(op, l, r)),
            _ => Err(RenderError::operands(op, l, r)),
        },
    }
}

pub fn lt(l: &Value, r: &Value) -> RenderResult<Value> {
    compare("<", l, r).map(|o| Value::Bool(o.is_lt()))
}

pub fn le(l: &Value, r: &Value) -> RenderResult<Value> {
    compare("<=", l, r).map(|o| Value::Bool(o.is_le()))
}

pub fn gt(l: &Value, r: &Value) -> RenderResult<Value> {
    compare(">", l, r).map(|o| Value::Bool(o.is_gt()))
}

pub fn ge(l: &Value, r: &Value) -> RenderResult<Value> {
    compare(">=", l, r).map(|o| Value::Bool(o.is_ge()))
}

pub fn xor(l: &Value, r: &Value) -> RenderResult<Value> {
    Ok(Value::Bool(l.is_truthy() != r.is_truthy()))
}

/// `needle in haystack`.
pub fn contains(needle: &Value, haystack: &Value) -> RenderResult<Value> {
    let found = match haystack {
        Value::List(items) => items.iter().any(|item| loose_eq(item, needle)),
        Value::Map(entries) => entries.contains_key(&needle.to_string()),
        Value::String(s) => s.contains(&needle.to_string()),
        Value::Null => false,
        other => return Err(RenderError::operands("in", needle, other)),
    };
    Ok(Value::Bool(found))
}

/// `a..b`: inclusive integer range.
pub fn range(l: &Value, r: &Value) -> RenderResult<Value> {
    match (l.as_int(), r.as_int()) {
        (Some(a), Some(b)) if a <= b => Ok(Value::List((a..=b).map(Value::Int).collect())),
        (Some(a), Some(b)) => Ok(Value::List((b..=a).rev().map(Value::Int).collect())),
        _ => Err(RenderError::operands("..", l, r)),
    }
}

pub fn is_empty(v: &Value) -> RenderResult<Value> {
    Ok(Value::Bool(v.is_empty()))
}

/// `is set` on an arbitrary expression: anything but `null`.
pub fn is_set(v: &Value) -> RenderResult<Value> {
    Ok(Value::Bool(!v.is_null()))
}

pub fn is_even(v: &Value) -> RenderResult<Value> {
    match v.as_int() {
        Some(n) => Ok(Value::Bool(n % 2 == 0)),
        None => Err(RenderError::argument("even", format!("expected int, got {}", v.type_name()))),
    }
}

pub fn is_odd(v: &Value) -> RenderResult<Value> {
    match v.as_int() {
        Some(n) => Ok(Value::Bool(n % 2 != 0)),
        None => Err(RenderError::argument("odd", format!("expected int, got {}", v.type_name()))),
    }
}

pub fn divisible_by(l: &Value, r: &Value) -> RenderResult<Value> {
    match (l.as_int(), r.as_int()) {
        (Some(_), Some(0)) => Err(RenderError::DivisionByZero),
        (Some(a), Some(b)) => Ok(Value::Bool(a.checked_rem(b).map_or(true, |m| m == 0))),
        _ => Err(RenderError::operands("divisible by", l, r)),
    }
}

/// `subject is like pattern`: regular expression search.
pub fn like(l: &Value, r: &Value) -> RenderResult<Value> {
    let Value::String(pattern) = r else {
        return Err(RenderError::operands("like", l, r));
    };
    let re = Regex::new(pattern).map_err(|e| RenderError::Pattern(e.to_string()))?;
    Ok(Value::Bool(re.is_match(&l.to_string())))
}

/// `base[index]` and `base.name`; missing entries are `null`.
pub fn index(base: &Value, key: &Value) -> RenderResult<Value> {
    let found = match (base, key) {
        (Value::List(items), _) => key.as_int().and_then(|i| {
            let len = i64::try_from(items.len()).ok()?;
            let i = if i < 0 { len + i } else { i };
            items.get(usize::try_from(i).ok()?).cloned()
        }),
        (Value::Map(entries), _) => entries.get(&key.to_string()).cloned(),
        (Value::String(s), _) => key.as_int().and_then(|i| {
            s.chars()
                .nth(usize::try_from(i).ok()?)
                .map(|c| Value::String(c.to_string()))
        }),
        (Value::Null, _) => None,
        _ => return Err(RenderError::operands("[]", base, key)),
    };
    Ok(found.unwrap_or_default())
}

/// Whether a `switch` subject matches a `case` value.
pub fn matches_case(subject: &Value, case: &Value) -> bool {
    loose_eq(subject, case)
}

#[cfg(test)]
mod tests;
