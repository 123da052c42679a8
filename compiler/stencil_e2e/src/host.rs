//! Host functions called from the bundled templates.

use stencil_runtime::{RenderResult, Value};

fn first(args: &[Value]) -> String {
    args.first().map(ToString::to_string).unwrap_or_default()
}

/// `Hello World!` -> `hello-world`.
pub fn slugify(args: &[Value]) -> RenderResult<Value> {
    let text = first(args).to_lowercase();
    let slug = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    Ok(Value::String(slug))
}

pub fn greeting(args: &[Value]) -> RenderResult<Value> {
    Ok(Value::String(format!("Hi, {}", first(args))))
}

pub fn shout(args: &[Value]) -> RenderResult<Value> {
    Ok(Value::String(format!("{}!", first(args).to_uppercase())))
}
