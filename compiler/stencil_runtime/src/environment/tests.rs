#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;
use crate::ops;

/// Writes `Hello, {{ name }}!`.
struct Greeting;

impl Renderable for Greeting {
    fn name(&self) -> &str {
        "greeting"
    }

    fn render(&self, _env: &Environment, ctx: &mut Context, out: &mut Output) -> RenderResult<()> {
        out.write_str("Hello, ");
        out.write_escaped(&ctx.get("name"));
        out.write_str("!");
        Ok(())
    }
}

/// Includes `greeting`, then fails.
struct Failing;

impl Renderable for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn render(&self, env: &Environment, ctx: &mut Context, out: &mut Output) -> RenderResult<()> {
        env.include(&Value::from("greeting"), ctx, out)?;
        Err(RenderError::DivisionByZero)
    }
}

/// Writes `oops: {{ error }}`.
struct ErrorPage;

impl Renderable for ErrorPage {
    fn name(&self) -> &str {
        "error"
    }

    fn render(&self, _env: &Environment, ctx: &mut Context, out: &mut Output) -> RenderResult<()> {
        out.write_str("oops: ");
        out.write_value(&ctx.get("error"));
        Ok(())
    }
}

/// Includes itself forever.
struct Recursive;

impl Renderable for Recursive {
    fn name(&self) -> &str {
        "recursive"
    }

    fn render(&self, env: &Environment, ctx: &mut Context, out: &mut Output) -> RenderResult<()> {
        env.include(&Value::from("recursive"), ctx, out)
    }
}

fn env() -> Environment {
    let mut env = Environment::new();
    env.register_templates([
        Box::new(Greeting) as Box<dyn Renderable>,
        Box::new(Failing),
        Box::new(ErrorPage),
        Box::new(Recursive),
    ]);
    env
}

#[test]
fn render_binds_variables_and_escapes() {
    let out = env().render("greeting", [("name", Value::from("<Ann>"))]).unwrap();
    assert_eq!(out, "Hello, &lt;Ann&gt;!");
}

#[test]
fn globals_are_visible_and_shadowed() {
    let mut env = env();
    env.set_global("name", Value::from("World"));
    assert_eq!(
        env.render("greeting", Vec::<(String, Value)>::new()).unwrap(),
        "Hello, World!"
    );
    assert_eq!(
        env.render("greeting", [("name", Value::from("Bo"))]).unwrap(),
        "Hello, Bo!"
    );
}

#[test]
fn errors_propagate_without_error_template() {
    let err = env().render("failing", [("name", Value::Null)]).unwrap_err();
    assert_eq!(err, RenderError::DivisionByZero);
    assert_eq!(
        env().render("missing", [("x", Value::Null)]).unwrap_err(),
        RenderError::TemplateNotFound("missing".into())
    );
}

#[test]
fn error_template_replaces_failed_output() {
    let mut env = env();
    env.set_error_template(Some("error".into()));
    let out = env.render("failing", [("name", Value::from("x"))]).unwrap();
    assert_eq!(out, "oops: division by zero");
}

#[test]
fn include_depth_is_bounded() {
    let err = env().render("recursive", [("x", Value::Null)]).unwrap_err();
    assert_eq!(err, RenderError::IncludeDepth("recursive".into()));
}

#[test]
fn callbacks_helpers_and_methods() {
    let mut env = env();
    env.bind_callback("double", |args| ops::mul(&args[0], &Value::Int(2)));
    env.register_helper("shout", |args| Ok(Value::from(format!("{}!", args[0]))));

    assert_eq!(env.invoke_callback("double", &[Value::Int(4)]).unwrap(), Value::Int(8));
    assert_eq!(
        env.invoke_callback("nope", &[]).unwrap_err(),
        RenderError::UnboundCallback("nope".into())
    );
    assert_eq!(env.call_helper("shout", &[Value::from("hi")]).unwrap(), Value::from("hi!"));

    let recv = Value::from("a,b");
    assert_eq!(env.call_method(&recv, "upper", &[]).unwrap(), Value::from("A,B"));
    assert_eq!(
        env.call_method(&recv, "split", &[Value::from(",")]).unwrap(),
        Value::from(vec!["a", "b"])
    );
    assert_eq!(env.call_method(&recv, "shout", &[]).unwrap(), Value::from("a,b!"));
    assert!(env.call_method(&recv, "missing", &[]).is_err());
}

#[test]
fn core_extension_is_registered() {
    let env = Environment::new();
    assert_eq!(env.extension("core").unwrap().name(), "core");
    assert!(env.extension("other").is_err());
}
