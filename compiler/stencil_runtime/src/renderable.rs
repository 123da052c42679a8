use crate::{Context, Environment, Output, RenderResult, Value};

/// A compiled template unit.
///
/// `stencilc` emits one implementation per template, plus one per nested
/// `{% template %}` block.
pub trait Renderable: Send + Sync {
    fn name(&self) -> &str;

    fn render(&self, env: &Environment, ctx: &mut Context, out: &mut Output) -> RenderResult<()>;

    /// Late-bound call for function names unknown at compile time.
    ///
    /// Units may override this to provide their own helpers; the default
    /// defers to helpers registered on the environment.
    fn call_helper(&self, env: &Environment, name: &str, args: &[Value]) -> RenderResult<Value> {
        env.call_helper(name, args)
    }
}
