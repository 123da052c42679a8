//! Runtime environment: the registry compiled templates render against.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::functions::{self, CoreExtension};
use crate::{Context, Output, RenderError, RenderResult, Renderable, Value};

/// A host callable bound by name.
pub type Callback = Arc<dyn Fn(&[Value]) -> RenderResult<Value> + Send + Sync>;

/// An object exposing named methods to templates.
pub trait RuntimeExtension: Send + Sync {
    fn name(&self) -> &str;

    /// Method names this extension answers to.
    fn methods(&self) -> &[&str];

    fn call(&self, method: &str, args: &[Value]) -> RenderResult<Value>;
}

/// Holds compiled templates and everything they can call at render time.
pub struct Environment {
    templates: FxHashMap<String, Box<dyn Renderable>>,
    extensions: FxHashMap<String, Box<dyn RuntimeExtension>>,
    callbacks: FxHashMap<String, Callback>,
    helpers: FxHashMap<String, Callback>,
    globals: FxHashMap<String, Value>,
    error_template: Option<String>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// An environment with the `core` extension registered.
    pub fn new() -> Self {
        let mut env = Environment {
            templates: FxHashMap::default(),
            extensions: FxHashMap::default(),
            callbacks: FxHashMap::default(),
            helpers: FxHashMap::default(),
            globals: FxHashMap::default(),
            error_template: None,
        };
        env.register_extension(Box::new(CoreExtension));
        env
    }

    pub fn register_template(&mut self, template: Box<dyn Renderable>) {
        self.templates.insert(template.name().to_string(), template);
    }

    pub fn register_templates(&mut self, templates: impl IntoIterator<Item = Box<dyn Renderable>>) {
        for template in templates {
            self.register_template(template);
        }
    }

    pub fn register_extension(&mut self, extension: Box<dyn RuntimeExtension>) {
        self.extensions.insert(extension.name().to_string(), extension);
    }

    /// Bind the callable behind a `Callback` function.
    pub fn bind_callback<F>(&mut self, binding: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> RenderResult<Value> + Send + Sync + 'static,
    {
        self.callbacks.insert(binding.into(), Arc::new(f));
    }

    /// Register a helper for calls the compiler could not resolve.
    pub fn register_helper<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> RenderResult<Value> + Send + Sync + 'static,
    {
        self.helpers.insert(name.into(), Arc::new(f));
    }

    pub fn set_global(&mut self, name: impl Into<String>, value: Value) {
        self.globals.insert(name.into(), value);
    }

    pub fn set_error_template(&mut self, name: Option<String>) {
        self.error_template = name;
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn template(&self, name: &str) -> RenderResult<&dyn Renderable> {
        self.templates
            .get(name)
            .map(|t| &**t)
            .ok_or_else(|| RenderError::TemplateNotFound(name.to_string()))
    }

    /// Render a template with the given variables on top of the globals.
    ///
    /// With an error template configured, a failing render is replaced by
    /// the error template's output, with the message bound to `error`.
    pub fn render<K, I>(&self, name: &str, vars: I) -> RenderResult<String>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut ctx = Context::with_globals(&self.globals);
        ctx.push_scope();
        for (k, v) in vars {
            ctx.set(k, v);
        }
        let mut out = Output::new();
        match self.template(name).and_then(|t| t.render(self, &mut ctx, &mut out)) {
            Ok(()) => Ok(out.into_string()),
            Err(err) => match &self.error_template {
                Some(fallback) if fallback != name => {
                    warn!(template = name, error = %err, "render failed, using error template");
                    self.render(fallback, [("error", Value::String(err.to_string()))])
                }
                _ => Err(err),
            },
        }
    }

    /// `{% include %}`: render another template into the same output,
    /// sharing the caller's variables.
    pub fn include(&self, name: &Value, ctx: &mut Context, out: &mut Output) -> RenderResult<()> {
        let name = name.to_string();
        debug!(template = %name, "include");
        let template = self.template(&name)?;
        ctx.enter_include(&name)?;
        let result = template.render(self, ctx, out);
        ctx.leave_include();
        result
    }

    pub fn extension(&self, name: &str) -> RenderResult<&dyn RuntimeExtension> {
        self.extensions
            .get(name)
            .map(|e| &**e)
            .ok_or_else(|| RenderError::UnknownExtension(name.to_string()))
    }

    pub fn invoke_callback(&self, binding: &str, args: &[Value]) -> RenderResult<Value> {
        let callback = self
            .callbacks
            .get(binding)
            .ok_or_else(|| RenderError::UnboundCallback(binding.to_string()))?;
        callback(args)
    }

    pub fn call_helper(&self, name: &str, args: &[Value]) -> RenderResult<Value> {
        let helper = self
            .helpers
            .get(name)
            .ok_or_else(|| RenderError::UnknownFunction(name.to_string()))?;
        helper(args)
    }

    /// `receiver.name(args)`: the receiver becomes the first argument of a
    /// helper, a built-in or an extension method, in that order.
    pub fn call_method(&self, receiver: &Value, name: &str, args: &[Value]) -> RenderResult<Value> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(receiver.clone());
        full.extend_from_slice(args);

        if let Some(helper) = self.helpers.get(name) {
            return helper(&full);
        }
        if let Some(builtin) = functions::lookup(name) {
            return builtin(&full);
        }
        let mut owners: Vec<&dyn RuntimeExtension> = self
            .extensions
            .values()
            .map(|e| &**e)
            .filter(|ext| ext.methods().iter().any(|m| *m == name))
            .collect();
        owners.sort_by(|a, b| a.name().cmp(b.name()));
        match owners.first() {
            Some(ext) => ext.call(name, &full),
            None => Err(RenderError::UnknownFunction(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests;
