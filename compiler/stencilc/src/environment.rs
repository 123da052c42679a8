//! The compile environment: registries, configuration, loader and cache.

use std::fmt::Write as _;
use std::sync::Arc;

use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use stencil_ir::{NodeArena, Token};
use stencil_lexer::LexerConfig;
use tracing::{debug, info};

use crate::codegen::{self, module_name, CompileError};
use crate::config::Config;
use crate::builtin::CoreExtension;
use crate::error::TemplateError;
use crate::loader::Loader;
use crate::optimize::{Optimizer, Pass};
use crate::parse;
use crate::registry::{Registries, RegistryError};
use crate::Extension;

/// Compiles templates fetched from a [`Loader`] into Rust source.
///
/// Built once; afterwards every method takes `&self`, so one environment
/// can serve parallel compilations. Compiled sources are cached by
/// template name.
pub struct Environment {
    config: Config,
    registries: Registries,
    lexer: LexerConfig,
    optimizer: Optimizer,
    loader: Box<dyn Loader>,
    cache: Mutex<FxHashMap<String, Arc<str>>>,
}

impl Environment {
    /// An environment with only the `core` extension.
    pub fn new(config: Config, loader: impl Loader + 'static) -> Result<Self, TemplateError> {
        Self::with_extensions(config, loader, Vec::new())
    }

    /// `core` first, then `extensions` in order.
    #[tracing::instrument(level = "debug", skip_all, fields(extensions = extensions.len()))]
    pub fn with_extensions(
        config: Config,
        loader: impl Loader + 'static,
        extensions: Vec<Box<dyn Extension>>,
    ) -> Result<Self, TemplateError> {
        config.validate()?;
        let mut all: Vec<Box<dyn Extension>> = Vec::with_capacity(extensions.len() + 1);
        all.push(Box::new(CoreExtension));
        all.extend(extensions);
        let registries = Registries::build(&all)?;

        if let Some(tag) = &config.fallback_tag {
            if registries.tags.lookup(tag).is_none() {
                return Err(RegistryError::unknown_fallback_tag(tag).into());
            }
        }

        let lexer = registries.lexer_config(config.delimiters.clone());
        Ok(Environment {
            config,
            registries,
            lexer,
            optimizer: Optimizer::with_default_passes(),
            loader: Box::new(loader),
            cache: Mutex::new(FxHashMap::default()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn optimizer(&self) -> &Optimizer {
        &self.optimizer
    }

    /// Add an optimizer pass. Clears the cache.
    pub fn add_pass(&mut self, pass: Box<dyn Pass>) {
        self.optimizer.add_pass(pass);
        self.cache.get_mut().clear();
    }

    pub fn loader(&self) -> &dyn Loader {
        &*self.loader
    }

    #[tracing::instrument(level = "debug", skip(self, source))]
    pub fn tokenize(&self, name: &str, source: &str) -> Result<Vec<Token>, TemplateError> {
        stencil_lexer::tokenize(source, &self.lexer).map_err(|source| TemplateError::Lex {
            template: name.to_string(),
            source,
        })
    }

    /// Tokenize and parse, without optimizing.
    pub fn parse(&self, name: &str, source: &str) -> Result<NodeArena, TemplateError> {
        let tokens = self.tokenize(name, source)?;
        parse::parse(tokens, &self.registries, self.config.fallback_tag.as_deref()).map_err(
            |source| TemplateError::Parse {
                template: name.to_string(),
                source,
            },
        )
    }

    pub fn optimize(&self, arena: &mut NodeArena) {
        self.optimizer.run(arena, &self.registries);
    }

    /// Compile source text directly, bypassing the loader and the cache.
    pub fn compile_source(&self, name: &str, source: &str) -> Result<String, TemplateError> {
        let mut arena = self.parse(name, source)?;
        self.optimize(&mut arena);
        codegen::compile(name, &self.config.cache_namespace, &arena, &self.registries).map_err(
            |source| TemplateError::Compile {
                template: name.to_string(),
                source,
            },
        )
    }

    /// Fetch and compile one template, or return the cached result.
    pub fn compile_template(&self, name: &str) -> Result<Arc<str>, TemplateError> {
        if let Some(cached) = self.cache.lock().get(name) {
            debug!(template = name, "cache hit");
            return Ok(Arc::clone(cached));
        }
        // Compiled without the lock held: two threads racing on one name
        // produce the same source, and the first insert wins.
        let source = self.loader.fetch_source(name)?;
        let compiled: Arc<str> = self.compile_source(name, &source)?.into();
        let mut cache = self.cache.lock();
        let entry = cache.entry(name.to_string()).or_insert(compiled);
        Ok(Arc::clone(entry))
    }

    /// Compile several templates in parallel. Results keep the order of
    /// `names`; if any template fails, one of the failures is returned.
    pub fn compile_all(&self, names: &[String]) -> Result<Vec<(String, Arc<str>)>, TemplateError> {
        names
            .par_iter()
            .map(|name| -> Result<_, TemplateError> {
                Ok((name.clone(), self.compile_template(name)?))
            })
            .collect()
    }

    /// Every template the loader provides.
    pub fn template_names(&self) -> Result<Vec<String>, TemplateError> {
        Ok(self.loader.names()?)
    }

    /// One Rust file with the modules of `names` and a `register` function
    /// that installs them, the configured globals and the error template on
    /// a `stencil_runtime::Environment`.
    #[tracing::instrument(level = "debug", skip_all, fields(templates = names.len()))]
    pub fn compile_bundle(&self, names: &[String]) -> Result<String, TemplateError> {
        let mut names = names.to_vec();
        names.sort();
        names.dedup();
        let mut modules: FxHashMap<String, &str> = FxHashMap::default();
        for name in &names {
            let module = module_name(&self.config.cache_namespace, name);
            if let Some(other) = modules.get(&module) {
                return Err(TemplateError::Compile {
                    template: name.clone(),
                    source: CompileError::identifier_collision(name, other, &module, 0),
                });
            }
            modules.insert(module, name);
        }
        let compiled = self.compile_all(&names)?;

        let mut out = String::from("// Generated by stencilc. Do not edit.\n\n");
        for (_, source) in &compiled {
            out.push_str(source);
            out.push('\n');
        }

        out.push_str("pub fn register(env: &mut ::stencil_runtime::Environment) {\n");
        for (name, _) in &compiled {
            let _ = writeln!(
                out,
                "    env.register_templates({}::templates());",
                module_name(&self.config.cache_namespace, name)
            );
        }
        for (name, value) in &self.config.global_variables {
            let _ = writeln!(out, "    env.set_global({name:?}, {});", value_literal(value));
        }
        match &self.config.error_template {
            Some(name) => {
                let _ = writeln!(out, "    env.set_error_template(Some({name:?}.to_string()));");
            }
            None => out.push_str("    env.set_error_template(None);\n"),
        }
        out.push_str("}\n");

        info!(templates = compiled.len(), bytes = out.len(), "bundle compiled");
        Ok(out)
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

/// Rust expression building the runtime value of a JSON value.
fn value_literal(value: &serde_json::Value) -> String {
    const VALUE: &str = "::stencil_runtime::Value";
    match value {
        serde_json::Value::Null => format!("{VALUE}::Null"),
        serde_json::Value::Bool(b) => format!("{VALUE}::Bool({b})"),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => format!("{VALUE}::Int({i})"),
            None => format!("{VALUE}::Float({:?})", n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => format!("{VALUE}::from({s:?})"),
        serde_json::Value::Array(items) => {
            let items: Vec<String> = items.iter().map(value_literal).collect();
            format!("{VALUE}::List(vec![{}])", items.join(", "))
        }
        serde_json::Value::Object(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("({k:?}.to_string(), {})", value_literal(v)))
                .collect();
            format!(
                "{VALUE}::Map(::std::collections::BTreeMap::from([{}]))",
                entries.join(", ")
            )
        }
    }
}
