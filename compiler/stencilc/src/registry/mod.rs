//! Operator, tag and function registries.
//!
//! Built once from the registered extensions and then only read: the
//! tokenizer takes its vocabulary from them, the parser resolves aliases
//! and keywords through them, and the compiler dispatches on the ids the
//! parser stored in the tree.

mod alias_trie;
mod error;
mod functions;
mod operators;
mod tags;

pub use alias_trie::AliasTrie;
pub use error::RegistryError;
pub use functions::{FunctionRegistry, Invocation, TemplateFunction};
pub use operators::{
    Arity, Associativity, CompileOperator, Negate, OperatorDefinition, OperatorRegistry,
};
pub use tags::{Tag, TagRegistry};

use stencil_lexer::{Delimiters, LexerConfig};
use tracing::debug;

use crate::Extension;

/// The three registries.
#[derive(Default)]
pub struct Registries {
    pub operators: OperatorRegistry,
    pub tags: TagRegistry,
    pub functions: FunctionRegistry,
}

impl Registries {
    /// Register every contribution of `extensions`, in order.
    #[tracing::instrument(level = "debug", skip_all, fields(extensions = extensions.len()))]
    pub fn build(extensions: &[Box<dyn Extension>]) -> Result<Self, RegistryError> {
        let mut registries = Registries::default();
        for extension in extensions {
            registries.register(extension.as_ref())?;
        }
        debug!(
            operators = registries.operators.len(),
            tags = registries.tags.len(),
            functions = registries.functions.len(),
            "registries built"
        );
        Ok(registries)
    }

    pub fn register(&mut self, extension: &dyn Extension) -> Result<(), RegistryError> {
        debug!(extension = extension.name(), "registering extension");
        for operator in extension.operators() {
            self.operators.register(operator)?;
        }
        for tag in extension.tags() {
            self.tags.register(tag)?;
        }
        for function in extension.functions() {
            self.functions.register(function)?;
        }
        Ok(())
    }

    /// Tokenizer configuration for the registered vocabulary.
    pub fn lexer_config(&self, delimiters: Delimiters) -> LexerConfig {
        LexerConfig::new(delimiters)
            .with_operator_symbols(self.operators.symbols())
            .with_operator_words(self.operators.words())
            .with_tag_keywords(self.tags.keywords())
    }
}
