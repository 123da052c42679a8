//! The error type of the compile environment.

use stencil_diagnostic::{Diagnostic, ErrorCode};
use stencil_lexer::LexError;

use crate::codegen::CompileError;
use crate::config::ConfigError;
use crate::loader::LoaderError;
use crate::parse::ParseError;
use crate::registry::RegistryError;

/// Any failure while turning a template name into Rust source.
///
/// Phase errors carry the template they occurred in; loader errors pass
/// through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("{template}: {source}")]
    Lex {
        template: String,
        #[source]
        source: LexError,
    },
    #[error("{template}: {source}")]
    Parse {
        template: String,
        #[source]
        source: ParseError,
    },
    #[error("{template}: {source}")]
    Compile {
        template: String,
        #[source]
        source: CompileError,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TemplateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TemplateError::Lex { source, .. } => source.code(),
            TemplateError::Parse { source, .. } => source.code,
            TemplateError::Compile { source, .. } => source.code,
            TemplateError::Registry(e) => e.code,
            TemplateError::Loader(e) => e.code(),
            TemplateError::Config(e) => e.code(),
        }
    }

    /// Name of the template the error occurred in, when there is one.
    pub fn template(&self) -> Option<&str> {
        match self {
            TemplateError::Lex { template, .. }
            | TemplateError::Parse { template, .. }
            | TemplateError::Compile { template, .. } => Some(template),
            TemplateError::Loader(LoaderError::NotFound(name) | LoaderError::Io { name, .. }) => {
                Some(name)
            }
            TemplateError::Registry(_) | TemplateError::Config(_) => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            TemplateError::Lex { template, source } => source.to_diagnostic().with_template(template.clone()),
            TemplateError::Parse { template, source } => source.to_diagnostic().with_template(template.clone()),
            TemplateError::Compile { template, source } => {
                source.to_diagnostic().with_template(template.clone())
            }
            TemplateError::Registry(e) => e.to_diagnostic(),
            TemplateError::Loader(e) => e.to_diagnostic(),
            TemplateError::Config(e) => e.to_diagnostic(),
        }
    }
}
