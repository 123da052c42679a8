use std::fmt;

use stencil_diagnostic::{Diagnostic, ErrorCode};

/// A conflict found while building the registries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryError {
    pub code: ErrorCode,
    pub message: String,
}

impl RegistryError {
    pub fn duplicate_alias(alias: &str, table: &str, existing: &str) -> Self {
        RegistryError {
            code: ErrorCode::E3001,
            message: format!(
                "{table} operator alias `{alias}` is already registered by `{existing}`"
            ),
        }
    }

    pub fn reserved_word(alias: &str, word: &str) -> Self {
        RegistryError {
            code: ErrorCode::E3002,
            message: format!("operator alias `{alias}` uses the reserved word `{word}`"),
        }
    }

    pub fn duplicate_tag(keyword: &str) -> Self {
        RegistryError {
            code: ErrorCode::E3003,
            message: format!("tag `{keyword}` is already registered"),
        }
    }

    pub fn duplicate_function(name: &str) -> Self {
        RegistryError {
            code: ErrorCode::E3004,
            message: format!("function `{name}` is already registered"),
        }
    }

    pub fn unknown_fallback_tag(keyword: &str) -> Self {
        RegistryError {
            code: ErrorCode::E3005,
            message: format!("fallback tag `{keyword}` is not registered"),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code).with_message(self.message.clone())
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RegistryError {}
