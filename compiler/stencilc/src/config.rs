//! Compile environment configuration.
//!
//! Read from JSON by the CLI (`--config`); every field is optional.
//!
//! ```json
//! {
//!     "fallback_tag": "print",
//!     "delimiters": { "tag": ["<%", "%>"] },
//!     "cache_namespace": "site",
//!     "global_variables": { "site_name": "Example" },
//!     "error_template": "error"
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stencil_diagnostic::{Diagnostic, ErrorCode};
use stencil_lexer::Delimiters;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tag used for `{% ... %}` whose first word is not a tag keyword.
    pub fallback_tag: Option<String>,
    pub delimiters: Delimiters,
    /// Prefix of every generated module name.
    pub cache_namespace: String,
    /// Applied to the runtime environment by the bundle's `register`.
    pub global_variables: BTreeMap<String, serde_json::Value>,
    /// Template rendered in place of a failing one.
    pub error_template: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fallback_tag: None,
            delimiters: Delimiters::default(),
            cache_namespace: "stencil".to_string(),
            global_variables: BTreeMap::new(),
            error_template: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::E4003
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code()).with_message(self.to_string())
    }
}

impl Config {
    /// Parse and validate a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Check what serde cannot: delimiters, the namespace and global names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delimiters.validate().map_err(ConfigError::Invalid)?;
        let namespace_ok = self
            .cache_namespace
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && self
                .cache_namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !namespace_ok {
            return Err(ConfigError::Invalid(format!(
                "cache_namespace `{}` is not a valid identifier",
                self.cache_namespace
            )));
        }
        if let Some(name) = self.global_variables.keys().find(|k| k.is_empty()) {
            return Err(ConfigError::Invalid(format!("global variable name `{name}` is empty")));
        }
        if self.fallback_tag.as_deref() == Some("") {
            return Err(ConfigError::Invalid("fallback_tag must not be empty".to_string()));
        }
        Ok(())
    }
}
