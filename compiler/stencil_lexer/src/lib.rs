//! Tokenizer for Stencil templates.
//!
//! Delimiters are configurable at runtime and the operator vocabulary comes
//! from whatever extensions are registered, so the tokenizer is hand-written
//! rather than generated from a fixed token table.
//!
//! ```text
//! let config = LexerConfig::new(Delimiters::default())
//!     .with_operator_symbols(["+", "*"])
//!     .with_tag_keywords(["if"]);
//! let tokens = tokenize("{{ 2 + 3 * 4 }}", &config)?;
//! ```

mod config;
mod lex_error;
mod tokenizer;

pub use config::{Delimiters, LexerConfig};
pub use lex_error::{LexError, LexErrorKind};
pub use tokenizer::tokenize;
