//! Stencil compiler: templates to Rust.
//!
//! # Pipeline
//!
//! ```text
//! source ──tokenize──► tokens ──parse──► NodeArena ──optimize──► NodeArena
//!                                                                   │
//!                                                        compile    ▼
//!                                          Rust module (one unit per template)
//! ```
//!
//! Everything the language knows (operators, tags, functions) comes from
//! [`Extension`]s registered into the [`Registries`]; the built-in `core`
//! extension is always first. The [`Environment`] ties the registries to a
//! [`Config`] and a [`Loader`], caches compiled sources and writes bundles
//! for the `stencil_runtime` crate to render.

pub mod builtin;
pub mod codegen;
pub mod config;
pub mod dump;
mod environment;
mod error;
mod extension;
pub mod loader;
pub mod optimize;
pub mod parse;
pub mod registry;

pub use config::{Config, ConfigError};
pub use dump::dump_tree;
pub use environment::Environment;
pub use error::TemplateError;
pub use extension::Extension;
pub use loader::{FileSystemLoader, Loader, LoaderError, MemoryLoader};
pub use registry::Registries;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=stencilc=debug` or `RUST_LOG=stencilc=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
