//! Runtime support for templates compiled by `stencilc`.
//!
//! Generated code imports [`prelude`] and renders through:
//! - [`Value`]: dynamic template values
//! - [`Context`]: the variable scope stack
//! - [`Output`]: the output sink, with HTML escaping
//! - [`ops`] and [`functions`]: operator and built-in function helpers
//! - [`Environment`]: templates, extensions, callbacks, helpers, globals
//!   and the error-template policy

mod context;
mod environment;
mod error;
pub mod functions;
mod loop_state;
pub mod ops;
mod output;
mod renderable;
mod value;

pub use context::{Checkpoint, Context};
pub use environment::{Callback, Environment, RuntimeExtension};
pub use error::{RenderError, RenderResult};
pub use loop_state::LoopState;
pub use output::Output;
pub use renderable::Renderable;
pub use value::Value;

/// Everything generated template modules refer to.
pub mod prelude {
    pub use crate::functions;
    pub use crate::ops;
    pub use crate::{
        Context, Environment, LoopState, Output, RenderError, RenderResult, Renderable, Value,
    };
}
