//! Templates under `templates/`, compiled by `build.rs` and registered
//! into a ready-to-render runtime environment.

pub mod host;

#[allow(clippy::all, clippy::pedantic)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/templates.rs"));
}

use stencil_runtime::Environment;

/// Runtime environment with every bundled template, the `greeting`
/// callback and the `shout` helper.
pub fn environment() -> Environment {
    let mut env = Environment::new();
    generated::register(&mut env);
    env.bind_callback("greeting", host::greeting);
    env.register_helper("shout", host::shout);
    env
}
