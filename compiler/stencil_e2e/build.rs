//! Compiles `templates/` into `$OUT_DIR/templates.rs`.

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use stencilc::registry::TemplateFunction;
use stencilc::{Config, Environment, Extension, FileSystemLoader};

/// Host functions the templates call.
struct Site;

impl Extension for Site {
    fn name(&self) -> &str {
        "site"
    }

    fn functions(&self) -> Vec<TemplateFunction> {
        vec![
            TemplateFunction::simple("slugify", "crate::host::slugify"),
            TemplateFunction::callback("greeting", "greeting"),
        ]
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").ok_or("OUT_DIR is not set")?);
    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").ok_or("CARGO_MANIFEST_DIR is not set")?);
    let templates = manifest_dir.join("templates");
    println!("cargo:rerun-if-changed=templates");

    let config = Config {
        global_variables: BTreeMap::from([("site_name".to_string(), serde_json::Value::from("Stencil"))]),
        error_template: Some("error".to_string()),
        ..Config::default()
    };
    let extensions: Vec<Box<dyn Extension>> = vec![Box::new(Site)];
    let env = Environment::with_extensions(config, FileSystemLoader::new(templates, "stencil"), extensions)?;

    let names = env.template_names()?;
    let bundle = env.compile_bundle(&names)?;
    std::fs::write(out_dir.join("templates.rs"), bundle)?;
    Ok(())
}
