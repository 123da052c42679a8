use crate::registry::TemplateFunction;

/// Functions of the `core` extension.
///
/// Plain functions call straight into `stencil_runtime::functions`; string
/// methods go through the runtime's `core` extension object.
pub fn core_functions() -> Vec<TemplateFunction> {
    let simple = |name: &str| TemplateFunction::simple(name, &format!("functions::{name}"));
    vec![
        simple("length"),
        simple("upper"),
        simple("lower"),
        simple("join"),
        simple("range"),
        simple("abs"),
        simple("raw").safe(),
        TemplateFunction::method("replace", "core", "replace"),
        TemplateFunction::method("split", "core", "split"),
    ]
}
