//! The built-in `core` extension: the operator set, the control-flow tags
//! and a handful of functions. Every environment registers it first.

mod functions;
mod operators;
mod tags;

pub use operators::{BinaryHelper, Conditional, IsSet, Logical, Not, TestHelper, UnaryHelper};
pub use tags::{ForTag, IfTag, IncludeTag, PrintTag, SetTag, SwitchTag, TemplateTag};

use crate::registry::{OperatorDefinition, Tag, TemplateFunction};
use crate::Extension;

pub struct CoreExtension;

impl Extension for CoreExtension {
    fn name(&self) -> &str {
        "core"
    }

    fn operators(&self) -> Vec<OperatorDefinition> {
        operators::core_operators()
    }

    fn tags(&self) -> Vec<Box<dyn Tag>> {
        tags::core_tags()
    }

    fn functions(&self) -> Vec<TemplateFunction> {
        functions::core_functions()
    }
}
