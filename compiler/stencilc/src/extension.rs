//! Extensions: bundles of operators, tags and functions.

use crate::registry::{OperatorDefinition, Tag, TemplateFunction};

/// Something that contributes to the registries.
///
/// Extensions are registered once when a compile [`Environment`] is built;
/// the contributions are registered in order, so within one extension a
/// negated operator may refer back to its positive form.
///
/// [`Environment`]: crate::Environment
pub trait Extension: Send + Sync {
    fn name(&self) -> &str;

    fn operators(&self) -> Vec<OperatorDefinition> {
        Vec::new()
    }

    fn tags(&self) -> Vec<Box<dyn Tag>> {
        Vec::new()
    }

    fn functions(&self) -> Vec<TemplateFunction> {
        Vec::new()
    }
}
