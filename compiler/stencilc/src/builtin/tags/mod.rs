//! Tags of the `core` extension.

mod conditional;
mod for_loop;
mod print;
mod statement;
mod template;

pub use conditional::{IfTag, SwitchTag};
pub use for_loop::ForTag;
pub use print::PrintTag;
pub use statement::{IncludeTag, SetTag};
pub use template::TemplateTag;

use stencil_ir::NodeId;

use crate::codegen::{CompileError, Compiler};
use crate::parse::TokenPattern;
use crate::registry::Tag;

/// Grammar of tags whose header is a single expression.
const EXPRESSION: &[&[TokenPattern]] = &[&[TokenPattern::ExpressionStart]];

/// The single child of a tag with layout `[expr]`.
fn only_child(c: &Compiler<'_>, node: NodeId, tag: &str) -> Result<NodeId, CompileError> {
    match *c.tag_children(node)? {
        [child] => Ok(child),
        ref other => Err(CompileError::bad_layout(
            tag,
            format_args!("expected one child, found {}", other.len()),
            c.node(node)?.line,
        )),
    }
}

pub fn core_tags() -> Vec<Box<dyn Tag>> {
    vec![
        Box::new(PrintTag),
        Box::new(IfTag),
        Box::new(ForTag),
        Box::new(SwitchTag),
        Box::new(SetTag),
        Box::new(IncludeTag),
        Box::new(TemplateTag),
    ]
}
