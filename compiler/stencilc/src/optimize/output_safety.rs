use stencil_ir::{Callee, NodeArena, NodeId, NodeKind};

use super::{Pass, PassContext};
use crate::parse::PRINT_TAG;

/// Marks `print` nodes whose value needs no escaping.
///
/// Sets `safe` on every print node: `true` for template text and for calls
/// to functions registered as safe, `false` otherwise.
pub struct OutputSafetyPass;

impl Pass for OutputSafetyPass {
    fn name(&self) -> &'static str {
        "output-safety"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn enter(&self, arena: &mut NodeArena, node: NodeId, cx: &PassContext<'_>) {
        let NodeKind::Tag { tag, ref children } = arena[node].kind else {
            return;
        };
        if cx.registries.tags.get(tag).keyword() != PRINT_TAG {
            return;
        }
        let safe = arena[node].aux.bool_or("text", false)
            || children.first().is_some_and(|&expr| match &arena[expr].kind {
                NodeKind::Function {
                    callee: Callee::Resolved(id),
                    receiver: None,
                    ..
                } => cx.registries.functions.get(*id).is_safe,
                _ => false,
            });
        arena[node].aux.set("safe", safe);
    }
}
