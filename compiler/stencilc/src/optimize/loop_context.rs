use stencil_ir::{NodeArena, NodeId, NodeKind};

use super::{Pass, PassContext};

/// Annotates repeating tags (`for`) with what their loop context needs.
///
/// - `needs_temp`: a loop of the same tag is nested inside, so this loop
///   keeps its iteration state in a `LoopState` local.
/// - `reuse_context`: a loop of the same tag encloses this one in the same
///   output unit, so this loop shares its scope instead of pushing one and
///   rolls back its writes afterwards. Rendered output is the same either
///   way.
pub struct LoopContextPass;

impl Pass for LoopContextPass {
    fn name(&self) -> &'static str {
        "loop-context"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn enter(&self, arena: &mut NodeArena, node: NodeId, cx: &PassContext<'_>) {
        let NodeKind::Tag { tag, .. } = arena[node].kind else {
            return;
        };
        let tags = &cx.registries.tags;
        if !tags.get(tag).is_repeating() {
            return;
        }

        let needs_temp = arena.any_descendant(node, |n| matches!(n.kind, NodeKind::Tag { tag: t, .. } if t == tag));
        let mut reuse_context = false;
        for &ancestor in cx.ancestors.iter().rev() {
            let NodeKind::Tag { tag: t, .. } = arena[ancestor].kind else {
                continue;
            };
            if t == tag {
                reuse_context = true;
                break;
            }
            if tags.get(t).opens_unit() {
                break;
            }
        }

        let aux = &mut arena[node].aux;
        aux.set("needs_temp", needs_temp);
        aux.set("reuse_context", reuse_context);
    }
}
