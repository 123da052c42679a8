//! Tree-annotation passes run between parsing and code generation.
//!
//! All passes share one depth-first traversal. At each node every pass's
//! `enter` runs before the children are visited and every pass's `leave`
//! after, both in priority order (lower first). Passes read and write
//! auxiliary data only; they never add, remove or move nodes.

mod loop_context;
mod output_safety;

pub use loop_context::LoopContextPass;
pub use output_safety::OutputSafetyPass;

use stencil_ir::{NodeArena, NodeId};
use stencil_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::registry::Registries;

/// What a pass can see at a node.
pub struct PassContext<'a> {
    pub registries: &'a Registries,
    /// Path from the root down to the node's parent, root first.
    pub ancestors: &'a [NodeId],
}

/// One optimizer pass.
pub trait Pass: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower values run first.
    fn priority(&self) -> i32;

    fn enter(&self, arena: &mut NodeArena, node: NodeId, cx: &PassContext<'_>) {
        let _ = (arena, node, cx);
    }

    fn leave(&self, arena: &mut NodeArena, node: NodeId, cx: &PassContext<'_>) {
        let _ = (arena, node, cx);
    }
}

/// An ordered set of passes.
#[derive(Default)]
pub struct Optimizer {
    passes: Vec<Box<dyn Pass>>,
}

impl Optimizer {
    /// No passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loop-context materialization and output safety.
    pub fn with_default_passes() -> Self {
        let mut optimizer = Self::new();
        optimizer.add_pass(Box::new(LoopContextPass));
        optimizer.add_pass(Box::new(OutputSafetyPass));
        optimizer
    }

    /// Add a pass, keeping the list ordered by priority. Passes with equal
    /// priority run in the order they were added.
    pub fn add_pass(&mut self, pass: Box<dyn Pass>) {
        let at = self
            .passes
            .partition_point(|p| p.priority() <= pass.priority());
        self.passes.insert(at, pass);
    }

    pub fn pass_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.passes.iter().map(|p| p.name())
    }

    /// Run every pass over the tree in one traversal.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = arena.len()))]
    pub fn run(&self, arena: &mut NodeArena, registries: &Registries) {
        let Some(root) = arena.root() else {
            return;
        };
        if self.passes.is_empty() {
            return;
        }
        let mut path = Vec::new();
        self.visit(arena, registries, root, &mut path);
        debug!(passes = self.passes.len(), "optimizer finished");
    }

    fn visit(&self, arena: &mut NodeArena, registries: &Registries, node: NodeId, path: &mut Vec<NodeId>) {
        ensure_sufficient_stack(|| {
            {
                let cx = PassContext {
                    registries,
                    ancestors: path.as_slice(),
                };
                for pass in &self.passes {
                    pass.enter(arena, node, &cx);
                }
            }
            path.push(node);
            for child in arena.children(node) {
                self.visit(arena, registries, child, path);
            }
            path.pop();
            let cx = PassContext {
                registries,
                ancestors: path.as_slice(),
            };
            for pass in &self.passes {
                pass.leave(arena, node, &cx);
            }
        });
    }
}

#[cfg(test)]
mod tests;
