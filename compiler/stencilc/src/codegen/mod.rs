//! Code generation: optimized AST to Rust source.
//!
//! Each template becomes one Rust module holding a unit struct per output
//! unit (the template itself, plus one per nested `{% template %}` block),
//! each implementing `stencil_runtime::Renderable`. Statement nodes (tags)
//! write lines to the current unit's [`OutputBuffer`]; expression nodes
//! compile to Rust expressions of type `Value` (see `expr.rs`).
//!
//! Generated code relies on these names being in scope inside `render`:
//! `__env` (the runtime environment), `__ctx` (the variable stack) and
//! `__out` (the output sink), plus `stencil_runtime::prelude::*`.

mod error;
mod expr;
mod output;

pub use error::CompileError;
pub use output::OutputBuffer;

use rustc_hash::FxHashMap;
use stencil_ir::{AuxData, Node, NodeArena, NodeId, NodeKind, Slot};
use stencil_stack::ensure_sufficient_stack;

use crate::registry::Registries;

/// Indentation of statement lines inside `render` (module, impl, fn).
const BODY_LEVEL: usize = 3;

/// Compile one template's tree into a Rust module.
#[tracing::instrument(level = "debug", skip(arena, registries))]
pub fn compile(
    name: &str,
    namespace: &str,
    arena: &NodeArena,
    registries: &Registries,
) -> Result<String, CompileError> {
    let mut compiler = Compiler::new(registries, arena, name);
    let root = arena
        .root()
        .ok_or_else(|| CompileError::bad_layout("template", "tree has no root", 1))?;
    compiler.compile_node(root)?;
    Ok(compiler.finish(namespace))
}

/// Rust module name for a template: `<namespace>_<name>`, with every
/// character that cannot appear in an identifier replaced by `_`.
pub fn module_name(namespace: &str, name: &str) -> String {
    format!("{}_{}", identifier(namespace), identifier(name))
}

fn identifier(text: &str) -> String {
    let mut ident: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// State of one enclosing `for` loop, as seen by loops nested inside it.
#[derive(Clone, Debug, Default)]
pub struct LoopFrame {
    /// Local holding the loop's `LoopState`, when it keeps one.
    pub state_var: Option<String>,
    /// Local holding the context checkpoint when the loop shares its
    /// parent's scope instead of pushing its own.
    pub checkpoint: Option<String>,
    /// Local recording that the iterable was empty, for the `else` branch.
    pub empty_var: Option<String>,
}

/// One output target: a struct with its own buffer and loop stack.
struct Unit {
    runtime_name: String,
    struct_name: String,
    buffer: OutputBuffer,
    loops: Vec<LoopFrame>,
}

impl Unit {
    fn new(runtime_name: &str, struct_name: String) -> Self {
        Unit {
            runtime_name: runtime_name.to_string(),
            struct_name,
            buffer: OutputBuffer::with_indent(BODY_LEVEL),
            loops: Vec::new(),
        }
    }
}

/// Walks the tree and dispatches to the tag and operator strategies.
pub struct Compiler<'a> {
    registries: &'a Registries,
    arena: &'a NodeArena,
    current: Unit,
    /// Enclosing units while a nested one is being written.
    suspended: Vec<Unit>,
    finished: Vec<Unit>,
    main_name: String,
    /// Struct name of every nested unit, to the template name it came from.
    unit_names: FxHashMap<String, String>,
    temp_counter: u32,
}

impl<'a> Compiler<'a> {
    pub fn new(registries: &'a Registries, arena: &'a NodeArena, name: &str) -> Self {
        Compiler {
            registries,
            arena,
            current: Unit::new(name, "Template".to_string()),
            suspended: Vec::new(),
            finished: Vec::new(),
            main_name: name.to_string(),
            unit_names: FxHashMap::default(),
            temp_counter: 0,
        }
    }

    pub fn registries(&self) -> &'a Registries {
        self.registries
    }

    pub fn node(&self, id: NodeId) -> Result<&'a Node, CompileError> {
        self.arena
            .get(id)
            .ok_or_else(|| CompileError::bad_layout("node", format_args!("{id:?} does not exist"), 0))
    }

    pub fn aux(&self, id: NodeId) -> Result<&'a AuxData, CompileError> {
        self.node(id).map(|n| &n.aux)
    }

    /// Children of a tag node.
    pub fn tag_children(&self, id: NodeId) -> Result<&'a [NodeId], CompileError> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Tag { children, .. } => Ok(children),
            other => Err(CompileError::bad_layout(other.name(), "expected a tag node", node.line)),
        }
    }

    /// Compile one operand of an operator node.
    pub fn operand(&mut self, node: NodeId, slot: Slot) -> Result<String, CompileError> {
        let id = self.operand_node(node, slot)?;
        self.expression(id)
    }

    /// The node in `slot`, or a missing-operand error naming the operator.
    pub fn operand_node(&self, node: NodeId, slot: Slot) -> Result<NodeId, CompileError> {
        let n = self.node(node)?;
        match &n.kind {
            NodeKind::Operator { operator, operands } => operands.get(slot).ok_or_else(|| {
                let name = &self.registries.operators.get(*operator).name;
                CompileError::missing_operand(name, slot, n.line)
            }),
            other => Err(CompileError::bad_layout(other.name(), "expected an operator node", n.line)),
        }
    }

    pub fn writeln(&mut self, line: &str) {
        self.current.buffer.writeln(line);
    }

    pub fn indent(&mut self) {
        self.current.buffer.indent();
    }

    pub fn outdent(&mut self) {
        self.current.buffer.outdent();
    }

    /// A fresh local name, unique within the module.
    pub fn fresh_temp(&mut self) -> String {
        let n = self.temp_counter;
        self.temp_counter += 1;
        format!("_tmp{n}")
    }

    /// Compile a statement node: a tag, or a block/root of them.
    pub fn compile_node(&mut self, id: NodeId) -> Result<(), CompileError> {
        ensure_sufficient_stack(|| self.compile_node_inner(id))
    }

    fn compile_node_inner(&mut self, id: NodeId) -> Result<(), CompileError> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Root { children } | NodeKind::Block { children } => {
                for child in children {
                    self.compile_node(*child)?;
                }
                Ok(())
            }
            NodeKind::Tag { tag, .. } => {
                let tag = self.registries.tags.get(*tag);
                tag.compile(self, id)?;
                tag.compile_ending(self, id)
            }
            other => Err(CompileError::bad_layout(
                other.name(),
                "expression where a statement was expected",
                node.line,
            )),
        }
    }

    /// Start writing a nested unit named `name`.
    pub fn begin_unit(&mut self, name: &str, line: u32) -> Result<(), CompileError> {
        let struct_name = format!("Template_{}", identifier(name));
        let other = self.unit_names.get(&struct_name);
        if name == self.main_name || other.is_some_and(|other| other == name) {
            return Err(CompileError::bad_layout(
                "template",
                format_args!("template `{name}` is defined twice"),
                line,
            ));
        }
        if let Some(other) = other {
            return Err(CompileError::identifier_collision(name, other, &struct_name, line));
        }
        self.unit_names.insert(struct_name.clone(), name.to_string());
        let unit = Unit::new(name, struct_name);
        self.suspended.push(std::mem::replace(&mut self.current, unit));
        Ok(())
    }

    /// Finish the nested unit and resume the enclosing one.
    pub fn end_unit(&mut self, line: u32) -> Result<(), CompileError> {
        let enclosing = self.suspended.pop().ok_or_else(|| {
            CompileError::bad_layout("template", "no nested template is open", line)
        })?;
        let finished = std::mem::replace(&mut self.current, enclosing);
        self.finished.push(finished);
        Ok(())
    }

    pub fn push_loop(&mut self, frame: LoopFrame) {
        self.current.loops.push(frame);
    }

    pub fn pop_loop(&mut self) -> Option<LoopFrame> {
        self.current.loops.pop()
    }

    /// Innermost loop of the current unit.
    pub fn current_loop(&self) -> Option<&LoopFrame> {
        self.current.loops.last()
    }

    /// Assemble the module: main unit first, nested units in order.
    fn finish(self, namespace: &str) -> String {
        let mut out = OutputBuffer::new();
        out.writeln(
            "#[allow(unused_mut, unused_variables, unused_imports, unused_parens, \
             non_camel_case_types, clippy::all)]",
        );
        out.writeln(&format!(
            "pub mod {} {{",
            module_name(namespace, &self.current.runtime_name)
        ));
        out.indent();
        out.writeln("use ::stencil_runtime::prelude::*;");

        let units: Vec<Unit> = std::iter::once(self.current).chain(self.finished).collect();
        for unit in &units {
            out.newline();
            out.writeln(&format!("pub struct {};", unit.struct_name));
            out.newline();
            out.writeln(&format!("impl Renderable for {} {{", unit.struct_name));
            out.indent();
            out.writeln("fn name(&self) -> &str {");
            out.indent();
            out.writeln(&format!("{:?}", unit.runtime_name));
            out.outdent();
            out.writeln("}");
            out.newline();
            out.writeln(
                "fn render(&self, __env: &Environment, __ctx: &mut Context, __out: &mut Output) -> RenderResult<()> {",
            );
            out.push_raw(unit.buffer.as_str());
            out.indent();
            out.writeln("Ok(())");
            out.outdent();
            out.writeln("}");
            out.outdent();
            out.writeln("}");
        }

        out.newline();
        out.writeln("pub fn templates() -> Vec<Box<dyn Renderable>> {");
        out.indent();
        let boxed: Vec<String> = units
            .iter()
            .map(|u| format!("Box::new({})", u.struct_name))
            .collect();
        out.writeln(&format!("vec![{}]", boxed.join(", ")));
        out.outdent();
        out.writeln("}");
        out.outdent();
        out.writeln("}");
        out.take_output()
    }
}

#[cfg(test)]
mod tests;
