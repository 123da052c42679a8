//! Expression code generation.
//!
//! Every expression compiles to a Rust expression of type `Value`. Fallible
//! runtime helpers end in `?`, which propagates out of `render`.

use stencil_ir::{Callee, DataValue, NodeId, NodeKind};
use stencil_stack::ensure_sufficient_stack;

use super::{CompileError, Compiler};
use crate::registry::Invocation;

impl Compiler<'_> {
    /// Compile an expression node.
    pub fn expression(&mut self, id: NodeId) -> Result<String, CompileError> {
        ensure_sufficient_stack(|| self.expression_inner(id))
    }

    fn expression_inner(&mut self, id: NodeId) -> Result<String, CompileError> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Data(value) => self.data(value, node.line),
            NodeKind::Variable(name) => Ok(format!("__ctx.get({name:?})")),
            NodeKind::Identifier(name) => Ok(format!("Value::from({name:?})")),
            NodeKind::ArrayIndex { base, index } => {
                let base = self.expression(*base)?;
                let index = self.expression(*index)?;
                Ok(format!("ops::index(&{base}, &{index})?"))
            }
            NodeKind::Operator { operator, .. } => {
                let definition = self.registries().operators.get(*operator);
                definition.strategy.compile(self, id)
            }
            NodeKind::Function {
                callee,
                receiver,
                args,
            } => self.call(callee, *receiver, args),
            other @ (NodeKind::Root { .. } | NodeKind::Block { .. } | NodeKind::Tag { .. }) => {
                Err(CompileError::bad_layout(
                    other.name(),
                    "statement where an expression was expected",
                    node.line,
                ))
            }
        }
    }

    fn data(&mut self, value: &DataValue, line: u32) -> Result<String, CompileError> {
        Ok(match value {
            DataValue::Null => "Value::Null".to_string(),
            DataValue::Bool(b) => format!("Value::Bool({b})"),
            DataValue::Int(n) => format!("Value::Int({n})"),
            DataValue::Float(f) if f.is_finite() => format!("Value::Float({f:?})"),
            DataValue::Float(f) => {
                return Err(CompileError::bad_layout("number", format_args!("`{f}` is not finite"), line))
            }
            DataValue::String(s) => format!("Value::from({s:?})"),
            DataValue::List(items) => {
                let items = self.expressions(items)?;
                format!("Value::List(vec![{items}])")
            }
        })
    }

    /// Comma-separated list of compiled expressions.
    pub fn expressions(&mut self, ids: &[NodeId]) -> Result<String, CompileError> {
        let compiled = ids
            .iter()
            .map(|id| self.expression(*id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(compiled.join(", "))
    }

    /// Emit a call according to how the callee resolved.
    fn call(
        &mut self,
        callee: &Callee,
        receiver: Option<NodeId>,
        args: &[NodeId],
    ) -> Result<String, CompileError> {
        let functions = &self.registries().functions;
        let args = self.expressions(args)?;

        if let Some(receiver) = receiver {
            let receiver = self.expression(receiver)?;
            let name = match callee {
                Callee::Named(name) => name.as_str(),
                Callee::Resolved(id) => functions.get(*id).name.as_str(),
            };
            return Ok(format!("__env.call_method(&{receiver}, {name:?}, &[{args}])?"));
        }

        Ok(match callee {
            Callee::Resolved(id) => match &functions.get(*id).invocation {
                Invocation::Simple { target } => format!("{target}(&[{args}])?"),
                Invocation::Method { extension, method } => {
                    format!("__env.extension({extension:?})?.call({method:?}, &[{args}])?")
                }
                Invocation::Callback { binding } => {
                    format!("__env.invoke_callback({binding:?}, &[{args}])?")
                }
            },
            // Not registered: late-bound to a helper on the environment.
            Callee::Named(name) => format!("self.call_helper(__env, {name:?}, &[{args}])?"),
        })
    }
}
