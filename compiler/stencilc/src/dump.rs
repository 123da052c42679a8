//! Indented text rendering of a tree, for `stencil ast` and tests.

use std::fmt::Write as _;

use stencil_ir::{AuxValue, Callee, DataValue, NodeArena, NodeId, NodeKind};

use crate::registry::Registries;

/// One node per line, children indented two spaces under their parent.
///
/// ```text
/// root
///   tag print {safe: false} @1
///     operator + @1
///       data 2 @1
///       variable x @1
/// ```
pub fn dump_tree(arena: &NodeArena, registries: &Registries) -> String {
    let mut out = String::new();
    if let Some(root) = arena.root() {
        dump_node(arena, registries, root, 0, &mut out);
    }
    out
}

fn dump_node(arena: &NodeArena, registries: &Registries, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = arena.get(id) else {
        return;
    };
    let _ = write!(out, "{:width$}", "", width = depth * 2);
    match &node.kind {
        NodeKind::Root { .. } => out.push_str("root"),
        NodeKind::Block { .. } => out.push_str("block"),
        NodeKind::Tag { tag, .. } => {
            let _ = write!(out, "tag {}", registries.tags.get(*tag).keyword());
        }
        NodeKind::Operator { operator, .. } => {
            let definition = registries.operators.get(*operator);
            let symbol = definition.aliases.first().map_or(definition.name.as_str(), String::as_str);
            let _ = write!(out, "operator {symbol}");
        }
        NodeKind::Function { callee, receiver, .. } => {
            let name = match callee {
                Callee::Resolved(f) => registries.functions.get(*f).name.as_str(),
                Callee::Named(name) => name.as_str(),
            };
            let kind = if receiver.is_some() { "method" } else { "call" };
            let _ = write!(out, "{kind} {name}");
        }
        NodeKind::Data(value) => match value {
            DataValue::Null => out.push_str("data null"),
            DataValue::Bool(b) => {
                let _ = write!(out, "data {b}");
            }
            DataValue::Int(n) => {
                let _ = write!(out, "data {n}");
            }
            DataValue::Float(f) => {
                let _ = write!(out, "data {f:?}");
            }
            DataValue::String(s) => {
                let _ = write!(out, "data {s:?}");
            }
            DataValue::List(_) => out.push_str("data list"),
        },
        NodeKind::Variable(name) => {
            let _ = write!(out, "variable {name}");
        }
        NodeKind::Identifier(name) => {
            let _ = write!(out, "identifier {name}");
        }
        NodeKind::ArrayIndex { .. } => out.push_str("index"),
    }

    if !node.aux.is_empty() {
        let entries: Vec<String> = node
            .aux
            .iter()
            .map(|(key, value)| match value {
                AuxValue::Bool(b) => format!("{key}: {b}"),
                AuxValue::Int(n) => format!("{key}: {n}"),
                AuxValue::Str(s) => format!("{key}: {s:?}"),
                AuxValue::List(items) => format!("{key}: [{}]", items.join(", ")),
            })
            .collect();
        let _ = write!(out, " {{{}}}", entries.join(", "));
    }
    if !matches!(node.kind, NodeKind::Root { .. }) {
        let _ = write!(out, " @{}", node.line);
    }
    out.push('\n');

    for child in arena.children(id) {
        dump_node(arena, registries, child, depth + 1, out);
    }
}
