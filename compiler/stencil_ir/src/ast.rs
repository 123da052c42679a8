//! Template AST stored in a flat arena.
//!
//! The parser allocates nodes bottom-up and links them by [`NodeId`].
//! Each node owns its children exclusively, so the tree has no sharing and
//! no cycles; the optimizer answers ancestor questions by carrying the
//! path it walked down rather than by following parent links.

use std::fmt;
use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

use crate::{AuxData, FunctionId, OperatorId, TagId};

/// Index of a node in a [`NodeArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel for "no node".
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

/// Operand position of an operator node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Slot {
    Left,
    Middle,
    Right,
}

impl Slot {
    pub fn name(self) -> &'static str {
        match self {
            Slot::Left => "left",
            Slot::Middle => "middle",
            Slot::Right => "right",
        }
    }
}

/// Operand slots of an operator node.
///
/// Binary operators fill `left` and `right`, unary prefix operators fill
/// `right`, tests fill `left` (and `right` when they take an argument), the
/// ternary fills all three. A slot left empty is reported by the compiler
/// when it asks for it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Operands {
    pub left: Option<NodeId>,
    pub middle: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl Operands {
    pub fn binary(left: NodeId, right: NodeId) -> Self {
        Operands {
            left: Some(left),
            middle: None,
            right: Some(right),
        }
    }

    pub fn get(&self, slot: Slot) -> Option<NodeId> {
        match slot {
            Slot::Left => self.left,
            Slot::Middle => self.middle,
            Slot::Right => self.right,
        }
    }

    pub fn set(&mut self, slot: Slot, id: NodeId) {
        match slot {
            Slot::Left => self.left = Some(id),
            Slot::Middle => self.middle = Some(id),
            Slot::Right => self.right = Some(id),
        }
    }

    /// Filled slots in left, middle, right order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        [self.left, self.middle, self.right].into_iter().flatten()
    }
}

/// Target of a function node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Callee {
    /// Found in the function registry at parse time.
    Resolved(FunctionId),
    /// Not registered; dispatched to a host helper at render time.
    Named(String),
}

/// Literal value of a data node.
#[derive(Clone, PartialEq, Debug)]
pub enum DataValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Array literal; elements are child nodes.
    List(Vec<NodeId>),
}

/// The node variants.
#[derive(Clone, PartialEq, Debug)]
pub enum NodeKind {
    /// Top of a template.
    Root { children: Vec<NodeId> },
    /// Ordered body of a block tag (one branch of an `if`, a loop body, ...).
    Block { children: Vec<NodeId> },
    /// A tag; the layout of `children` is owned by the tag's definition.
    Tag { tag: TagId, children: Vec<NodeId> },
    Operator {
        operator: OperatorId,
        operands: Operands,
    },
    Function {
        callee: Callee,
        receiver: Option<NodeId>,
        args: Vec<NodeId>,
    },
    Data(DataValue),
    /// Variable lookup in the render context.
    Variable(String),
    /// Bare name, used for attribute keys and tag arguments.
    Identifier(String),
    /// `base[index]`, or `base.name` with an `Identifier` index.
    ArrayIndex { base: NodeId, index: NodeId },
}

impl NodeKind {
    /// Short name for diagnostics and tree dumps.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root { .. } => "root",
            NodeKind::Block { .. } => "block",
            NodeKind::Tag { .. } => "tag",
            NodeKind::Operator { .. } => "operator",
            NodeKind::Function { .. } => "function",
            NodeKind::Data(_) => "data",
            NodeKind::Variable(_) => "variable",
            NodeKind::Identifier(_) => "identifier",
            NodeKind::ArrayIndex { .. } => "array index",
        }
    }
}

/// One AST node: its variant, source line and auxiliary data.
#[derive(Clone, PartialEq, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub line: u32,
    pub aux: AuxData,
}

/// Arena owning every node of one template.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and return its id.
    pub fn alloc(&mut self, kind: NodeKind, line: u32) -> NodeId {
        let index = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX - 1);
        self.nodes.push(Node {
            kind,
            line,
            aux: AuxData::new(),
        });
        NodeId::new(index)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).filter_map(|i| u32::try_from(i).ok().map(NodeId::new))
    }

    /// Direct children of a node, in source order.
    pub fn children(&self, id: NodeId) -> SmallVec<[NodeId; 4]> {
        let Some(node) = self.get(id) else {
            return SmallVec::new();
        };
        match &node.kind {
            NodeKind::Root { children }
            | NodeKind::Block { children }
            | NodeKind::Tag { children, .. } => children.iter().copied().collect(),
            NodeKind::Operator { operands, .. } => operands.iter().collect(),
            NodeKind::Function { receiver, args, .. } => {
                receiver.iter().chain(args.iter()).copied().collect()
            }
            NodeKind::Data(DataValue::List(items)) => items.iter().copied().collect(),
            NodeKind::ArrayIndex { base, index } => SmallVec::from_slice(&[*base, *index]),
            NodeKind::Data(_) | NodeKind::Variable(_) | NodeKind::Identifier(_) => {
                SmallVec::new()
            }
        }
    }

    /// Whether any strict descendant of `id` satisfies `pred`.
    pub fn any_descendant(&self, id: NodeId, mut pred: impl FnMut(&Node) -> bool) -> bool {
        let mut pending: Vec<NodeId> = self.children(id).into_vec();
        while let Some(next) = pending.pop() {
            if let Some(node) = self.get(next) {
                if pred(node) {
                    return true;
                }
            }
            pending.extend(self.children(next));
        }
        false
    }

    /// Snapshot of every node's auxiliary data, indexed by node.
    pub fn aux_snapshot(&self) -> Vec<AuxData> {
        self.nodes.iter().map(|n| n.aux.clone()).collect()
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests;
