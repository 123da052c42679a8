//! Stencil IR - tokens and the template AST.
//!
//! This crate holds the data shared by every compiler phase:
//! - [`Token`] / [`TokenKind`] produced by the tokenizer
//! - Registry handles ([`OperatorId`], [`TagId`], [`FunctionId`]) that AST
//!   nodes use to point back at the definition responsible for them
//! - The flat node arena ([`NodeArena`], [`NodeId`]) built by the parser,
//!   annotated by optimizer passes and read by the code generator
//!
//! # Design
//!
//! - **Flatten everything**: nodes refer to children through `NodeId(u32)`
//!   indices, never through boxes or parent pointers.
//! - **Single owner**: every node except the root is the child of exactly one
//!   other node. Ancestor queries are answered by explicit traversal.

mod ast;
mod aux;
mod ids;
mod token;

pub use ast::{Callee, DataValue, Node, NodeArena, NodeId, NodeKind, Operands, Slot};
pub use aux::{AuxData, AuxValue};
pub use ids::{FunctionId, OperatorId, TagId};
pub use token::{Token, TokenKind};
