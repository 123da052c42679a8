//! Inline statement tags: `set` and `include`.

use stencil_ir::{AuxData, NodeId, TagId, TokenKind};

use super::{only_child, EXPRESSION};
use crate::codegen::{CompileError, Compiler};
use crate::parse::{ParseError, Parser, TokenPattern};
use crate::registry::Tag;

/// `{% set name = expr %}`: layout `[expr]`, aux `name`.
pub struct SetTag;

const SET_GRAMMAR: &[&[TokenPattern]] = &[&[
    TokenPattern::Kind(TokenKind::Identifier),
    TokenPattern::Exact(TokenKind::Punctuation, "="),
]];

impl Tag for SetTag {
    fn keyword(&self) -> &'static str {
        "set"
    }

    fn grammar(&self) -> &'static [&'static [TokenPattern]] {
        SET_GRAMMAR
    }

    fn parse(&self, p: &mut Parser<'_>, tag: TagId, line: u32) -> Result<NodeId, ParseError> {
        let name = p.expect_name("variable name")?;
        p.stream().expect(TokenKind::Punctuation, Some("="))?;
        let value = p.parse_expression()?;
        p.expect_tag_end()?;
        let mut aux = AuxData::new();
        aux.set("name", name.value);
        Ok(p.alloc_tag(tag, vec![value], aux, line))
    }

    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<(), CompileError> {
        let value = only_child(c, node, "set")?;
        let node = c.node(node)?;
        let name = node
            .aux
            .str("name")
            .ok_or_else(|| CompileError::bad_layout("set", "missing variable name", node.line))?;
        let value = c.expression(value)?;
        let local = c.fresh_temp();
        c.writeln(&format!("let {local} = {value};"));
        c.writeln(&format!("__ctx.set({name:?}, {local});"));
        Ok(())
    }
}

/// `{% include expr %}`: renders the named template into the current
/// output with the current variables. Layout `[expr]`.
pub struct IncludeTag;

impl Tag for IncludeTag {
    fn keyword(&self) -> &'static str {
        "include"
    }

    fn grammar(&self) -> &'static [&'static [TokenPattern]] {
        EXPRESSION
    }

    fn parse(&self, p: &mut Parser<'_>, tag: TagId, line: u32) -> Result<NodeId, ParseError> {
        let name = p.parse_expression()?;
        p.expect_tag_end()?;
        Ok(p.alloc_tag(tag, vec![name], AuxData::new(), line))
    }

    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<(), CompileError> {
        let name = only_child(c, node, "include")?;
        let name = c.expression(name)?;
        let local = c.fresh_temp();
        c.writeln(&format!("let {local} = {name};"));
        c.writeln(&format!("__env.include(&{local}, __ctx, __out)?;"));
        Ok(())
    }
}
