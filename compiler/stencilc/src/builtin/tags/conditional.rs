//! `if` and `switch`.

use stencil_ir::{AuxData, NodeId, TagId, TokenKind};

use super::EXPRESSION;
use crate::codegen::{CompileError, Compiler};
use crate::parse::{ParseError, Parser, StateKind, TokenPattern};
use crate::registry::Tag;

/// `{% if c %} ... {% elseif c %} ... {% else %} ... {% endif %}`
///
/// Layout: `[cond, block, cond, block, ..., else_block?]`, aux `has_else`.
pub struct IfTag;

impl Tag for IfTag {
    fn keyword(&self) -> &'static str {
        "if"
    }

    fn grammar(&self) -> &'static [&'static [TokenPattern]] {
        EXPRESSION
    }

    fn continuation_keywords(&self) -> &'static [&'static str] {
        &["elseif", "else"]
    }

    fn ending_keyword(&self) -> Option<&'static str> {
        Some("endif")
    }

    fn block_state(&self) -> Option<StateKind> {
        Some(StateKind::BlockIf)
    }

    fn parse(&self, p: &mut Parser<'_>, tag: TagId, line: u32) -> Result<NodeId, ParseError> {
        let condition = p.parse_expression()?;
        p.expect_tag_end()?;
        p.open_block(self, line);
        let mut children = vec![condition, p.parse_block(line)?];
        let mut has_else = false;

        loop {
            let keyword = p.next_branch()?;
            match keyword.value.as_str() {
                "elseif" if !has_else => {
                    let condition = p.parse_expression()?;
                    p.expect_tag_end()?;
                    children.push(condition);
                    children.push(p.parse_block(keyword.line)?);
                }
                "else" if !has_else => {
                    p.expect_tag_end()?;
                    has_else = true;
                    children.push(p.parse_block(keyword.line)?);
                }
                "endif" => {
                    let end = p.expect_tag_end()?;
                    p.close_block(self, end.line)?;
                    break;
                }
                _ => return Err(ParseError::unexpected("`endif`", &keyword)),
            }
        }

        let mut aux = AuxData::new();
        aux.set("has_else", has_else);
        Ok(p.alloc_tag(tag, children, aux, line))
    }

    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<(), CompileError> {
        let children = c.tag_children(node)?;
        let line = c.node(node)?.line;
        let (branches, otherwise) = match children.split_last() {
            Some((last, rest)) if c.aux(node)?.bool_or("has_else", false) => (rest, Some(*last)),
            _ => (children, None),
        };
        if branches.is_empty() || branches.len() % 2 != 0 {
            return Err(CompileError::bad_layout(
                "if",
                format_args!("{} children do not form condition/block pairs", branches.len()),
                line,
            ));
        }

        for (i, pair) in branches.chunks_exact(2).enumerate() {
            let condition = c.expression(pair[0])?;
            if i == 0 {
                c.writeln(&format!("if ({condition}).is_truthy() {{"));
            } else {
                c.outdent();
                c.writeln(&format!("}} else if ({condition}).is_truthy() {{"));
            }
            c.indent();
            c.compile_node(pair[1])?;
        }
        if let Some(block) = otherwise {
            c.outdent();
            c.writeln("} else {");
            c.indent();
            c.compile_node(block)?;
        }
        Ok(())
    }

    fn compile_ending(&self, c: &mut Compiler<'_>, _node: NodeId) -> Result<(), CompileError> {
        c.outdent();
        c.writeln("}");
        Ok(())
    }
}

/// `{% switch s %}{% case v %} ... {% default %} ... {% endswitch %}`
///
/// Layout: `[subject, value, block, value, block, ..., default_block?]`,
/// aux `has_default`. Only whitespace may appear before the first branch.
pub struct SwitchTag;

impl Tag for SwitchTag {
    fn keyword(&self) -> &'static str {
        "switch"
    }

    fn grammar(&self) -> &'static [&'static [TokenPattern]] {
        EXPRESSION
    }

    fn continuation_keywords(&self) -> &'static [&'static str] {
        &["case", "default"]
    }

    fn ending_keyword(&self) -> Option<&'static str> {
        Some("endswitch")
    }

    fn block_state(&self) -> Option<StateKind> {
        Some(StateKind::BlockSwitch)
    }

    fn parse(&self, p: &mut Parser<'_>, tag: TagId, line: u32) -> Result<NodeId, ParseError> {
        let subject = p.parse_expression()?;
        p.expect_tag_end()?;
        p.open_block(self, line);
        p.skip_blank_text(ParseError::switch_branch)?;

        if p.current().kind == TokenKind::Eof {
            return Err(ParseError::unterminated("switch", line, p.current().line));
        }
        let tags = &p.registries().tags;
        let at_branch = p.current().kind == TokenKind::TagStart && {
            let head = p.stream().peek(1);
            head.kind == TokenKind::Keyword && tags.owns_keyword("switch", &head.value)
        };
        if !at_branch {
            let found = if p.current().kind == TokenKind::TagStart {
                p.stream().peek(1).clone()
            } else {
                p.current().clone()
            };
            return Err(ParseError::switch_branch(&found));
        }

        let mut children = vec![subject];
        let mut has_default = false;
        loop {
            let keyword = p.next_branch()?;
            match keyword.value.as_str() {
                "case" if !has_default => {
                    let value = p.parse_expression()?;
                    p.expect_tag_end()?;
                    children.push(value);
                    children.push(p.parse_block(keyword.line)?);
                }
                "default" if !has_default => {
                    p.expect_tag_end()?;
                    has_default = true;
                    children.push(p.parse_block(keyword.line)?);
                }
                "endswitch" => {
                    let end = p.expect_tag_end()?;
                    p.close_block(self, end.line)?;
                    break;
                }
                _ => return Err(ParseError::unexpected("`endswitch`", &keyword)),
            }
        }

        let mut aux = AuxData::new();
        aux.set("has_default", has_default);
        Ok(p.alloc_tag(tag, children, aux, line))
    }

    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<(), CompileError> {
        let children = c.tag_children(node)?;
        let line = c.node(node)?.line;
        let Some((&subject, rest)) = children.split_first() else {
            return Err(CompileError::bad_layout("switch", "missing subject", line));
        };
        let (cases, default) = match rest.split_last() {
            Some((last, cases)) if c.aux(node)?.bool_or("has_default", false) => (cases, Some(*last)),
            _ => (rest, None),
        };
        if cases.len() % 2 != 0 {
            return Err(CompileError::bad_layout(
                "switch",
                format_args!("{} children do not form value/block pairs", cases.len()),
                line,
            ));
        }

        let subject = c.expression(subject)?;
        let local = c.fresh_temp();
        c.writeln(&format!("let {local} = {subject};"));

        for (i, pair) in cases.chunks_exact(2).enumerate() {
            let value = c.expression(pair[0])?;
            let test = format!("ops::matches_case(&{local}, &{value})");
            if i == 0 {
                c.writeln(&format!("if {test} {{"));
            } else {
                c.outdent();
                c.writeln(&format!("}} else if {test} {{"));
            }
            c.indent();
            c.compile_node(pair[1])?;
        }
        if let Some(block) = default {
            if cases.is_empty() {
                c.writeln("{");
            } else {
                c.outdent();
                c.writeln("} else {");
            }
            c.indent();
            c.compile_node(block)?;
        }
        Ok(())
    }

    fn compile_ending(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<(), CompileError> {
        // Something was opened unless the switch has no branch at all.
        if c.tag_children(node)?.len() > 1 {
            c.outdent();
            c.writeln("}");
        }
        Ok(())
    }
}
