use stencil_ir::{AuxData, NodeId, TagId, TokenKind};

use crate::codegen::{CompileError, Compiler, LoopFrame};
use crate::parse::{ParseError, Parser, StateKind, TokenPattern};
use crate::registry::Tag;

use TokenPattern::{Exact, Kind, Word};

/// `{% for v in xs %}`, `{% for k, v in xs %}`, optionally parenthesized,
/// with an `{% else %}` branch taken when `xs` is empty.
///
/// Layout: `[iterable, body, else_block?]`; aux `value_var`, `key_var`
/// (optional) and `has_else`. The loop-context pass adds `needs_temp` and
/// `reuse_context`.
pub struct ForTag;

const FOR_GRAMMAR: &[&[TokenPattern]] = &[
    &[Exact(TokenKind::Punctuation, "("), Kind(TokenKind::Identifier)],
    &[Kind(TokenKind::Identifier), Word("in")],
    &[
        Kind(TokenKind::Identifier),
        Exact(TokenKind::Punctuation, ","),
        Kind(TokenKind::Identifier),
    ],
];

impl Tag for ForTag {
    fn keyword(&self) -> &'static str {
        "for"
    }

    fn grammar(&self) -> &'static [&'static [TokenPattern]] {
        FOR_GRAMMAR
    }

    fn continuation_keywords(&self) -> &'static [&'static str] {
        &["else"]
    }

    fn ending_keyword(&self) -> Option<&'static str> {
        Some("endfor")
    }

    fn block_state(&self) -> Option<StateKind> {
        Some(StateKind::BlockFor)
    }

    fn is_repeating(&self) -> bool {
        true
    }

    fn parse(&self, p: &mut Parser<'_>, tag: TagId, line: u32) -> Result<NodeId, ParseError> {
        let parenthesized = p.current().is_punct("(");
        if parenthesized {
            let open = p.stream().advance();
            p.open(StateKind::Expression, "(", open.line);
        }

        let first = p.expect_name("loop variable")?;
        let (key_var, value_var) = if p.current().is_punct(",") {
            p.stream().skip(1);
            let second = p.expect_name("loop variable")?;
            (Some(first.value), second.value)
        } else {
            (None, first.value)
        };
        p.stream().expect_one_of(&[Word("in")])?;
        let iterable = p.parse_expression()?;
        if parenthesized {
            p.close(
                StateKind::Expression,
                "(",
                Exact(TokenKind::Punctuation, ")"),
            )?;
        }
        p.expect_tag_end()?;

        p.open_block(self, line);
        let mut children = vec![iterable, p.parse_block(line)?];
        let mut has_else = false;
        loop {
            let keyword = p.next_branch()?;
            match keyword.value.as_str() {
                "else" if !has_else => {
                    p.expect_tag_end()?;
                    has_else = true;
                    children.push(p.parse_block(keyword.line)?);
                }
                "endfor" => {
                    let end = p.expect_tag_end()?;
                    p.close_block(self, end.line)?;
                    break;
                }
                _ => return Err(ParseError::unexpected("`endfor`", &keyword)),
            }
        }

        let mut aux = AuxData::new();
        if let Some(key) = key_var {
            aux.set("key_var", key);
        }
        aux.set("value_var", value_var);
        aux.set("has_else", has_else);
        Ok(p.alloc_tag(tag, children, aux, line))
    }

    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<(), CompileError> {
        let children = c.tag_children(node)?;
        let line = c.node(node)?.line;
        let aux = c.aux(node)?;
        let (iterable, body) = match *children {
            [iterable, body] | [iterable, body, _] => (iterable, body),
            _ => {
                return Err(CompileError::bad_layout(
                    "for",
                    format_args!("expected 2 or 3 children, found {}", children.len()),
                    line,
                ))
            }
        };
        let value_var = aux
            .str("value_var")
            .ok_or_else(|| CompileError::bad_layout("for", "missing loop variable", line))?;
        let key_var = aux.str("key_var");
        let needs_temp = aux.bool_or("needs_temp", true);
        // Sharing the enclosing loop's scope: every write the loop makes to
        // it is rolled back at the end, as a popped scope would be.
        let checkpoint = if aux.bool_or("reuse_context", false) && c.current_loop().is_some() {
            let mark = c.fresh_temp();
            c.writeln(&format!("let {mark} = __ctx.checkpoint();"));
            Some(mark)
        } else {
            c.writeln("__ctx.push_scope();");
            None
        };

        let iterable = c.expression(iterable)?;
        let entries = c.fresh_temp();
        c.writeln(&format!("let {entries} = ({iterable}).iter_entries()?;"));
        let empty_var = if children.len() == 3 {
            let empty = c.fresh_temp();
            c.writeln(&format!("let {empty} = {entries}.is_empty();"));
            Some(empty)
        } else {
            None
        };

        let key_local = c.fresh_temp();
        let value_local = c.fresh_temp();
        let state_var = if needs_temp {
            let state = c.fresh_temp();
            c.writeln(&format!("let mut {state} = LoopState::new({entries}.len());"));
            c.writeln(&format!("for ({key_local}, {value_local}) in {entries} {{"));
            c.indent();
            if let Some(key) = key_var {
                c.writeln(&format!("__ctx.set({key:?}, {key_local});"));
            }
            c.writeln(&format!("__ctx.set({value_var:?}, {value_local});"));
            c.writeln(&format!("__ctx.set(\"loop\", {state}.to_value());"));
            Some(state)
        } else {
            let len = c.fresh_temp();
            let index = c.fresh_temp();
            c.writeln(&format!("let {len} = {entries}.len();"));
            c.writeln(&format!(
                "for ({index}, ({key_local}, {value_local})) in {entries}.into_iter().enumerate() {{"
            ));
            c.indent();
            if let Some(key) = key_var {
                c.writeln(&format!("__ctx.set({key:?}, {key_local});"));
            }
            c.writeln(&format!("__ctx.set({value_var:?}, {value_local});"));
            c.writeln(&format!("__ctx.set(\"loop\", LoopState::at({index}, {len}).to_value());"));
            None
        };

        c.push_loop(LoopFrame {
            state_var,
            checkpoint,
            empty_var,
        });
        c.compile_node(body)
    }

    fn compile_ending(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<(), CompileError> {
        let line = c.node(node)?.line;
        let frame = c
            .pop_loop()
            .ok_or_else(|| CompileError::bad_layout("for", "loop stack is empty", line))?;

        if let Some(state) = &frame.state_var {
            c.writeln(&format!("{state}.advance();"));
        }
        c.outdent();
        c.writeln("}");

        match &frame.checkpoint {
            Some(mark) => c.writeln(&format!("__ctx.rollback({mark});")),
            None => c.writeln("__ctx.pop_scope();"),
        }

        if let Some(empty) = &frame.empty_var {
            let otherwise = c
                .tag_children(node)?
                .get(2)
                .copied()
                .ok_or_else(|| CompileError::bad_layout("for", "missing else block", line))?;
            c.writeln(&format!("if {empty} {{"));
            c.indent();
            c.compile_node(otherwise)?;
            c.outdent();
            c.writeln("}");
        }
        Ok(())
    }
}
