use stencil_ir::{AuxData, NodeId, TagId, TokenKind};

use crate::codegen::{CompileError, Compiler};
use crate::parse::{ParseError, Parser, StateKind, TokenPattern};
use crate::registry::Tag;

/// `{% template name %} ... {% endtemplate %}`: a nested template.
///
/// The body compiles into its own unit, registered at runtime under `name`
/// and renderable or includable like any top-level template. Nothing is
/// written where the block appears. Layout `[block]`, aux `name`.
pub struct TemplateTag;

const TEMPLATE_GRAMMAR: &[&[TokenPattern]] = &[
    &[
        TokenPattern::Kind(TokenKind::Identifier),
        TokenPattern::Kind(TokenKind::TagEnd),
    ],
    &[
        TokenPattern::Kind(TokenKind::String),
        TokenPattern::Kind(TokenKind::TagEnd),
    ],
];

impl Tag for TemplateTag {
    fn keyword(&self) -> &'static str {
        "template"
    }

    fn grammar(&self) -> &'static [&'static [TokenPattern]] {
        TEMPLATE_GRAMMAR
    }

    fn ending_keyword(&self) -> Option<&'static str> {
        Some("endtemplate")
    }

    fn block_state(&self) -> Option<StateKind> {
        Some(StateKind::BlockTemplate)
    }

    fn opens_unit(&self) -> bool {
        true
    }

    fn parse(&self, p: &mut Parser<'_>, tag: TagId, line: u32) -> Result<NodeId, ParseError> {
        let name = p.stream().advance();
        p.expect_tag_end()?;
        p.open_block(self, line);
        let body = p.parse_block(line)?;
        p.next_branch()?;
        let end = p.expect_tag_end()?;
        p.close_block(self, end.line)?;

        let mut aux = AuxData::new();
        aux.set("name", name.value);
        Ok(p.alloc_tag(tag, vec![body], aux, line))
    }

    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<(), CompileError> {
        let line = c.node(node)?.line;
        let &[body] = c.tag_children(node)? else {
            return Err(CompileError::bad_layout("template", "expected one block", line));
        };
        let name = c
            .aux(node)?
            .str("name")
            .ok_or_else(|| CompileError::bad_layout("template", "missing name", line))?;
        c.begin_unit(name, line)?;
        c.compile_node(body)?;
        c.end_unit(line)
    }
}
