use stencil_ir::{AuxData, DataValue, NodeId, NodeKind, TagId};

use super::{only_child, EXPRESSION};
use crate::codegen::{CompileError, Compiler};
use crate::parse::{ParseError, Parser, TokenPattern, PRINT_TAG};
use crate::registry::Tag;

/// `{% print expr %}`, `{{ expr }}` and template text.
///
/// Layout: `[expr]`. Template text carries aux `text`; the output-safety
/// pass sets `safe` on every print node.
pub struct PrintTag;

impl Tag for PrintTag {
    fn keyword(&self) -> &'static str {
        PRINT_TAG
    }

    fn grammar(&self) -> &'static [&'static [TokenPattern]] {
        EXPRESSION
    }

    fn parse(&self, p: &mut Parser<'_>, tag: TagId, line: u32) -> Result<NodeId, ParseError> {
        let expr = p.parse_expression()?;
        p.expect_tag_end()?;
        Ok(p.alloc_tag(tag, vec![expr], AuxData::new(), line))
    }

    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<(), CompileError> {
        let expr = only_child(c, node, PRINT_TAG)?;
        let aux = c.aux(node)?;

        if aux.bool_or("text", false) {
            let text = c.node(expr)?;
            let NodeKind::Data(DataValue::String(text)) = &text.kind else {
                return Err(CompileError::bad_layout(PRINT_TAG, "text is not a string", text.line));
            };
            c.writeln(&format!("__out.write_str({text:?});"));
            return Ok(());
        }

        let value = c.expression(expr)?;
        if aux.bool_or("safe", false) {
            c.writeln(&format!("__out.write_value(&{value});"));
        } else {
            c.writeln(&format!("__out.write_escaped(&{value});"));
        }
        Ok(())
    }
}
