use std::fmt;

use stencil_diagnostic::{Diagnostic, ErrorCode};
use stencil_ir::Slot;

/// A code generation error.
///
/// The parser only builds well-formed trees, so these mostly surface
/// trees assembled by hand or by an extension tag with a bad layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileError {
    pub code: ErrorCode,
    pub message: String,
    pub line: u32,
}

impl CompileError {
    /// An operator node without an operand its arity requires.
    pub fn missing_operand(operator: &str, slot: Slot, line: u32) -> Self {
        CompileError {
            code: ErrorCode::E2001,
            message: format!("operator `{operator}` is missing its {} operand", slot.name()),
            line,
        }
    }

    /// A node whose shape does not fit where it appears.
    pub fn bad_layout(what: &str, message: impl fmt::Display, line: u32) -> Self {
        CompileError {
            code: ErrorCode::E2002,
            message: format!("malformed `{what}`: {message}"),
            line,
        }
    }

    /// Two names that differ only in characters an identifier cannot keep.
    pub fn identifier_collision(name: &str, other: &str, ident: &str, line: u32) -> Self {
        CompileError {
            code: ErrorCode::E2003,
            message: format!("`{name}` and `{other}` both compile to `{ident}`"),
            line,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.line, "while compiling this")
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {})", self.message, self.line)
    }
}

impl std::error::Error for CompileError {}
