//! Lexer error type.

use std::fmt;

use stencil_diagnostic::{Diagnostic, ErrorCode};

/// What kind of lexer error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// A tag, expression or comment opener without its closer.
    UnterminatedDelimiter { construct: &'static str },
    /// Missing closing quote.
    UnterminatedString,
    /// A character that starts no token.
    InvalidCharacter(char),
}

/// A lexer error: the line it occurred on and the offending fragment.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: u32,
    pub fragment: String,
}

impl LexError {
    pub(crate) fn new(kind: LexErrorKind, line: u32, fragment: &str) -> Self {
        LexError {
            kind,
            line,
            fragment: fragment.chars().take(24).collect(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::InvalidCharacter(_) => ErrorCode::E0002,
            LexErrorKind::UnterminatedDelimiter { .. } => ErrorCode::E0003,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match &self.kind {
            LexErrorKind::UnterminatedDelimiter { construct } => {
                format!("{construct} opened here is never closed")
            }
            LexErrorKind::UnterminatedString => "string starts here".to_string(),
            LexErrorKind::InvalidCharacter(c) => format!("`{c}` is not valid here"),
        };
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(self.line, label)
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LexErrorKind::UnterminatedDelimiter { construct } => write!(
                f,
                "unterminated {construct} opened on line {} near `{}`",
                self.line, self.fragment
            ),
            LexErrorKind::UnterminatedString => write!(
                f,
                "unterminated string on line {} near `{}`",
                self.line, self.fragment
            ),
            LexErrorKind::InvalidCharacter(c) => write!(
                f,
                "invalid character `{c}` on line {} near `{}`",
                self.line, self.fragment
            ),
        }
    }
}

impl std::error::Error for LexError {}
