//! Parse error type.
//!
//! Every parse failure is fatal and carries the line it was detected on.
//! Errors about constructs that were opened elsewhere (an unterminated
//! `if`, a mismatched closer) also remember where that construct began, so
//! the diagnostic can point at both places.

use std::fmt;

use stencil_diagnostic::{Diagnostic, ErrorCode};
use stencil_ir::Token;

/// A fatal parse error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub line: u32,
    label: String,
    related: Option<(u32, String)>,
    help: Option<String>,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, line: u32) -> Self {
        let message = message.into();
        ParseError {
            code,
            label: message.clone(),
            message,
            line,
            related: None,
            help: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_related(mut self, line: u32, message: impl Into<String>) -> Self {
        self.related = Some((line, message.into()));
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// `expected X, found Y`.
    pub fn unexpected(expected: &str, found: &Token) -> Self {
        ParseError::new(
            ErrorCode::E1001,
            format!("expected {expected}, found {found}"),
            found.line,
        )
        .with_label(format!("expected {expected}"))
    }

    pub fn expected_expression(found: &Token) -> Self {
        ParseError::new(
            ErrorCode::E1002,
            format!("expected an expression, found {found}"),
            found.line,
        )
        .with_label("expression expected here")
    }

    /// A construct still open at end of input.
    pub fn unterminated(construct: &str, opened_at: u32, found_at: u32) -> Self {
        ParseError::new(
            ErrorCode::E1003,
            format!("unterminated `{construct}` opened on line {opened_at}"),
            found_at,
        )
        .with_label("template ends here")
        .with_related(opened_at, format!("`{construct}` opened here"))
    }

    /// A closer that does not match the innermost open construct.
    pub fn unexpected_closing(closer: &str, line: u32, innermost: Option<(&str, u32)>) -> Self {
        let err = ParseError::new(
            ErrorCode::E1004,
            format!("unexpected closing construct `{closer}`"),
            line,
        );
        match innermost {
            Some((construct, opened_at)) => err
                .with_label(format!("`{construct}` is still open"))
                .with_related(opened_at, format!("innermost open construct `{construct}`")),
            None => err.with_label("nothing is open here"),
        }
    }

    pub fn unknown_tag(name: &str, line: u32) -> Self {
        ParseError::new(ErrorCode::E1005, format!("unknown tag `{name}`"), line)
            .with_label("not a registered tag")
            .with_help("register the tag through an extension, or configure a fallback tag")
    }

    pub fn continuation_outside(keyword: &str, line: u32) -> Self {
        ParseError::new(
            ErrorCode::E1006,
            format!("`{keyword}` is not valid outside the block that owns it"),
            line,
        )
    }

    /// `earlier` is non-associative and `next` shares its precedence.
    pub fn chained_non_associative(earlier: &str, next: &str, line: u32) -> Self {
        let message = if earlier == next {
            format!("operator `{earlier}` cannot be chained")
        } else {
            format!("operator `{earlier}` cannot be chained with `{next}`")
        };
        ParseError::new(ErrorCode::E1007, message, line)
        .with_help("add parentheses to make the grouping explicit")
    }

    pub fn switch_branch(found: &Token) -> Self {
        ParseError::new(
            ErrorCode::E1008,
            format!("switch branches must start with `case` or `default`, found {found}"),
            found.line,
        )
    }

    pub fn unknown_operator(found: &Token) -> Self {
        ParseError::new(
            ErrorCode::E1009,
            format!("`{}` is not a binary operator", found.value),
            found.line,
        )
    }

    pub fn grammar_mismatch(tag: &str, alternatives: &[String], found: &Token) -> Self {
        ParseError::new(
            ErrorCode::E1010,
            format!(
                "`{tag}` expected one of: {}; found {found}",
                alternatives.join(", ")
            ),
            found.line,
        )
        .with_label(format!("invalid arguments to `{tag}`"))
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.line, self.label.clone());
        if let Some((line, message)) = &self.related {
            diag = diag.with_secondary_label(*line, message.clone());
        }
        if let Some(help) = &self.help {
            diag = diag.with_suggestion(help.clone());
        }
        diag
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {})", self.message, self.line)
    }
}

impl std::error::Error for ParseError {}
