use std::fmt;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled source line with a message.
///
/// Templates are reported by line: tokens carry no column information.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub line: u32,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the main error location).
    pub fn primary(line: u32, message: impl Into<String>) -> Self {
        Label {
            line,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related context, e.g. where a block opened).
    pub fn secondary(line: u32, message: impl Into<String>) -> Self {
        Label {
            line,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A diagnostic with everything needed to point a template author at the
/// offending source.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    pub severity: Severity,
    /// Main error message.
    pub message: String,
    /// Template name, when known.
    pub template: Option<String>,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            template: None,
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attribute the diagnostic to a template.
    pub fn with_template(mut self, name: impl Into<String>) -> Self {
        self.template = Some(name.into());
        self
    }

    /// Add a primary label at the error line.
    pub fn with_label(mut self, line: u32, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(line, message));
        self
    }

    /// Add a secondary label for context.
    pub fn with_secondary_label(mut self, line: u32, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(line, message));
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Line of the first primary label.
    pub fn primary_line(&self) -> Option<u32> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.line)
    }

    /// Check if this is an error (vs warning/note).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {marker} line {}: {}", label.line, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }

        Ok(())
    }
}

/// Create an "unclosed construct" diagnostic.
pub fn unclosed_construct(construct: &str, opened_at: u32, found_at: u32) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1003)
        .with_message(format!(
            "unterminated `{construct}` opened on line {opened_at}"
        ))
        .with_label(found_at, "template ends here")
        .with_secondary_label(opened_at, format!("`{construct}` opened here"))
}

/// Create an "unexpected token" diagnostic.
pub fn unexpected_token(line: u32, expected: &str, found: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(format!("expected {expected}, found {found}"))
        .with_label(line, format!("expected {expected}"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_builder_and_display() {
        let diag = Diagnostic::error(ErrorCode::E1005)
            .with_message("unknown tag `fi`")
            .with_label(3, "not a registered tag")
            .with_note("registered tags: if, for")
            .with_suggestion("did you mean `if`?");

        assert_eq!(diag.primary_line(), Some(3));
        assert!(diag.is_error());
        assert_eq!(
            diag.to_string(),
            "error [E1005]: unknown tag `fi`\n  --> line 3: not a registered tag\n  = note: registered tags: if, for\n  = help: did you mean `if`?"
        );
    }

    #[test]
    fn test_unclosed_construct_points_at_opening_line() {
        let diag = unclosed_construct("if", 2, 7);
        assert_eq!(diag.code, ErrorCode::E1003);
        assert!(diag.message.contains("`if`"));
        assert!(diag.message.contains("line 2"));
        assert_eq!(diag.labels[1], Label::secondary(2, "`if` opened here"));
    }
}
