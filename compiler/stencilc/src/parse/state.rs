//! The parser's grammar-state stack.

use std::fmt;

use super::ParseError;

/// What kind of construct a state belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StateKind {
    /// Template text between tags.
    Text,
    /// `{{ ... }}` or a parenthesized group.
    Expression,
    /// Call arguments or an array literal.
    ArgumentList,
    /// `base[index]`.
    Array,
    BlockIf,
    BlockFor,
    BlockSwitch,
    BlockTemplate,
    /// Body of any other block tag.
    Block,
}

impl StateKind {
    pub fn is_block(self) -> bool {
        matches!(
            self,
            StateKind::BlockIf
                | StateKind::BlockFor
                | StateKind::BlockSwitch
                | StateKind::BlockTemplate
                | StateKind::Block
        )
    }
}

/// One open construct: its kind, a label (the tag keyword, or the closing
/// punctuation for expressions) and the line it was opened on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParserState {
    pub kind: StateKind,
    pub label: String,
    pub line: u32,
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` opened on line {}", self.label, self.line)
    }
}

#[derive(Debug, Default)]
pub struct StateStack {
    states: Vec<ParserState>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: StateKind, label: impl Into<String>, line: u32) {
        self.states.push(ParserState {
            kind,
            label: label.into(),
            line,
        });
    }

    /// Pop the innermost state, which must be `kind` labelled `label`.
    ///
    /// A mismatch means a closer met the wrong opener; it is reported as an
    /// unexpected closing construct at `line`.
    pub fn pop(&mut self, kind: StateKind, label: &str, line: u32) -> Result<ParserState, ParseError> {
        match self.states.last() {
            Some(top) if top.kind == kind && top.label == label => {}
            Some(top) => {
                return Err(ParseError::unexpected_closing(
                    label,
                    line,
                    Some((top.label.as_str(), top.line)),
                ))
            }
            None => return Err(ParseError::unexpected_closing(label, line, None)),
        }
        self.states
            .pop()
            .ok_or_else(|| ParseError::unexpected_closing(label, line, None))
    }

    pub fn top(&self) -> Option<&ParserState> {
        self.states.last()
    }

    /// The innermost block state.
    pub fn innermost_block(&self) -> Option<&ParserState> {
        self.states.iter().rev().find(|s| s.kind.is_block())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
