//! Token types produced by the tokenizer.

use std::fmt;

/// Token classification.
///
/// The tokenizer only distinguishes lexical classes. Whether an `Operator`
/// token starts a unary or binary operator, or whether `(` starts a call or
/// a group, is decided by the parser.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Literal template text outside any delimiter.
    Text,
    /// Opening tag delimiter (`{%`).
    TagStart,
    /// Closing tag delimiter (`%}`).
    TagEnd,
    /// Opening expression delimiter (`{{`).
    ExpressionStart,
    /// Closing expression delimiter (`}}`).
    ExpressionEnd,
    /// A name that is not a keyword, literal or operator word.
    Identifier,
    /// A registered tag keyword in tag position.
    Keyword,
    /// A registered operator symbol, or one word of a keyword operator.
    Operator,
    /// Number, `true`, `false` or `null`.
    Literal,
    /// Quoted string, with escapes already processed.
    String,
    /// One of `( ) [ ] , : . =`.
    Punctuation,
    /// Synthetic start of an argument list, injected by the parser.
    ArgumentListStart,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Text => "text",
            TokenKind::TagStart => "tag opener",
            TokenKind::TagEnd => "tag closer",
            TokenKind::ExpressionStart => "expression opener",
            TokenKind::ExpressionEnd => "expression closer",
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::Operator => "operator",
            TokenKind::Literal => "literal",
            TokenKind::String => "string",
            TokenKind::Punctuation => "punctuation",
            TokenKind::ArgumentListStart => "argument list",
            TokenKind::Eof => "end of template",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token with its 1-based source line.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: u32,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, value: impl Into<String>, line: u32) -> Self {
        Token {
            kind,
            value: value.into(),
            line,
        }
    }

    /// End-of-input marker.
    pub fn eof(line: u32) -> Self {
        Token::new(TokenKind::Eof, "", line)
    }

    /// Check kind and, when given, exact value.
    #[inline]
    pub fn is(&self, kind: TokenKind, value: Option<&str>) -> bool {
        self.kind == kind && value.map_or(true, |v| self.value == v)
    }

    /// Check for punctuation with the given text.
    #[inline]
    pub fn is_punct(&self, value: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.value == value
    }

    /// A word-like token (identifier, keyword or operator word) with this text.
    pub fn is_word(&self, value: &str) -> bool {
        matches!(
            self.kind,
            TokenKind::Identifier | TokenKind::Keyword | TokenKind::Operator
        ) && self.value == value
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}) @ {}", self.kind, self.value, self.line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end of template"),
            TokenKind::Text => f.write_str("text"),
            TokenKind::String => write!(f, "string {:?}", self.value),
            kind => write!(f, "{kind} `{}`", self.value),
        }
    }
}
