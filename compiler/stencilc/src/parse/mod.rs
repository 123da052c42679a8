//! Parser: tokens to AST.
//!
//! A state stack tracks every open construct. Its top decides what is legal
//! next: a continuation keyword such as `else` is only accepted while the
//! block that owns it is innermost, a `)` only closes an open `(`, and the
//! template only ends cleanly once everything has been closed again.
//!
//! Tags are parsed by their own [`Tag::parse`](crate::registry::Tag::parse)
//! routine, which drives the parser through the helpers below. Expressions
//! use precedence climbing over the operator registry (see `expr.rs`).

mod error;
mod expr;
mod state;
mod stream;

pub use error::ParseError;
pub use state::{ParserState, StateKind, StateStack};
pub use stream::{TokenPattern, TokenStream};

use stencil_diagnostic::ErrorCode;
use stencil_ir::{AuxData, DataValue, NodeArena, NodeId, NodeKind, TagId, Token, TokenKind};
use tracing::trace;

use crate::registry::{Registries, Tag};

/// Tokens that close something.
const CLOSERS: &[TokenPattern] = &[
    TokenPattern::Exact(TokenKind::Punctuation, ")"),
    TokenPattern::Exact(TokenKind::Punctuation, "]"),
    TokenPattern::Kind(TokenKind::ExpressionEnd),
    TokenPattern::Kind(TokenKind::TagEnd),
];

/// Keyword of the tag that renders `{{ }}` and template text.
pub const PRINT_TAG: &str = "print";

/// Parse a token sequence into a node arena.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(
    tokens: Vec<Token>,
    registries: &Registries,
    fallback_tag: Option<&str>,
) -> Result<NodeArena, ParseError> {
    Parser::new(tokens, registries, fallback_tag).parse_template()
}

pub struct Parser<'r> {
    stream: TokenStream,
    registries: &'r Registries,
    fallback_tag: Option<&'r str>,
    arena: NodeArena,
    states: StateStack,
}

impl<'r> Parser<'r> {
    pub fn new(tokens: Vec<Token>, registries: &'r Registries, fallback_tag: Option<&'r str>) -> Self {
        Parser {
            stream: TokenStream::new(tokens),
            registries,
            fallback_tag,
            arena: NodeArena::new(),
            states: StateStack::new(),
        }
    }

    pub fn parse_template(mut self) -> Result<NodeArena, ParseError> {
        self.states.push(StateKind::Text, "template", 1);
        let children = self.parse_body()?;
        let end = self.stream.current().line;
        self.states.pop(StateKind::Text, "template", end)?;
        debug_assert!(self.states.is_empty(), "state stack not empty at end of template");
        let root = self.arena.alloc(NodeKind::Root { children }, 1);
        self.arena.set_root(root);
        Ok(self.arena)
    }

    pub fn registries(&self) -> &'r Registries {
        self.registries
    }

    pub fn stream(&mut self) -> &mut TokenStream {
        &mut self.stream
    }

    #[inline]
    pub fn current(&self) -> &Token {
        self.stream.current()
    }

    pub fn alloc(&mut self, kind: NodeKind, line: u32) -> NodeId {
        self.arena.alloc(kind, line)
    }

    /// Allocate a tag node with its auxiliary data.
    pub fn alloc_tag(&mut self, tag: TagId, children: Vec<NodeId>, aux: AuxData, line: u32) -> NodeId {
        let id = self.arena.alloc(NodeKind::Tag { tag, children }, line);
        self.arena[id].aux = aux;
        id
    }

    pub fn states(&self) -> &StateStack {
        &self.states
    }

    /// Nodes of a body, up to a keyword the innermost block owns (left
    /// unconsumed) or the end of the template.
    fn parse_body(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut children = Vec::new();
        loop {
            match self.stream.current().kind {
                TokenKind::Eof => {
                    return match self.states.top() {
                        Some(top) if top.kind != StateKind::Text => Err(ParseError::unterminated(
                            &top.label,
                            top.line,
                            self.stream.current().line,
                        )),
                        _ => Ok(children),
                    };
                }
                TokenKind::Text => {
                    let text = self.stream.advance();
                    children.push(self.text_node(text)?);
                }
                TokenKind::ExpressionStart => children.push(self.parse_output()?),
                TokenKind::TagStart => {
                    let head = self.stream.peek(1);
                    if head.kind == TokenKind::Keyword
                        && self.registries.tags.is_block_keyword(&head.value)
                    {
                        if self.top_owns(&head.value) {
                            return Ok(children);
                        }
                        return Err(self.misplaced_keyword(&head.clone()));
                    }
                    children.push(self.parse_tag()?);
                }
                _ => {
                    return Err(ParseError::unexpected(
                        "text, tag or expression",
                        self.stream.current(),
                    ))
                }
            }
        }
    }

    fn top_owns(&self, keyword: &str) -> bool {
        self.states
            .top()
            .is_some_and(|s| s.kind.is_block() && self.registries.tags.owns_keyword(&s.label, keyword))
    }

    fn misplaced_keyword(&self, token: &Token) -> ParseError {
        if self.registries.tags.is_ending_keyword(&token.value) {
            let innermost = self
                .states
                .innermost_block()
                .map(|s| (s.label.as_str(), s.line));
            ParseError::unexpected_closing(&token.value, token.line, innermost)
        } else {
            ParseError::continuation_outside(&token.value, token.line)
        }
    }

    fn print_tag(&self, line: u32) -> Result<TagId, ParseError> {
        self.registries
            .tags
            .lookup(PRINT_TAG)
            .ok_or_else(|| ParseError::unknown_tag(PRINT_TAG, line))
    }

    fn text_node(&mut self, text: Token) -> Result<NodeId, ParseError> {
        let print = self.print_tag(text.line)?;
        let data = self
            .arena
            .alloc(NodeKind::Data(DataValue::String(text.value)), text.line);
        let mut aux = AuxData::new();
        aux.set("text", true);
        Ok(self.alloc_tag(print, vec![data], aux, text.line))
    }

    /// `{{ expression }}`, parsed as a `print` tag.
    fn parse_output(&mut self) -> Result<NodeId, ParseError> {
        let start = self.stream.advance();
        let print = self.print_tag(start.line)?;
        self.states.push(StateKind::Expression, "{{", start.line);
        let expr = self.parse_expression()?;
        self.close(
            StateKind::Expression,
            "{{",
            TokenPattern::Kind(TokenKind::ExpressionEnd),
        )?;
        Ok(self.alloc_tag(print, vec![expr], AuxData::new(), start.line))
    }

    /// `{% keyword ... %}`: resolve the tag, check its grammar, delegate.
    fn parse_tag(&mut self) -> Result<NodeId, ParseError> {
        let start = self.stream.expect(TokenKind::TagStart, None)?;
        let head = self.stream.current().clone();
        let registries = self.registries;

        let tag_id = if head.kind == TokenKind::Keyword {
            let id = registries
                .tags
                .lookup(&head.value)
                .ok_or_else(|| ParseError::unknown_tag(&head.value, head.line))?;
            self.stream.skip(1);
            id
        } else if let Some(fallback) = self.fallback_tag {
            registries
                .tags
                .lookup(fallback)
                .ok_or_else(|| ParseError::unknown_tag(fallback, head.line))?
        } else if head.kind == TokenKind::Identifier {
            return Err(ParseError::unknown_tag(&head.value, head.line));
        } else {
            return Err(ParseError::unexpected("tag name", &head));
        };

        let tag = registries.tags.get(tag_id);
        let grammar = tag.grammar();
        if !grammar.is_empty() && !grammar.iter().any(|alt| self.stream.test_sequence(alt)) {
            let alternatives: Vec<String> = grammar
                .iter()
                .map(|alt| {
                    alt.iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            return Err(ParseError::grammar_mismatch(
                tag.keyword(),
                &alternatives,
                self.stream.current(),
            ));
        }
        trace!(tag = tag.keyword(), line = start.line, "tag");
        tag.parse(self, tag_id, start.line)
    }

    /// Consume the `%}` ending the current tag.
    pub fn expect_tag_end(&mut self) -> Result<Token, ParseError> {
        self.stream.expect(TokenKind::TagEnd, None)
    }

    /// A plain name: identifier, or a word the tokenizer classified as an
    /// operator word.
    pub fn expect_name(&mut self, what: &str) -> Result<Token, ParseError> {
        let token = self.stream.current();
        let is_name = match token.kind {
            TokenKind::Identifier => true,
            TokenKind::Operator => token.value.starts_with(|c: char| c.is_alphabetic() || c == '_'),
            _ => false,
        };
        if is_name {
            Ok(self.stream.advance())
        } else {
            Err(ParseError::unexpected(what, token))
        }
    }

    /// Push the state for `tag`'s body.
    pub fn open_block(&mut self, tag: &dyn Tag, line: u32) {
        let kind = tag.block_state().unwrap_or(StateKind::Block);
        self.states.push(kind, tag.keyword(), line);
    }

    /// Pop the state pushed by [`open_block`](Self::open_block).
    pub fn close_block(&mut self, tag: &dyn Tag, line: u32) -> Result<(), ParseError> {
        let kind = tag.block_state().unwrap_or(StateKind::Block);
        self.states.pop(kind, tag.keyword(), line).map(|_| ())
    }

    /// A body as a `Block` node.
    pub fn parse_block(&mut self, line: u32) -> Result<NodeId, ParseError> {
        let children = self.parse_body()?;
        Ok(self.arena.alloc(NodeKind::Block { children }, line))
    }

    /// Consume `{%` and a keyword owned by the innermost block.
    ///
    /// Only called after [`parse_block`](Self::parse_block) returned, which
    /// stops exactly at such a keyword.
    pub fn next_branch(&mut self) -> Result<Token, ParseError> {
        self.stream.expect(TokenKind::TagStart, None)?;
        self.stream.expect(TokenKind::Keyword, None)
    }

    /// Skip text tokens that contain only whitespace; fail on other text.
    pub fn skip_blank_text(&mut self, on_text: impl Fn(&Token) -> ParseError) -> Result<(), ParseError> {
        while self.stream.current().kind == TokenKind::Text {
            if !self.stream.current().value.trim().is_empty() {
                return Err(on_text(self.stream.current()));
            }
            self.stream.skip(1);
        }
        Ok(())
    }

    /// Close the innermost construct with the token matching `closer`.
    ///
    /// Any other closing token is an unexpected closing construct; anything
    /// else is a plain unexpected token.
    pub fn close(&mut self, kind: StateKind, label: &str, closer: TokenPattern) -> Result<(), ParseError> {
        let token = self.stream.current();
        if closer.matches(token) {
            let line = token.line;
            self.states.pop(kind, label, line)?;
            self.stream.skip(1);
            return Ok(());
        }
        if CLOSERS.iter().any(|c| c.matches(token)) {
            let innermost = self.states.top().map(|s| (s.label.as_str(), s.line));
            return Err(ParseError::unexpected_closing(&token.value, token.line, innermost));
        }
        Err(ParseError::unexpected(&closer.to_string(), token))
    }

    pub fn open(&mut self, kind: StateKind, label: &str, line: u32) {
        self.states.push(kind, label, line);
    }

    fn literal(token: &Token) -> Result<DataValue, ParseError> {
        let value = match token.value.as_str() {
            "true" => DataValue::Bool(true),
            "false" => DataValue::Bool(false),
            "null" => DataValue::Null,
            text if text.contains('.') => text
                .parse()
                .map(DataValue::Float)
                .map_err(|_| invalid_number(token))?,
            text => text
                .parse()
                .map(DataValue::Int)
                .map_err(|_| invalid_number(token))?,
        };
        Ok(value)
    }
}

fn invalid_number(token: &Token) -> ParseError {
    ParseError::new(
        ErrorCode::E0004,
        format!("invalid number literal `{}`", token.value),
        token.line,
    )
}
