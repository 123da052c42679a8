//! Token stream with lookahead and synthetic token injection.

use std::fmt;

use stencil_ir::{Token, TokenKind};

use super::ParseError;

/// A predicate over one token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenPattern {
    /// Any token of this kind.
    Kind(TokenKind),
    /// A token of this kind with exactly this text.
    Exact(TokenKind, &'static str),
    /// An identifier, keyword or operator word with this text.
    Word(&'static str),
    /// A token that can begin an expression.
    ExpressionStart,
}

impl TokenPattern {
    pub fn matches(self, token: &Token) -> bool {
        match self {
            TokenPattern::Kind(kind) => token.kind == kind,
            TokenPattern::Exact(kind, value) => token.is(kind, Some(value)),
            TokenPattern::Word(value) => token.is_word(value),
            TokenPattern::ExpressionStart => match token.kind {
                TokenKind::Identifier
                | TokenKind::Operator
                | TokenKind::Literal
                | TokenKind::String
                | TokenKind::ArgumentListStart => true,
                TokenKind::Punctuation => token.value == "(" || token.value == "[",
                _ => false,
            },
        }
    }
}

impl fmt::Display for TokenPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPattern::Kind(kind) => f.write_str(kind.describe()),
            TokenPattern::Exact(_, value) | TokenPattern::Word(value) => write!(f, "`{value}`"),
            TokenPattern::ExpressionStart => f.write_str("expression"),
        }
    }
}

/// Owns the tokens of one template and a cursor into them.
///
/// The last token is always `Eof`; reads past the end keep returning it.
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::eof(line));
        }
        TokenStream { tokens, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The next unconsumed token.
    #[inline]
    pub fn current(&self) -> &Token {
        self.peek(0)
    }

    /// The token `offset` places after the current one.
    pub fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    /// Unconsumed tokens, `Eof` included.
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.pos.min(self.tokens.len() - 1)..]
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    /// Consume and return the current token.
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        self.skip(1);
        token
    }

    pub fn skip(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.tokens.len() - 1);
    }

    /// Does the current token match any of `patterns`? Never consumes.
    pub fn test(&self, patterns: &[TokenPattern]) -> bool {
        patterns.iter().any(|p| p.matches(self.current()))
    }

    pub fn test_at(&self, offset: usize, pattern: TokenPattern) -> bool {
        pattern.matches(self.peek(offset))
    }

    /// Do the upcoming tokens match `sequence`, one pattern per token?
    pub fn test_sequence(&self, sequence: &[TokenPattern]) -> bool {
        sequence
            .iter()
            .enumerate()
            .all(|(offset, pattern)| self.test_at(offset, *pattern))
    }

    /// Consume a token of `kind` (and `value`, when given) or fail.
    pub fn expect(&mut self, kind: TokenKind, value: Option<&str>) -> Result<Token, ParseError> {
        if self.current().is(kind, value) {
            return Ok(self.advance());
        }
        let expected = match value {
            Some(v) => format!("`{v}`"),
            None => kind.describe().to_string(),
        };
        Err(ParseError::unexpected(&expected, self.current()))
    }

    /// Consume a token matching one of `patterns`, or fail listing them all.
    pub fn expect_one_of(&mut self, patterns: &[TokenPattern]) -> Result<Token, ParseError> {
        if self.test(patterns) {
            return Ok(self.advance());
        }
        let expected = match patterns {
            [single] => single.to_string(),
            _ => format!(
                "one of: {}",
                patterns
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        Err(ParseError::unexpected(&expected, self.current()))
    }

    /// Insert a synthetic token; it becomes the current token.
    pub fn push_token(&mut self, kind: TokenKind, value: &str) {
        let line = self.current().line;
        self.tokens.insert(self.pos, Token::new(kind, value, line));
    }
}
