//! Expression parsing.
//!
//! Precedence climbing over the binary table of the operator registry.
//! Operators are recognized through the alias tries, so a multi-word alias
//! is consumed as a unit and always resolves to the longest registered
//! match.
//!
//! Bracket disambiguation happens at the opening symbol: `[` in operand
//! position starts an array literal, after an operand it indexes; `(` right
//! after a name starts a call, anywhere else it groups.

use stencil_ir::{Callee, DataValue, NodeId, NodeKind, Operands, Token, TokenKind};
use stencil_stack::ensure_sufficient_stack;

use super::{ParseError, Parser, StateKind, TokenPattern};
use crate::registry::{Arity, Associativity};

const CLOSE_PAREN: TokenPattern = TokenPattern::Exact(TokenKind::Punctuation, ")");
const CLOSE_BRACKET: TokenPattern = TokenPattern::Exact(TokenKind::Punctuation, "]");

fn is_word(token: &Token) -> bool {
    token
        .value
        .starts_with(|c: char| c.is_alphabetic() || c == '_')
}

impl Parser<'_> {
    /// Parse a full expression.
    pub fn parse_expression(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<NodeId, ParseError> {
        ensure_sufficient_stack(|| self.parse_binary_inner(min_precedence))
    }

    fn parse_binary_inner(&mut self, min_precedence: u8) -> Result<NodeId, ParseError> {
        let operators = &self.registries().operators;
        let mut left = self.parse_unary()?;
        // The last non-associative operator at this level.
        let mut non_assoc: Option<(u8, &str)> = None;

        loop {
            let Some((id, len)) = operators.match_binary(self.stream.remaining()) else {
                let token = self.stream.current();
                if token.kind == TokenKind::Operator && !is_word(token) {
                    return Err(ParseError::unknown_operator(token));
                }
                break;
            };
            let def = operators.get(id);
            if def.precedence < min_precedence {
                break;
            }
            let line = self.stream.current().line;
            if let Some((precedence, earlier)) = non_assoc {
                if precedence == def.precedence {
                    return Err(ParseError::chained_non_associative(earlier, &def.name, line));
                }
            }
            self.stream.skip(len);

            let mut operands = Operands {
                left: Some(left),
                ..Operands::default()
            };
            match def.arity {
                Arity::Binary => {
                    let next = match def.associativity {
                        Associativity::Right => def.precedence,
                        Associativity::Left | Associativity::None => def.precedence.saturating_add(1),
                    };
                    operands.right = Some(self.parse_binary(next)?);
                }
                Arity::Test {
                    takes_argument: true,
                } => operands.right = Some(self.parse_binary(def.precedence.saturating_add(1))?),
                Arity::Ternary => {
                    operands.middle = Some(self.parse_binary(0)?);
                    self.stream.expect(TokenKind::Punctuation, Some(":"))?;
                    operands.right = Some(self.parse_binary(def.precedence)?);
                }
                Arity::Test {
                    takes_argument: false,
                }
                | Arity::UnaryPrefix => {}
            }
            left = self.alloc(
                NodeKind::Operator {
                    operator: id,
                    operands,
                },
                line,
            );
            non_assoc = (def.associativity == Associativity::None)
                .then_some((def.precedence, def.name.as_str()));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        let operators = &self.registries().operators;
        if let Some((id, len)) = operators.match_unary(self.stream.remaining()) {
            let line = self.stream.current().line;
            self.stream.skip(len);
            let operand = self.parse_binary(operators.get(id).precedence)?;
            return Ok(self.alloc(
                NodeKind::Operator {
                    operator: id,
                    operands: Operands {
                        right: Some(operand),
                        ..Operands::default()
                    },
                },
                line,
            ));
        }
        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let token = self.stream.current().clone();
        match token.kind {
            TokenKind::Literal => {
                self.stream.skip(1);
                let value = Self::literal(&token)?;
                Ok(self.alloc(NodeKind::Data(value), token.line))
            }
            TokenKind::String => {
                self.stream.skip(1);
                Ok(self.alloc(NodeKind::Data(DataValue::String(token.value)), token.line))
            }
            // An operator word that starts no prefix operator is just a name.
            TokenKind::Identifier | TokenKind::Operator if is_word(&token) => {
                self.stream.skip(1);
                if self.stream.current().is_punct("(") {
                    self.parse_call(token, None)
                } else {
                    Ok(self.alloc(NodeKind::Variable(token.value), token.line))
                }
            }
            TokenKind::Punctuation if token.value == "(" => {
                self.stream.skip(1);
                self.open(StateKind::Expression, "(", token.line);
                let inner = self.parse_expression()?;
                self.close(StateKind::Expression, "(", CLOSE_PAREN)?;
                Ok(inner)
            }
            TokenKind::Punctuation if token.value == "[" => {
                self.stream.skip(1);
                self.stream.push_token(TokenKind::ArgumentListStart, "[");
                let items = self.parse_arguments()?;
                Ok(self.alloc(NodeKind::Data(DataValue::List(items)), token.line))
            }
            _ => Err(ParseError::expected_expression(&token)),
        }
    }

    /// Indexing, attribute access and method calls after an operand.
    fn parse_postfix(&mut self, mut base: NodeId) -> Result<NodeId, ParseError> {
        loop {
            let token = self.stream.current().clone();
            if token.is_punct("[") {
                self.stream.skip(1);
                self.open(StateKind::Array, "[", token.line);
                let index = self.parse_expression()?;
                self.close(StateKind::Array, "[", CLOSE_BRACKET)?;
                base = self.alloc(NodeKind::ArrayIndex { base, index }, token.line);
            } else if token.is_punct(".") {
                self.stream.skip(1);
                let name = self.stream.current().clone();
                let index = match name.kind {
                    TokenKind::Identifier | TokenKind::Operator if is_word(&name) => {
                        self.stream.skip(1);
                        if self.stream.current().is_punct("(") {
                            base = self.parse_call(name, Some(base))?;
                            continue;
                        }
                        NodeKind::Identifier(name.value)
                    }
                    TokenKind::Literal if name.value.bytes().all(|b| b.is_ascii_digit()) => {
                        self.stream.skip(1);
                        NodeKind::Data(Self::literal(&name)?)
                    }
                    _ => return Err(ParseError::unexpected("attribute name", &name)),
                };
                let index = self.alloc(index, name.line);
                base = self.alloc(NodeKind::ArrayIndex { base, index }, token.line);
            } else {
                return Ok(base);
            }
        }
    }

    /// `name(args)` or `receiver.name(args)`; the current token is `(`.
    fn parse_call(&mut self, name: Token, receiver: Option<NodeId>) -> Result<NodeId, ParseError> {
        self.stream.skip(1);
        self.stream.push_token(TokenKind::ArgumentListStart, "(");
        let args = self.parse_arguments()?;
        let callee = match (receiver, self.registries().functions.lookup(&name.value)) {
            (None, Some(id)) => Callee::Resolved(id),
            _ => Callee::Named(name.value),
        };
        Ok(self.alloc(
            NodeKind::Function {
                callee,
                receiver,
                args,
            },
            name.line,
        ))
    }

    /// Comma-separated expressions after a synthetic `ArgumentListStart`,
    /// closed by the bracket matching the one it replaced.
    fn parse_arguments(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let start = self.stream.expect(TokenKind::ArgumentListStart, None)?;
        let closer = if start.value == "[" {
            CLOSE_BRACKET
        } else {
            CLOSE_PAREN
        };
        self.open(StateKind::ArgumentList, &start.value, start.line);

        let mut args = Vec::new();
        while !self.stream.test(&[closer]) {
            args.push(self.parse_expression()?);
            if !self.stream.current().is_punct(",") {
                break;
            }
            self.stream.skip(1);
        }
        self.close(StateKind::ArgumentList, &start.value, closer)?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests;
