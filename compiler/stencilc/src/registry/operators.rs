//! Operator definitions and the operator registry.

use std::fmt;
use std::sync::Arc;

use stencil_ir::{NodeId, OperatorId, Token};

use super::alias_trie::AliasTrie;
use super::RegistryError;
use crate::codegen::{CompileError, Compiler};

/// Words that always lex as literals and so can never be part of an alias.
const RESERVED_WORDS: &[&str] = &["true", "false", "null"];

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Associativity {
    Left,
    Right,
    /// `a < b < c` is rejected.
    None,
}

/// How many operands an operator takes and where they go.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Arity {
    /// `left op right`.
    Binary,
    /// `op right`.
    UnaryPrefix,
    /// `left is op`, plus `right` when the test takes an argument.
    Test { takes_argument: bool },
    /// `left ? middle : right`.
    Ternary,
}

impl Arity {
    pub fn is_unary(self) -> bool {
        matches!(self, Arity::UnaryPrefix)
    }
}

/// Code generation strategy of an operator.
///
/// Produces a Rust expression of type `Value`. The strategy pulls its
/// operands through [`Compiler::operand`], which reports a missing slot, and
/// parenthesizes whatever it needs itself.
pub trait CompileOperator: Send + Sync {
    fn compile(&self, compiler: &mut Compiler<'_>, node: NodeId) -> Result<String, CompileError>;
}

/// Wraps the positive form of an operator in a logical negation.
pub struct Negate(pub Arc<dyn CompileOperator>);

impl CompileOperator for Negate {
    fn compile(&self, compiler: &mut Compiler<'_>, node: NodeId) -> Result<String, CompileError> {
        let positive = self.0.compile(compiler, node)?;
        Ok(format!("Value::Bool(!({positive}).is_truthy())"))
    }
}

/// An operator as registered by an extension.
#[derive(Clone)]
pub struct OperatorDefinition {
    pub name: String,
    pub aliases: Vec<String>,
    pub precedence: u8,
    pub associativity: Associativity,
    pub arity: Arity,
    pub strategy: Arc<dyn CompileOperator>,
}

impl OperatorDefinition {
    pub fn new(
        name: &str,
        aliases: &[&str],
        precedence: u8,
        associativity: Associativity,
        arity: Arity,
        strategy: impl CompileOperator + 'static,
    ) -> Self {
        OperatorDefinition {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
            precedence,
            associativity,
            arity,
            strategy: Arc::new(strategy),
        }
    }

    pub fn binary(
        name: &str,
        aliases: &[&str],
        precedence: u8,
        associativity: Associativity,
        strategy: impl CompileOperator + 'static,
    ) -> Self {
        Self::new(name, aliases, precedence, associativity, Arity::Binary, strategy)
    }

    pub fn unary(
        name: &str,
        aliases: &[&str],
        precedence: u8,
        strategy: impl CompileOperator + 'static,
    ) -> Self {
        Self::new(
            name,
            aliases,
            precedence,
            Associativity::Right,
            Arity::UnaryPrefix,
            strategy,
        )
    }

    pub fn test(
        name: &str,
        aliases: &[&str],
        precedence: u8,
        takes_argument: bool,
        strategy: impl CompileOperator + 'static,
    ) -> Self {
        Self::new(
            name,
            aliases,
            precedence,
            Associativity::Left,
            Arity::Test { takes_argument },
            strategy,
        )
    }

    /// The negated counterpart: a separate definition with the same arity,
    /// precedence and associativity whose code negates this one's.
    pub fn negated(&self, name: &str, aliases: &[&str]) -> Self {
        OperatorDefinition {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
            precedence: self.precedence,
            associativity: self.associativity,
            arity: self.arity,
            strategy: Arc::new(Negate(Arc::clone(&self.strategy))),
        }
    }
}

impl fmt::Debug for OperatorDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorDefinition")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("precedence", &self.precedence)
            .field("associativity", &self.associativity)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

fn is_word(piece: &str) -> bool {
    piece
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
}

/// All registered operators, with one alias trie for prefix operators and
/// one for everything that follows an operand.
#[derive(Debug, Default)]
pub struct OperatorRegistry {
    definitions: Vec<OperatorDefinition>,
    unary: AliasTrie,
    binary: AliasTrie,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: OperatorDefinition) -> Result<OperatorId, RegistryError> {
        let id = OperatorId::new(u32::try_from(self.definitions.len()).unwrap_or(u32::MAX));
        let (table, trie) = if definition.arity.is_unary() {
            ("unary", &mut self.unary)
        } else {
            ("binary", &mut self.binary)
        };
        for alias in &definition.aliases {
            let words: Vec<&str> = alias.split_whitespace().collect();
            if let Some(word) = words.iter().find(|w| RESERVED_WORDS.contains(w)) {
                return Err(RegistryError::reserved_word(alias, word));
            }
            if let Err(existing) = trie.insert(&words, id) {
                let owner = self
                    .definitions
                    .get(existing.index())
                    .map_or(definition.name.as_str(), |d| d.name.as_str());
                return Err(RegistryError::duplicate_alias(alias, table, owner));
            }
        }
        self.definitions.push(definition);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: OperatorId) -> &OperatorDefinition {
        &self.definitions[id.index()]
    }

    /// Longest prefix operator alias at the front of `tokens`.
    pub fn match_unary(&self, tokens: &[Token]) -> Option<(OperatorId, usize)> {
        self.unary.longest_match(tokens)
    }

    /// Longest binary, test or ternary alias at the front of `tokens`.
    pub fn match_binary(&self, tokens: &[Token]) -> Option<(OperatorId, usize)> {
        self.binary.longest_match(tokens)
    }

    pub fn starts_unary(&self, word: &str) -> bool {
        self.unary.starts_with(word)
    }

    pub fn starts_binary(&self, word: &str) -> bool {
        self.binary.starts_with(word)
    }

    fn alias_pieces(&self) -> impl Iterator<Item = &str> {
        self.definitions
            .iter()
            .flat_map(|d| d.aliases.iter())
            .flat_map(|a| a.split_whitespace())
    }

    /// Non-word alias pieces, for the tokenizer's symbol table.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.alias_pieces().filter(|p| !is_word(p))
    }

    /// Every word appearing in a keyword alias.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.alias_pieces().filter(|p| is_word(p))
    }

    pub fn iter(&self) -> impl Iterator<Item = (OperatorId, &OperatorDefinition)> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(i, d)| (OperatorId::new(u32::try_from(i).unwrap_or(u32::MAX)), d))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
