//! Word trie for multi-word operator aliases.
//!
//! Each edge is one operator token (`is`, `not`, `divisible`, ...). A node
//! that completes an alias records the operator it resolves to. Lookup
//! walks as far as the upcoming tokens allow and keeps the deepest complete
//! alias, so `is not divisible by` wins over `is not` no matter which was
//! registered first.

use rustc_hash::FxHashMap;
use stencil_ir::{OperatorId, Token, TokenKind};

#[derive(Default, Debug)]
struct TrieNode {
    children: FxHashMap<String, usize>,
    operator: Option<OperatorId>,
}

/// Alias trie over operator tokens. Nodes live in a flat vector; index 0 is
/// the root.
#[derive(Debug)]
pub struct AliasTrie {
    nodes: Vec<TrieNode>,
}

impl Default for AliasTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl AliasTrie {
    pub fn new() -> Self {
        AliasTrie {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Insert an alias. Returns the operator already owning it, if any.
    pub fn insert(&mut self, words: &[&str], id: OperatorId) -> Result<(), OperatorId> {
        let mut at = 0;
        for word in words {
            at = match self.nodes[at].children.get(*word) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[at].children.insert((*word).to_string(), next);
                    next
                }
            };
        }
        match self.nodes[at].operator {
            Some(existing) => Err(existing),
            None => {
                self.nodes[at].operator = Some(id);
                Ok(())
            }
        }
    }

    /// Longest complete alias at the front of `tokens`.
    ///
    /// Returns the operator and the number of tokens its alias spans. Only
    /// `Operator` tokens take part in a match.
    pub fn longest_match<'t>(
        &self,
        tokens: impl IntoIterator<Item = &'t Token>,
    ) -> Option<(OperatorId, usize)> {
        let mut at = 0;
        let mut best = None;
        for (depth, token) in tokens.into_iter().enumerate() {
            if token.kind != TokenKind::Operator {
                break;
            }
            let Some(&next) = self.nodes[at].children.get(token.value.as_str()) else {
                break;
            };
            at = next;
            if let Some(id) = self.nodes[at].operator {
                best = Some((id, depth + 1));
            }
        }
        best
    }

    /// Whether some alias begins with `word`.
    pub fn starts_with(&self, word: &str) -> bool {
        self.nodes[0].children.contains_key(word)
    }
}
