//! Tag strategy trait and the tag registry.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use stencil_ir::{NodeId, TagId};

use super::RegistryError;
use crate::codegen::{CompileError, Compiler};
use crate::parse::{ParseError, Parser, StateKind, TokenPattern};

/// A template tag (`if`, `for`, ...).
///
/// The parser consumes `{%` and the keyword, checks the upcoming tokens
/// against [`grammar`](Tag::grammar), then hands over to
/// [`parse`](Tag::parse), which consumes everything up to and including the
/// tag's final `%}` and returns the tag node. Block tags open a parser state
/// for their body; continuation and ending keywords are only recognized while
/// that state is on top.
pub trait Tag: Send + Sync {
    fn keyword(&self) -> &'static str;

    /// Alternative token sequences accepted right after the keyword. Empty
    /// means no check.
    fn grammar(&self) -> &'static [&'static [TokenPattern]] {
        &[]
    }

    /// Keywords that split the body into branches (`else`, `case`, ...).
    fn continuation_keywords(&self) -> &'static [&'static str] {
        &[]
    }

    /// Keyword closing the block (`endif`), or `None` for inline tags.
    fn ending_keyword(&self) -> Option<&'static str> {
        None
    }

    /// State pushed while the body is parsed; [`StateKind::Block`] for
    /// block tags without a dedicated state.
    fn block_state(&self) -> Option<StateKind> {
        self.ending_keyword().map(|_| StateKind::Block)
    }

    /// Repeating tags get loop-context annotations from the optimizer.
    fn is_repeating(&self) -> bool {
        false
    }

    /// Tags whose body compiles into a separate output unit.
    fn opens_unit(&self) -> bool {
        false
    }

    fn parse(&self, parser: &mut Parser<'_>, tag: TagId, line: u32) -> Result<NodeId, ParseError>;

    /// Emit the opening code, including the code of any branches.
    fn compile(&self, compiler: &mut Compiler<'_>, node: NodeId) -> Result<(), CompileError>;

    /// Emit the closing code.
    fn compile_ending(&self, compiler: &mut Compiler<'_>, node: NodeId) -> Result<(), CompileError> {
        let _ = (compiler, node);
        Ok(())
    }
}

#[derive(Default)]
pub struct TagRegistry {
    tags: Vec<Box<dyn Tag>>,
    by_keyword: FxHashMap<&'static str, TagId>,
    /// Continuation and ending keywords, with the tags that own them.
    block_keywords: FxHashMap<&'static str, SmallVec<[TagId; 2]>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tag: Box<dyn Tag>) -> Result<TagId, RegistryError> {
        let keyword = tag.keyword();
        if self.by_keyword.contains_key(keyword) {
            return Err(RegistryError::duplicate_tag(keyword));
        }
        let id = TagId::new(u32::try_from(self.tags.len()).unwrap_or(u32::MAX));
        for kw in tag.continuation_keywords().iter().chain(tag.ending_keyword().iter()) {
            self.block_keywords.entry(*kw).or_default().push(id);
        }
        self.by_keyword.insert(keyword, id);
        self.tags.push(tag);
        Ok(id)
    }

    pub fn lookup(&self, keyword: &str) -> Option<TagId> {
        self.by_keyword.get(keyword).copied()
    }

    #[inline]
    pub fn get(&self, id: TagId) -> &dyn Tag {
        &*self.tags[id.index()]
    }

    /// Whether `keyword` continues or ends some block tag.
    pub fn is_block_keyword(&self, keyword: &str) -> bool {
        self.block_keywords.contains_key(keyword)
    }

    /// Whether `keyword` continues or ends the block opened by `owner`.
    pub fn owns_keyword(&self, owner: &str, keyword: &str) -> bool {
        self.block_keywords
            .get(keyword)
            .is_some_and(|owners| owners.iter().any(|id| self.get(*id).keyword() == owner))
    }

    pub fn is_ending_keyword(&self, keyword: &str) -> bool {
        self.tags
            .iter()
            .any(|t| t.ending_keyword() == Some(keyword))
    }

    /// Every word that lexes as a keyword after `{%`.
    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_keyword
            .keys()
            .copied()
            .chain(self.block_keywords.keys().copied())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
