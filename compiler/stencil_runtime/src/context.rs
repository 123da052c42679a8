//! Variable scopes.

use rustc_hash::FxHashMap;

use crate::{RenderError, RenderResult, Value};

const MAX_INCLUDE_DEPTH: usize = 64;

/// Stack of variable scopes. Lookups search from the innermost scope out;
/// assignments always go to the innermost scope.
///
/// A loop nested in another loop can share its parent's scope: it takes a
/// [`Checkpoint`] instead of pushing a scope and rolls back to it afterwards,
/// which undoes every write made to that scope in between.
#[derive(Clone, Debug)]
pub struct Context {
    scopes: Vec<FxHashMap<String, Value>>,
    include_depth: usize,
    /// `(scope depth, name, previous value)` per write since the oldest
    /// open checkpoint.
    journal: Vec<(usize, String, Option<Value>)>,
    open_checkpoints: usize,
}

/// Position in a [`Context`]'s write journal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Checkpoint {
    journal_len: usize,
    depth: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Context {
            scopes: vec![FxHashMap::default()],
            include_depth: 0,
            journal: Vec::new(),
            open_checkpoints: 0,
        }
    }

    /// A context whose outermost scope holds the environment globals.
    pub fn with_globals(globals: &FxHashMap<String, Value>) -> Self {
        Context {
            scopes: vec![globals.clone()],
            include_depth: 0,
            journal: Vec::new(),
            open_checkpoints: 0,
        }
    }

    /// The value bound to `name`, or `null`.
    pub fn get(&self, name: &str) -> Value {
        self.lookup(name).cloned().unwrap_or_default()
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let depth = self.scopes.len();
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        let name = name.into();
        if self.open_checkpoints == 0 {
            scope.insert(name, value);
        } else {
            let previous = scope.insert(name.clone(), value);
            self.journal.push((depth, name, previous));
        }
    }

    /// Remove `name` from the innermost scope, returning its value there.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let depth = self.scopes.len();
        let scope = self.scopes.last_mut()?;
        let previous = scope.remove(name);
        if self.open_checkpoints > 0 && previous.is_some() {
            self.journal.push((depth, name.to_string(), previous.clone()));
        }
        previous
    }

    /// Start recording writes to the innermost scope.
    pub fn checkpoint(&mut self) -> Checkpoint {
        self.open_checkpoints += 1;
        Checkpoint {
            journal_len: self.journal.len(),
            depth: self.scopes.len(),
        }
    }

    /// Undo every write made to the checkpoint's scope since `checkpoint`.
    ///
    /// Writes to scopes pushed after the checkpoint are ignored; those
    /// scopes are gone once the matching pops have run.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        let start = checkpoint.journal_len.min(self.journal.len());
        let undo: Vec<_> = self.journal.drain(start..).rev().collect();
        let index = checkpoint.depth.checked_sub(1);
        if let Some(scope) = index.and_then(|i| self.scopes.get_mut(i)) {
            for (depth, name, previous) in undo {
                if depth != checkpoint.depth {
                    continue;
                }
                match previous {
                    Some(value) => scope.insert(name, value),
                    None => scope.remove(&name),
                };
            }
        }
        self.open_checkpoints = self.open_checkpoints.saturating_sub(1);
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Drop the innermost scope. The outermost scope is never dropped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub(crate) fn enter_include(&mut self, name: &str) -> RenderResult<()> {
        if self.include_depth >= MAX_INCLUDE_DEPTH {
            return Err(RenderError::IncludeDepth(name.to_string()));
        }
        self.include_depth += 1;
        Ok(())
    }

    pub(crate) fn leave_include(&mut self) {
        self.include_depth = self.include_depth.saturating_sub(1);
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut ctx = Context::new();
        for (k, v) in iter {
            ctx.set(k, v);
        }
        ctx
    }
}
