//! Auxiliary node data.
//!
//! Tags stash their parse-time details (loop variable names, branch
//! counts) here, and optimizer passes add annotations the code generator
//! reads back (`needs_temp`, `safe`, ...).

use rustc_hash::FxHashMap;

/// A value stored in a node's auxiliary map.
#[derive(Clone, PartialEq, Debug)]
pub enum AuxValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl From<bool> for AuxValue {
    fn from(value: bool) -> Self {
        AuxValue::Bool(value)
    }
}

impl From<i64> for AuxValue {
    fn from(value: i64) -> Self {
        AuxValue::Int(value)
    }
}

impl From<&str> for AuxValue {
    fn from(value: &str) -> Self {
        AuxValue::Str(value.to_string())
    }
}

impl From<String> for AuxValue {
    fn from(value: String) -> Self {
        AuxValue::Str(value)
    }
}

impl From<Vec<String>> for AuxValue {
    fn from(value: Vec<String>) -> Self {
        AuxValue::List(value)
    }
}

/// String-keyed auxiliary data attached to one node.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct AuxData {
    entries: FxHashMap<String, AuxValue>,
}

impl AuxData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AuxValue> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AuxValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AuxValue> {
        self.entries.remove(key)
    }

    /// Boolean entry, or `default` if absent or of another type.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.entries.get(key) {
            Some(AuxValue::Bool(b)) => *b,
            _ => default,
        }
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.entries.get(key) {
            Some(AuxValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(AuxValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.entries.get(key) {
            Some(AuxValue::List(items)) => Some(items),
            _ => None,
        }
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AuxValue)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_unstable_by_key(|(k, _)| *k);
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
