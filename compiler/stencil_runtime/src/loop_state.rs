use crate::Value;

/// Iteration state exposed to templates as `loop`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoopState {
    index0: usize,
    length: usize,
}

impl LoopState {
    /// State before the first iteration of a loop over `length` items.
    pub fn new(length: usize) -> Self {
        LoopState { index0: 0, length }
    }

    /// State of iteration `index0`.
    pub fn at(index0: usize, length: usize) -> Self {
        LoopState { index0, length }
    }

    pub fn advance(&mut self) {
        self.index0 += 1;
    }

    pub fn is_first(&self) -> bool {
        self.index0 == 0
    }

    pub fn is_last(&self) -> bool {
        self.index0 + 1 == self.length
    }

    /// `{index, index0, revindex, revindex0, first, last, length}`.
    pub fn to_value(&self) -> Value {
        let revindex0 = self.length.saturating_sub(self.index0 + 1);
        [
            ("index", Value::from(self.index0 + 1)),
            ("index0", Value::from(self.index0)),
            ("revindex", Value::from(revindex0 + 1)),
            ("revindex0", Value::from(revindex0)),
            ("first", Value::Bool(self.is_first())),
            ("last", Value::Bool(self.is_last())),
            ("length", Value::from(self.length)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}
