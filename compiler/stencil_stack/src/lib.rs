//! Stack growth for recursive descent.
//!
//! The expression parser and the code generator recurse once per nesting
//! level of the template. Deeply nested parentheses or tags (generated
//! templates can easily reach thousands of levels) would otherwise overflow
//! the native stack.
//!
//! Wrap each recursive entry point with [`ensure_sufficient_stack`]:
//!
//! ```text
//! fn parse_precedence(&mut self, min: u8) -> Result<NodeId, ParseError> {
//!     ensure_sufficient_stack(|| self.parse_precedence_inner(min))
//! }
//! ```

/// Grow when less than this much stack remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (2MB).
const GROWTH: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

/// WASM manages its own stack; call through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Remaining stack in bytes, when the platform can report it.
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

/// Remaining stack in bytes, when the platform can report it.
#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}
