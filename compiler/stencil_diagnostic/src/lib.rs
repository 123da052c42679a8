//! Diagnostic system for template errors.
//!
//! Every compiler phase reports failures as a [`Diagnostic`]:
//! - Error codes for searchability (`stencil explain E1003`)
//! - Clear messages (what went wrong)
//! - Primary line (where it went wrong)
//! - Secondary labels (where the related construct opened)
//! - Suggestions (how to fix)

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod errors;

pub use diagnostic::{unclosed_construct, unexpected_token, Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
