use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while rendering a compiled template.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("template `{0}` not found")]
    TemplateNotFound(String),
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    #[error("unknown extension `{0}`")]
    UnknownExtension(String),
    #[error("no callback bound to `{0}`")]
    UnboundCallback(String),
    #[error("unsupported operand types for `{op}`: {left} and {right}")]
    UnsupportedOperands {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("cannot iterate over {0}")]
    NotIterable(&'static str),
    #[error("invalid argument to `{function}`: {message}")]
    InvalidArgument {
        function: &'static str,
        message: String,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in `{0}`")]
    Overflow(&'static str),
    #[error("invalid pattern: {0}")]
    Pattern(String),
    #[error("include depth limit reached while including `{0}`")]
    IncludeDepth(String),
}

impl RenderError {
    pub(crate) fn operands(op: &'static str, left: &crate::Value, right: &crate::Value) -> Self {
        RenderError::UnsupportedOperands {
            op,
            left: left.type_name(),
            right: right.type_name(),
        }
    }

    pub(crate) fn argument(function: &'static str, message: impl Into<String>) -> Self {
        RenderError::InvalidArgument {
            function,
            message: message.into(),
        }
    }
}
