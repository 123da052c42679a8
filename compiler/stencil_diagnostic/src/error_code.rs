use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Code generation errors
/// - E3xxx: Registry errors
/// - E4xxx: Loader and configuration errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character inside a delimiter
    E0002,
    /// Unterminated tag, expression or comment delimiter
    E0003,
    /// Invalid number literal
    E0004,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unterminated construct at end of template
    E1003,
    /// Unexpected closing construct
    E1004,
    /// Unknown tag
    E1005,
    /// Continuation keyword outside its block
    E1006,
    /// Chained non-associative operator
    E1007,
    /// Switch branch does not start with a case
    E1008,
    /// Unknown operator
    E1009,
    /// Tag arguments match none of its grammars
    E1010,

    // Code Generation Errors (E2xxx)
    /// Operator node is missing a required operand
    E2001,
    /// Tag node does not have the layout its tag expects
    E2002,
    /// Two templates or units map to the same Rust identifier
    E2003,

    // Registry Errors (E3xxx)
    /// Alias registered twice in one operator table
    E3001,
    /// Reserved literal word used in an operator alias
    E3002,
    /// Tag keyword registered twice
    E3003,
    /// Function registered twice
    E3004,
    /// Configured fallback tag is not registered
    E3005,

    // Loader Errors (E4xxx)
    /// Template not found
    E4001,
    /// Template could not be read
    E4002,
    /// Invalid configuration
    E4003,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
}

impl ErrorCode {
    /// Every code, in numeric order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E1007,
        ErrorCode::E1008,
        ErrorCode::E1009,
        ErrorCode::E1010,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E3005,
        ErrorCode::E4001,
        ErrorCode::E4002,
        ErrorCode::E4003,
        ErrorCode::E9001,
    ];

    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            // Parser
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            // Codegen
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            // Registry
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            // Loader
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            // Internal
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Parse a code such as `"E1003"` (case-insensitive).
    pub fn parse(text: &str) -> Option<ErrorCode> {
        let upper = text.trim().to_ascii_uppercase();
        Self::ALL.iter().copied().find(|c| c.as_str() == upper)
    }

    /// Check if this is a lexer error (E0xxx range).
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Check if this is a parser/syntax error (E1xxx range).
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E1001.to_string(), "E1001");
        assert_eq!(ErrorCode::E4001.as_str(), "E4001");
    }

    #[test]
    fn test_parse_round_trips_every_code() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::parse(code.as_str()), Some(*code));
        }
        assert_eq!(ErrorCode::parse("e1003"), Some(ErrorCode::E1003));
        assert_eq!(ErrorCode::parse("E7777"), None);
    }

    #[test]
    fn test_phase_ranges() {
        assert!(ErrorCode::E0003.is_lexer_error());
        assert!(ErrorCode::E1008.is_parser_error());
        assert!(!ErrorCode::E2001.is_parser_error());
    }
}
