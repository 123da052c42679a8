//! Embedded error documentation for `stencil explain`.

use crate::ErrorCode;

/// Registry of embedded error documentation.
pub struct ErrorDocs;

impl ErrorDocs {
    /// Get the documentation for an error code, if any.
    pub fn get(code: ErrorCode) -> Option<&'static str> {
        DOCS.iter().find(|(c, _)| *c == code).map(|(_, doc)| *doc)
    }

    /// Get all documented error codes.
    pub fn all_codes() -> impl Iterator<Item = ErrorCode> {
        DOCS.iter().map(|(code, _)| *code)
    }
}

static DOCS: &[(ErrorCode, &str)] = &[
    (
        ErrorCode::E0001,
        "A string literal was opened with `\"` or `'` but the tag or \
         expression ended before the matching quote.\n\n    {{ \"hello }}\n",
    ),
    (
        ErrorCode::E0002,
        "A character that starts no token appeared inside `{% %}` or `{{ }}`.\n\n    \
         {{ price $ 2 }}\n",
    ),
    (
        ErrorCode::E0003,
        "A tag, expression or comment was opened but never closed. The error \
         points at the line of the opener.\n\n    {% if x\n",
    ),
    (
        ErrorCode::E1001,
        "The parser found a token the current construct does not accept. The \
         message lists every alternative that would have been valid.\n",
    ),
    (
        ErrorCode::E1002,
        "An operand was expected, for example after a binary operator.\n\n    \
         {{ 1 + }}\n",
    ),
    (
        ErrorCode::E1003,
        "A block tag was still open when the template ended. Close it with its \
         ending tag.\n\n    {% if x %}yes\n\nneeds `{% endif %}`.\n",
    ),
    (
        ErrorCode::E1004,
        "A closing construct does not match the innermost open one, such as a \
         `)` closing a `[`, or `{% endfor %}` inside an `if`.\n",
    ),
    (
        ErrorCode::E1005,
        "The word after `{%` is not a registered tag and no fallback tag is \
         configured.\n",
    ),
    (
        ErrorCode::E1006,
        "Continuation keywords (`else`, `elseif`, `case`, `default`) are only \
         valid directly inside the block that owns them.\n",
    ),
    (
        ErrorCode::E1007,
        "Non-associative operators cannot be chained without parentheses.\n",
    ),
    (
        ErrorCode::E1008,
        "Everything inside `{% switch %}` must belong to a `case` or `default` \
         branch. Only whitespace may precede the first branch.\n",
    ),
    (
        ErrorCode::E2001,
        "An operator node reached code generation without an operand its \
         arity requires. This points at a tag or extension that built the \
         node by hand.\n",
    ),
    (
        ErrorCode::E2003,
        "Two template names, or two nested `{% template %}` names, differ \
         only in case or punctuation and so map to the same Rust module or \
         struct name. Rename one of them.\n",
    ),
    (
        ErrorCode::E3001,
        "Two operators registered the same alias in the same table (unary or \
         binary). Aliases must be unique per table.\n",
    ),
    (
        ErrorCode::E4001,
        "The loader has no template with this name.\n",
    ),
    (
        ErrorCode::E4003,
        "The configuration could not be read or is invalid: a JSON syntax \
         error, an unknown field, clashing delimiters or a `cache_namespace` \
         that is not a Rust identifier.\n",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_codes_have_text() {
        for code in ErrorDocs::all_codes() {
            assert!(ErrorDocs::get(code).is_some_and(|doc| !doc.is_empty()));
        }
        assert!(ErrorDocs::get(ErrorCode::E9001).is_none());
    }
}
