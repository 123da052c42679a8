//! Delimiter and vocabulary configuration for the tokenizer.

use rustc_hash::FxHashSet;

/// Delimiter pairs recognized in template source.
///
/// Defaults: `{% %}` for tags, `{{ }}` for expressions, `{# #}` for
/// comments, and `-` as the whitespace-control marker (`{%-`, `-%}`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Delimiters {
    pub tag: (String, String),
    pub expression: (String, String),
    /// `None` disables comments.
    pub comment: Option<(String, String)>,
    pub trim: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters {
            tag: ("{%".into(), "%}".into()),
            expression: ("{{".into(), "}}".into()),
            comment: Some(("{#".into(), "#}".into())),
            trim: '-',
        }
    }
}

impl Delimiters {
    /// Check that no delimiter is empty and the three openers are distinct.
    pub fn validate(&self) -> Result<(), String> {
        let mut pairs = vec![("tag", &self.tag), ("expression", &self.expression)];
        if let Some(comment) = &self.comment {
            pairs.push(("comment", comment));
        }
        for (name, (open, close)) in &pairs {
            if open.is_empty() || close.is_empty() {
                return Err(format!("{name} delimiters must not be empty"));
            }
        }
        for (i, (a, (open_a, _))) in pairs.iter().enumerate() {
            for (b, (open_b, _)) in &pairs[i + 1..] {
                if open_a == open_b {
                    return Err(format!("{a} and {b} delimiters share the opener `{open_a}`"));
                }
            }
        }
        Ok(())
    }
}

/// Everything the tokenizer needs to classify words and symbols.
///
/// The operator vocabulary comes from the operator registry, the tag
/// keywords from the tag registry.
#[derive(Clone, Debug, Default)]
pub struct LexerConfig {
    pub delimiters: Delimiters,
    /// Operator symbols, longest first.
    operator_symbols: Vec<String>,
    operator_words: FxHashSet<String>,
    tag_keywords: FxHashSet<String>,
}

impl LexerConfig {
    pub fn new(delimiters: Delimiters) -> Self {
        LexerConfig {
            delimiters,
            ..Self::default()
        }
    }

    /// Register operator symbols; kept sorted longest first for matching.
    #[must_use]
    pub fn with_operator_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operator_symbols.extend(symbols.into_iter().map(Into::into));
        self.operator_symbols
            .sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        self.operator_symbols.dedup();
        self
    }

    #[must_use]
    pub fn with_operator_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operator_words.extend(words.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_tag_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn operator_symbols(&self) -> &[String] {
        &self.operator_symbols
    }

    pub fn is_operator_word(&self, word: &str) -> bool {
        self.operator_words.contains(word)
    }

    pub fn is_tag_keyword(&self, word: &str) -> bool {
        self.tag_keywords.contains(word)
    }
}
