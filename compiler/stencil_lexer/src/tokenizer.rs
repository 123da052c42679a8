//! The tokenizer.
//!
//! Outside delimiters everything is text; openers are located with
//! `memchr::memmem`, one cached finder per opener so each is scanned at
//! most once. Inside a tag or expression the source is split into words,
//! literals, operator symbols and punctuation until the matching closer.

use memchr::memmem;
use stencil_ir::{Token, TokenKind};

use crate::lex_error::{LexError, LexErrorKind};
use crate::LexerConfig;

const PUNCTUATION: &[char] = &['(', ')', '[', ']', ',', ':', '.', '='];
const LITERAL_WORDS: &[&str] = &["true", "false", "null"];

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Region {
    Tag,
    Expression,
    Comment,
}

impl Region {
    fn construct(self) -> &'static str {
        match self {
            Region::Tag => "tag",
            Region::Expression => "expression",
            Region::Comment => "comment",
        }
    }
}

/// Next occurrence of one opener, cached until the cursor passes it.
struct Opener<'d> {
    region: Region,
    open: &'d str,
    close: &'d str,
    finder: memmem::Finder<'d>,
    next: Option<Option<usize>>,
}

impl Opener<'_> {
    fn find_from(&mut self, haystack: &str, pos: usize) -> Option<usize> {
        if let Some(Some(hit)) = self.next {
            if hit >= pos {
                return Some(hit);
            }
        } else if let Some(None) = self.next {
            return None;
        }
        let hit = self
            .finder
            .find(&haystack.as_bytes()[pos..])
            .map(|offset| pos + offset);
        self.next = Some(hit);
        hit
    }
}

struct Tokenizer<'a> {
    src: &'a str,
    config: &'a LexerConfig,
    pos: usize,
    line: u32,
    tokens: Vec<Token>,
    /// Set by a `-` before a closer: trim the start of the next text run.
    trim_next: bool,
}

/// Split `source` into tokens, ending with `Eof`.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn tokenize(source: &str, config: &LexerConfig) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer {
        src: source,
        config,
        pos: 0,
        line: 1,
        tokens: Vec::new(),
        trim_next: false,
    };
    tokenizer.run()?;
    tracing::trace!(count = tokenizer.tokens.len(), "tokenized");
    Ok(tokenizer.tokens)
}

impl<'a> Tokenizer<'a> {
    fn run(&mut self) -> Result<(), LexError> {
        let (src, config) = (self.src, self.config);
        let delimiters = &config.delimiters;
        let mut openers = vec![
            Opener {
                region: Region::Tag,
                open: &delimiters.tag.0,
                close: &delimiters.tag.1,
                finder: memmem::Finder::new(delimiters.tag.0.as_bytes()),
                next: None,
            },
            Opener {
                region: Region::Expression,
                open: &delimiters.expression.0,
                close: &delimiters.expression.1,
                finder: memmem::Finder::new(delimiters.expression.0.as_bytes()),
                next: None,
            },
        ];
        if let Some((open, close)) = &delimiters.comment {
            openers.push(Opener {
                region: Region::Comment,
                open,
                close,
                finder: memmem::Finder::new(open.as_bytes()),
                next: None,
            });
        }

        while self.pos < src.len() {
            // Earliest opener wins; on a tie the longer opener does.
            let mut best: Option<(usize, usize, usize)> = None;
            for (index, opener) in openers.iter_mut().enumerate() {
                let Some(at) = opener.find_from(src, self.pos) else {
                    continue;
                };
                let better = best.map_or(true, |(best_at, best_len, _)| {
                    at < best_at || (at == best_at && opener.open.len() > best_len)
                });
                if better {
                    best = Some((at, opener.open.len(), index));
                }
            }

            let Some((start, open_len, index)) = best else {
                self.push_text(&src[self.pos..], false);
                self.pos = src.len();
                break;
            };

            let after_open = start + open_len;
            let trim_before = src[after_open..].starts_with(delimiters.trim);
            let text = &src[self.pos..start];
            self.push_text(text, trim_before);
            self.pos = after_open + if trim_before { delimiters.trim.len_utf8() } else { 0 };

            let (region, close) = (openers[index].region, openers[index].close);
            self.lex_region(region, close, start)?;
        }

        self.tokens.push(Token::eof(self.line));
        Ok(())
    }

    /// Emit a text run, applying pending and requested trimming.
    fn push_text(&mut self, text: &'a str, trim_end: bool) {
        let newlines = count_lines(text);
        let start_line = self.line;
        let mut kept = text;
        let mut line = start_line;
        if std::mem::take(&mut self.trim_next) {
            let trimmed = kept.trim_start();
            line += count_lines(&kept[..kept.len() - trimmed.len()]);
            kept = trimmed;
        }
        if trim_end {
            kept = kept.trim_end();
        }
        self.line = start_line + newlines;
        if !kept.is_empty() {
            self.tokens.push(Token::new(TokenKind::Text, kept, line));
        }
    }

    fn lex_region(&mut self, region: Region, close: &str, opened_at: usize) -> Result<(), LexError> {
        let src = self.src;
        let open_line = self.line;
        let trim = self.config.delimiters.trim;
        let unterminated = || {
            LexError::new(
                LexErrorKind::UnterminatedDelimiter {
                    construct: region.construct(),
                },
                open_line,
                &src[opened_at..],
            )
        };

        if region == Region::Comment {
            let rest = &src[self.pos..];
            let Some(end) = memmem::find(rest.as_bytes(), close.as_bytes()) else {
                return Err(unterminated());
            };
            let body = &rest[..end];
            self.line += count_lines(body);
            self.trim_next = body.ends_with(trim);
            self.pos += end + close.len();
            return Ok(());
        }

        let (start_kind, end_kind) = match region {
            Region::Tag => (TokenKind::TagStart, TokenKind::TagEnd),
            _ => (TokenKind::ExpressionStart, TokenKind::ExpressionEnd),
        };
        self.tokens.push(Token::new(start_kind, "", open_line));
        let mut after_start = true;

        loop {
            self.skip_whitespace();
            let rest = &src[self.pos..];
            if rest.is_empty() {
                return Err(unterminated());
            }
            if rest.starts_with(trim) && rest[trim.len_utf8()..].starts_with(close) {
                self.pos += trim.len_utf8() + close.len();
                self.trim_next = true;
                break;
            }
            if rest.starts_with(close) {
                self.pos += close.len();
                break;
            }
            self.lex_token(after_start)?;
            after_start = false;
        }

        self.tokens.push(Token::new(end_kind, "", self.line));
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        let src = self.src;
        let rest = &src[self.pos..];
        let trimmed = rest.trim_start();
        let skipped = &rest[..rest.len() - trimmed.len()];
        self.line += count_lines(skipped);
        self.pos += skipped.len();
    }

    fn lex_token(&mut self, after_start: bool) -> Result<(), LexError> {
        let (src, config) = (self.src, self.config);
        let rest = &src[self.pos..];
        let Some(first) = rest.chars().next() else {
            return Ok(());
        };

        if first == '"' || first == '\'' {
            return self.lex_string(first);
        }
        if first.is_ascii_digit() {
            self.lex_number();
            return Ok(());
        }
        if first.is_alphabetic() || first == '_' {
            self.lex_word(after_start);
            return Ok(());
        }

        // Operator symbols before punctuation so `..` and `==` win over `.`, `=`.
        if let Some(symbol) = config
            .operator_symbols()
            .iter()
            .find(|s| rest.starts_with(s.as_str()))
        {
            self.tokens
                .push(Token::new(TokenKind::Operator, symbol.as_str(), self.line));
            self.pos += symbol.len();
            return Ok(());
        }
        if PUNCTUATION.contains(&first) {
            self.tokens
                .push(Token::new(TokenKind::Punctuation, first.to_string(), self.line));
            self.pos += first.len_utf8();
            return Ok(());
        }

        Err(LexError::new(
            LexErrorKind::InvalidCharacter(first),
            self.line,
            rest,
        ))
    }

    fn lex_string(&mut self, quote: char) -> Result<(), LexError> {
        let src = self.src;
        let start_line = self.line;
        let rest = &src[self.pos..];
        let mut value = String::new();
        let mut chars = rest.char_indices().skip(1);
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, e @ ('\\' | '"' | '\''))) => value.push(e),
                    Some((_, other)) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => break,
                },
                c if c == quote => {
                    let literal = &rest[..=i];
                    self.line += count_lines(literal);
                    self.pos += i + c.len_utf8();
                    self.tokens
                        .push(Token::new(TokenKind::String, value, start_line));
                    return Ok(());
                }
                c => value.push(c),
            }
        }
        Err(LexError::new(
            LexErrorKind::UnterminatedString,
            start_line,
            rest,
        ))
    }

    fn lex_number(&mut self) {
        let src = self.src;
        let bytes = src.as_bytes();
        let start = self.pos;
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        // A fraction needs a digit after the dot, so `1..3` stays a range.
        if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
        self.tokens
            .push(Token::new(TokenKind::Literal, &src[start..end], self.line));
        self.pos = end;
    }

    fn lex_word(&mut self, after_start: bool) {
        let src = self.src;
        let rest = &src[self.pos..];
        let len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
            .map_or(rest.len(), |(i, _)| i);
        let word = &rest[..len];
        let in_tag = self
            .tokens
            .last()
            .is_some_and(|t| t.kind == TokenKind::TagStart);

        let config = self.config;
        let kind = if after_start && in_tag && config.is_tag_keyword(word) {
            TokenKind::Keyword
        } else if LITERAL_WORDS.contains(&word) {
            TokenKind::Literal
        } else if config.is_operator_word(word) {
            TokenKind::Operator
        } else {
            TokenKind::Identifier
        };
        self.tokens.push(Token::new(kind, word, self.line));
        self.pos += len;
    }
}

fn count_lines(text: &str) -> u32 {
    u32::try_from(memchr::memchr_iter(b'\n', text.as_bytes()).count()).unwrap_or(u32::MAX)
}
