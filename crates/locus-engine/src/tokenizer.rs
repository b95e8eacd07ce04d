//! Language-aware tokenizer feeding the hat allocator and the token/word
//! scope handlers.
//!
//! Tokens are minimal and context-free: identifiers, numbers, a small set of
//! fixed multi-character symbols (`=>`, `::`, `/*`, ...), runs of repeatable
//! symbols (`---`, `|||`), and single symbols. Whitespace separates tokens
//! and is never part of one. The only language-specific knob is the set of
//! identifier-internal word separators; css/shell-family languages add `-`
//! so that `foo-bar` is a single token.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::{Document, utf16_len};
use crate::primitives::{Position, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Word,
    Number,
    Symbol,
}

/// A lexical unit in a document. `range` is in document positions;
/// `offsets` are byte offsets into the document text. Tokens are compared
/// by their offsets when matching hats across allocation passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub range: Range,
    pub offsets: std::ops::Range<usize>,
    pub kind: TokenKind,
}

/// Sub-token word span, in UTF-16 code units relative to the token start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
}

const FIXED_TOKENS: &[&str] = &[
    "<!--", "-->", "/*", "*/", "=>", "->", "::", "??", "!==", "!=", "===", "==", ">=", "<=",
    "\"\"\"", "'''", "```",
];

const REPEATABLE_SYMBOLS: &[char] = &['-', '|', '/', '+'];

pub struct Tokenizer {
    regex: Regex,
    word_separators: Vec<char>,
}

impl Tokenizer {
    /// Default separators treat `_` as identifier-internal.
    pub fn new(word_separators: &[String]) -> Self {
        let separators: Vec<char> = word_separators
            .iter()
            .flat_map(|s| s.chars())
            .collect();

        let separator_class: String = separators.iter().map(|&c| regex::escape(&c.to_string())).collect();
        let identifier = format!("[\\p{{L}}\\p{{M}}\\p{{N}}{separator_class}]+");
        let fixed = FIXED_TOKENS
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let repeatable = REPEATABLE_SYMBOLS
            .iter()
            .map(|&c| format!("{}+", regex::escape(&c.to_string())))
            .collect::<Vec<_>>()
            .join("|");

        // Alternation order matters: the regex crate prefers earlier
        // branches, so fixed tokens must come before repeatable runs and
        // numbers before identifiers.
        let pattern = format!("{fixed}|{repeatable}|\\d+(?:\\.\\d+)?|{identifier}|\\S");
        let regex = Regex::new(&pattern).expect("tokenizer pattern is static");

        Self {
            regex,
            word_separators: separators,
        }
    }

    pub fn tokenize_line(&self, line: u32, line_text: &str, line_byte_start: usize) -> Vec<Token> {
        let mut tokens = Vec::new();
        for m in self.regex.find_iter(line_text) {
            let start_col = utf16_len(&line_text[..m.start()]) as u32;
            let end_col = start_col + utf16_len(m.as_str()) as u32;
            tokens.push(Token {
                text: m.as_str().to_string(),
                range: Range::new(
                    Position::new(line, start_col),
                    Position::new(line, end_col),
                ),
                offsets: line_byte_start + m.start()..line_byte_start + m.end(),
                kind: self.classify(m.as_str()),
            });
        }
        tokens
    }

    pub fn tokenize(&self, document: &dyn Document) -> Vec<Token> {
        let mut tokens = Vec::new();
        for line in 0..document.line_count() {
            let text = document.line_text(line);
            let line_start = document.offset_at(Position::new(line, 0));
            tokens.extend(self.tokenize_line(line, &text, line_start));
        }
        tokens
    }

    fn classify(&self, text: &str) -> TokenKind {
        let first = match text.chars().next() {
            Some(c) => c,
            None => return TokenKind::Symbol,
        };
        if first.is_ascii_digit() {
            TokenKind::Number
        } else if first.is_alphabetic() || self.word_separators.contains(&first) {
            TokenKind::Word
        } else {
            TokenKind::Symbol
        }
    }

    /// Splits an identifier into words at separator characters and
    /// camelCase boundaries. `HTTPServer` splits as `HTTP` + `Server`.
    pub fn split_words(&self, text: &str) -> Vec<WordSpan> {
        let chars: Vec<char> = text.chars().collect();
        let mut spans = Vec::new();
        let mut offset = 0;
        let mut word_start: Option<usize> = None;

        for (i, &ch) in chars.iter().enumerate() {
            let width = ch.len_utf16();
            if self.word_separators.contains(&ch) {
                if let Some(start) = word_start.take() {
                    spans.push(WordSpan { start, end: offset });
                }
            } else {
                let boundary = match word_start {
                    None => true,
                    Some(_) => {
                        let prev = chars[i - 1];
                        let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
                        (ch.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()))
                            || (ch.is_uppercase() && prev.is_uppercase() && next_lower)
                    }
                };
                if boundary {
                    if let Some(start) = word_start.take() {
                        spans.push(WordSpan { start, end: offset });
                    }
                    word_start = Some(offset);
                }
            }
            offset += width;
        }
        if let Some(start) = word_start {
            spans.push(WordSpan { start, end: offset });
        }
        spans
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&["_".to_string()])
    }
}
