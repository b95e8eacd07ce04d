//! Delimiter families and occurrence scanning for the surrounding-pair
//! machinery.
//!
//! Asymmetric delimiters (`(` vs `)`) can be classified lexically.
//! Symmetric ones (quotes) cannot, so we classify by parity: an unescaped
//! quote is *opening* when an even number of unescaped occurrences of the
//! same text precede it on its line, else *closing*. Quote families are
//! single-line, which is what keeps the parity heuristic honest; input
//! that is unbalanced anyway gets best-effort pairing, never an error.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::primitives::{Position, Range};
use crate::settings::LanguageSettings;

/// A concrete pair family with fixed delimiter text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimplePairKind {
    Parentheses,
    SquareBrackets,
    CurlyBrackets,
    AngleBrackets,
    SingleQuotes,
    DoubleQuotes,
    BacktickQuotes,
}

impl SimplePairKind {
    pub fn default_text(self) -> (&'static str, &'static str) {
        match self {
            SimplePairKind::Parentheses => ("(", ")"),
            SimplePairKind::SquareBrackets => ("[", "]"),
            SimplePairKind::CurlyBrackets => ("{", "}"),
            SimplePairKind::AngleBrackets => ("<", ">"),
            SimplePairKind::SingleQuotes => ("'", "'"),
            SimplePairKind::DoubleQuotes => ("\"", "\""),
            SimplePairKind::BacktickQuotes => ("`", "`"),
        }
    }

    /// Quote families pair within a single line only.
    pub fn is_single_line(self) -> bool {
        matches!(
            self,
            SimplePairKind::SingleQuotes
                | SimplePairKind::DoubleQuotes
                | SimplePairKind::BacktickQuotes
        )
    }
}

impl fmt::Display for SimplePairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimplePairKind::Parentheses => "parentheses",
            SimplePairKind::SquareBrackets => "square brackets",
            SimplePairKind::CurlyBrackets => "curly brackets",
            SimplePairKind::AngleBrackets => "angle brackets",
            SimplePairKind::SingleQuotes => "single quotes",
            SimplePairKind::DoubleQuotes => "double quotes",
            SimplePairKind::BacktickQuotes => "backtick quotes",
        };
        write!(f, "{name}")
    }
}

/// A requested pair family; the complex variants are shorthand for a set
/// of simple families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PairKind {
    Parentheses,
    SquareBrackets,
    CurlyBrackets,
    AngleBrackets,
    SingleQuotes,
    DoubleQuotes,
    BacktickQuotes,
    /// Any simple family.
    Any,
    /// All quote families.
    String,
    /// Families that delimit collections: parens, square and curly
    /// brackets.
    CollectionBoundary,
}

impl PairKind {
    pub fn simple_kinds(self) -> Vec<SimplePairKind> {
        match self {
            PairKind::Parentheses => vec![SimplePairKind::Parentheses],
            PairKind::SquareBrackets => vec![SimplePairKind::SquareBrackets],
            PairKind::CurlyBrackets => vec![SimplePairKind::CurlyBrackets],
            PairKind::AngleBrackets => vec![SimplePairKind::AngleBrackets],
            PairKind::SingleQuotes => vec![SimplePairKind::SingleQuotes],
            PairKind::DoubleQuotes => vec![SimplePairKind::DoubleQuotes],
            PairKind::BacktickQuotes => vec![SimplePairKind::BacktickQuotes],
            PairKind::Any => vec![
                SimplePairKind::Parentheses,
                SimplePairKind::SquareBrackets,
                SimplePairKind::CurlyBrackets,
                SimplePairKind::SingleQuotes,
                SimplePairKind::DoubleQuotes,
                SimplePairKind::BacktickQuotes,
            ],
            PairKind::String => vec![
                SimplePairKind::SingleQuotes,
                SimplePairKind::DoubleQuotes,
                SimplePairKind::BacktickQuotes,
            ],
            PairKind::CollectionBoundary => vec![
                SimplePairKind::Parentheses,
                SimplePairKind::SquareBrackets,
                SimplePairKind::CurlyBrackets,
            ],
        }
    }
}

impl fmt::Display for PairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairKind::Any => write!(f, "any"),
            PairKind::String => write!(f, "string"),
            PairKind::CollectionBoundary => write!(f, "collection boundary"),
            other => {
                let simple = other.simple_kinds()[0];
                write!(f, "{simple}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterSide {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct DelimiterOccurrence {
    pub kind: SimplePairKind,
    pub side: DelimiterSide,
    pub range: Range,
}

/// Resolved delimiter text for one family, after language overrides.
#[derive(Debug, Clone)]
struct DelimiterText {
    kind: SimplePairKind,
    left: String,
    right: String,
}

fn delimiter_texts(kinds: &[SimplePairKind], language: &LanguageSettings) -> Vec<DelimiterText> {
    kinds
        .iter()
        .map(|&kind| {
            let (left, right) = language
                .delimiter_overrides
                .get(&kind)
                .cloned()
                .unwrap_or_else(|| {
                    let (l, r) = kind.default_text();
                    (l.to_string(), r.to_string())
                });
            DelimiterText { kind, left, right }
        })
        .collect()
}

/// Scans the document for delimiter occurrences of the given families, in
/// document order. Escaped occurrences (preceded by a backslash) are
/// skipped.
pub fn find_occurrences(
    document: &dyn Document,
    kinds: &[SimplePairKind],
    language: &LanguageSettings,
) -> Vec<DelimiterOccurrence> {
    let texts = delimiter_texts(kinds, language);

    // Longest delimiter text first so e.g. a nix `''` wins over `'`
    let mut alternatives: Vec<(String, SimplePairKind, bool)> = Vec::new();
    for t in &texts {
        alternatives.push((t.left.clone(), t.kind, true));
        if t.right != t.left {
            alternatives.push((t.right.clone(), t.kind, false));
        }
    }
    alternatives.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(&b.0)));

    let pattern = alternatives
        .iter()
        .map(|(text, _, _)| regex::escape(text))
        .collect::<Vec<_>>()
        .join("|");
    let regex = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(_) => return Vec::new(),
    };

    let mut occurrences = Vec::new();
    for line in 0..document.line_count() {
        let text = document.line_text(line);
        // Per-line parity count for symmetric delimiters, keyed by text
        let mut parity: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();

        for m in regex.find_iter(&text) {
            if is_escaped(&text, m.start()) {
                continue;
            }

            let (_, kind, is_left) = alternatives
                .iter()
                .find(|(alt, _, _)| alt == m.as_str())
                .expect("match must come from an alternative");

            let symmetric = {
                let resolved = texts.iter().find(|t| t.kind == *kind).expect("kind known");
                resolved.left == resolved.right
            };

            let side = if symmetric {
                let count = parity.entry(m.as_str()).or_insert(0);
                let side = if *count % 2 == 0 {
                    DelimiterSide::Left
                } else {
                    DelimiterSide::Right
                };
                *count += 1;
                side
            } else if *is_left {
                DelimiterSide::Left
            } else {
                DelimiterSide::Right
            };

            let start = crate::document::utf16_offset_for_byte(&text, m.start()) as u32;
            let end = crate::document::utf16_offset_for_byte(&text, m.end()) as u32;
            occurrences.push(DelimiterOccurrence {
                kind: *kind,
                side,
                range: Range::new(Position::new(line, start), Position::new(line, end)),
            });
        }
    }
    occurrences
}

fn is_escaped(text: &str, byte_offset: usize) -> bool {
    let mut backslashes = 0;
    for b in text[..byte_offset].bytes().rev() {
        if b == b'\\' {
            backslashes += 1;
        } else {
            break;
        }
    }
    backslashes % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextDocument;

    fn occurrences(text: &str, kinds: &[SimplePairKind]) -> Vec<DelimiterOccurrence> {
        let doc = TextDocument::new("rust", text);
        find_occurrences(&doc, kinds, &LanguageSettings::default())
    }

    #[test]
    fn asymmetric_delimiters_know_their_side() {
        let found = occurrences("foo(bar)", &[SimplePairKind::Parentheses]);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].side, DelimiterSide::Left);
        assert_eq!(found[1].side, DelimiterSide::Right);
    }

    #[test]
    fn quotes_alternate_by_line_parity() {
        let found = occurrences(r#"a "b" c "d" e"#, &[SimplePairKind::DoubleQuotes]);
        let sides: Vec<DelimiterSide> = found.iter().map(|o| o.side).collect();
        assert_eq!(
            sides,
            vec![
                DelimiterSide::Left,
                DelimiterSide::Right,
                DelimiterSide::Left,
                DelimiterSide::Right
            ]
        );
    }

    #[test]
    fn escaped_quotes_are_skipped() {
        let found = occurrences(r#""a \" b""#, &[SimplePairKind::DoubleQuotes]);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].range.start.character, 0);
        assert_eq!(found[1].range.start.character, 7);
    }

    #[test]
    fn overrides_replace_delimiter_text() {
        let mut language = LanguageSettings::default();
        language.delimiter_overrides.insert(
            SimplePairKind::SingleQuotes,
            ("''".to_string(), "''".to_string()),
        );
        let doc = TextDocument::new("nix", "x = ''foo'';");
        let found = find_occurrences(&doc, &[SimplePairKind::SingleQuotes], &language);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].range.end.character - found[0].range.start.character, 2);
    }
}
