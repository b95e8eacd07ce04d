//! Surrounding-pair scopes: bracket and quote pairs, matched textually.
//!
//! Pairing is a stack discipline per delimiter family over the occurrence
//! stream. Pairs of different families may cross (`( [ ) ]`); the later
//! crossing pair is dropped so the surviving set nests properly and can
//! feed the range forest.

use crate::document::Document;
use crate::primitives::Range;

use super::delimiters::{self, DelimiterSide, PairKind, SimplePairKind};
use super::{Scope, ScopeContext, ScopeKind};

#[derive(Debug, Clone)]
struct Pair {
    open: Range,
    close: Range,
}

pub fn candidates(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    pair_kind: PairKind,
    interior: bool,
) -> Vec<Scope> {
    let language = ctx.settings.language(document.language_id());
    let kinds = pair_kind.simple_kinds();
    let occurrences = delimiters::find_occurrences(document, &kinds, &language);

    let pairs = drop_crossing_pairs(match_pairs(&occurrences));

    let scope_kind = if interior {
        ScopeKind::PairInterior(pair_kind)
    } else {
        ScopeKind::SurroundingPair(pair_kind)
    };

    pairs
        .into_iter()
        .map(|pair| {
            let domain = Range::new(pair.open.start, pair.close.end);
            let content_range = if interior {
                Range::new(pair.open.end, pair.close.start)
            } else {
                domain
            };
            Scope {
                kind: scope_kind,
                domain,
                content_range,
                removal_range: None,
                leading_delimiter: Some(pair.open),
                trailing_delimiter: Some(pair.close),
                insertion_delimiter: "",
            }
        })
        .collect()
}

/// Pairs delimiter occurrences per family. An unmatched closer is ignored;
/// an unmatched single-line opener dies at the end of its line.
fn match_pairs(occurrences: &[delimiters::DelimiterOccurrence]) -> Vec<Pair> {
    use std::collections::HashMap;

    let mut open: HashMap<SimplePairKind, Vec<Range>> = HashMap::new();
    let mut pairs = Vec::new();
    let mut current_line = 0;

    for occurrence in occurrences {
        if occurrence.range.start.line != current_line {
            current_line = occurrence.range.start.line;
            for (kind, stack) in open.iter_mut() {
                if kind.is_single_line() {
                    stack.clear();
                }
            }
        }

        let stack = open.entry(occurrence.kind).or_default();
        match occurrence.side {
            DelimiterSide::Left => stack.push(occurrence.range),
            DelimiterSide::Right => {
                if let Some(opener) = stack.pop() {
                    pairs.push(Pair {
                        open: opener,
                        close: occurrence.range,
                    });
                }
            }
        }
    }

    pairs
}

/// Keeps only pairs that nest properly with every earlier-starting kept
/// pair. Sorted so that on equal starts the wider pair wins.
fn drop_crossing_pairs(mut pairs: Vec<Pair>) -> Vec<Pair> {
    pairs.sort_by(|a, b| {
        a.open
            .start
            .cmp(&b.open.start)
            .then(b.close.end.cmp(&a.close.end))
    });

    let mut kept: Vec<Pair> = Vec::new();
    let mut enclosing_ends: Vec<crate::primitives::Position> = Vec::new();

    for pair in pairs {
        while let Some(&end) = enclosing_ends.last() {
            if end <= pair.open.start {
                enclosing_ends.pop();
            } else {
                break;
            }
        }
        if let Some(&end) = enclosing_ends.last()
            && end < pair.close.end
        {
            // Crosses the enclosing pair
            continue;
        }
        enclosing_ends.push(pair.close.end);
        kept.push(pair);
    }

    kept
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::document::TextDocument;
    use crate::primitives::Position;
    use crate::settings::EngineSettings;
    use crate::syntax::TreeSitterProvider;
    use crate::tokenizer::Tokenizer;

    use super::*;

    fn pair_scopes(text: &str, kind: PairKind, interior: bool) -> Vec<Scope> {
        let settings = EngineSettings::default();
        let provider = TreeSitterProvider::new();
        let tokenizer = Tokenizer::default();
        let ctx = ScopeContext {
            settings: &settings,
            provider: &provider,
            tokenizer: &tokenizer,
        };
        let doc = TextDocument::new("rust", text);
        candidates(&ctx, &doc, kind, interior)
    }

    fn domains(scopes: &[Scope]) -> Vec<(u32, u32)> {
        let mut out: Vec<(u32, u32)> = scopes
            .iter()
            .map(|s| (s.domain.start.character, s.domain.end.character))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn nested_parens_produce_nested_scopes() {
        let scopes = pair_scopes("foo(bar(baz))", PairKind::Parentheses, false);
        assert_eq!(domains(&scopes), vec![(3, 13), (7, 12)]);
    }

    #[test]
    fn interior_excludes_delimiters() {
        let scopes = pair_scopes("(abc)", PairKind::Parentheses, true);
        assert_eq!(scopes.len(), 1);
        assert_eq!(scopes[0].content_range.start, Position::new(0, 1));
        assert_eq!(scopes[0].content_range.end, Position::new(0, 4));
        assert_eq!(scopes[0].domain, Range::new(Position::new(0, 0), Position::new(0, 5)));
    }

    #[test]
    fn crossing_pairs_are_dropped() {
        // `[` opens inside the parens but closes outside them
        let scopes = pair_scopes("( [ ) ]", PairKind::Any, false);
        assert_eq!(domains(&scopes), vec![(0, 5)]);
    }

    #[test]
    fn quotes_do_not_span_lines() {
        let scopes = pair_scopes("a \" b\nc \" d", PairKind::DoubleQuotes, false);
        assert!(scopes.is_empty());
    }

    #[test]
    fn string_family_covers_all_quotes() {
        let scopes = pair_scopes(r#"'a' "b" `c`"#, PairKind::String, false);
        assert_eq!(scopes.len(), 3);
    }
}
