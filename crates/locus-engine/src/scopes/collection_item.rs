//! Collection items: comma-separated elements inside brackets, or on a
//! bare line.
//!
//! Separators are grouped by the smallest bracket interior containing
//! them; separators outside any bracket group by line. Commas inside
//! string quotes never count. Items are the trimmed stretches between the
//! group's separators and its bounds.

use crate::document::Document;
use crate::primitives::{Position, Range};
use crate::range_tree::RangeTree;

use super::delimiters::PairKind;
use super::{Scope, ScopeContext, ScopeKind, surrounding_pair};

const SEPARATOR: char = ',';

pub fn candidates(ctx: &ScopeContext<'_>, document: &dyn Document) -> Vec<Scope> {
    let separators = find_separators(ctx, document);

    let interiors: Vec<Range> =
        surrounding_pair::candidates(ctx, document, PairKind::CollectionBoundary, true)
            .into_iter()
            .map(|scope| scope.content_range)
            .collect();

    // Interiors arrive sorted by start with wider-first ties and properly
    // nested, which is exactly the forest precondition
    let tree = RangeTree::build(interiors.iter().map(|&r| (r, ())).collect());

    // Group separators by smallest containing interior, falling back to
    // the separator's line
    let mut groups: Vec<(Range, Vec<Range>)> = Vec::new();
    for separator in &separators {
        let bounds = match tree.smallest_containing(*separator) {
            Some(node) => node.range,
            None => document.line_range(separator.start.line),
        };
        match groups.iter_mut().find(|(b, _)| *b == bounds) {
            Some((_, seps)) => seps.push(*separator),
            None => groups.push((bounds, vec![*separator])),
        }
    }

    let mut scopes = Vec::new();
    for (bounds, seps) in &groups {
        scopes.extend(items_in_group(document, *bounds, seps));
    }

    // A bracket interior with no separators is still a one-item collection
    for &interior in &interiors {
        if !groups.iter().any(|(bounds, _)| *bounds == interior)
            && let Some(range) = trim_range(document, interior)
        {
            scopes.push(item_scope(range, None, None));
        }
    }

    scopes
}

fn find_separators(ctx: &ScopeContext<'_>, document: &dyn Document) -> Vec<Range> {
    let string_interiors: Vec<Range> =
        surrounding_pair::candidates(ctx, document, PairKind::String, true)
            .into_iter()
            .map(|scope| scope.content_range)
            .collect();

    let mut separators = Vec::new();
    for line in 0..document.line_count() {
        let text = document.line_text(line);
        let mut character = 0u32;
        for ch in text.chars() {
            let width = ch.len_utf16() as u32;
            if ch == SEPARATOR {
                let range = Range::new(
                    Position::new(line, character),
                    Position::new(line, character + width),
                );
                if !string_interiors.iter().any(|s| s.contains(range)) {
                    separators.push(range);
                }
            }
            character += width;
        }
    }
    separators
}

fn items_in_group(document: &dyn Document, bounds: Range, seps: &[Range]) -> Vec<Scope> {
    let mut raw_items = Vec::new();
    let mut start = bounds.start;
    for sep in seps {
        raw_items.push(Range::new(start, sep.start));
        start = sep.end;
    }
    raw_items.push(Range::new(start, bounds.end));

    let trimmed: Vec<Option<Range>> = raw_items
        .iter()
        .map(|&r| trim_range(document, r))
        .collect();

    let mut scopes = Vec::new();
    for (index, item) in trimmed.iter().enumerate() {
        let Some(item) = *item else {
            // Empty stretch, e.g. after a trailing comma
            continue;
        };
        let leading = index.checked_sub(1).map(|i| seps[i]);
        let trailing = seps.get(index).copied();

        // Removal swallows the separator toward the next item, or the
        // previous separator for the final item
        let removal = if let Some(next) = trimmed[index + 1..].iter().flatten().next() {
            Some(Range::new(item.start, next.start))
        } else {
            leading.map(|sep| Range::new(sep.start, item.end))
        };

        let mut scope = item_scope(item, leading, trailing);
        scope.removal_range = removal;
        scopes.push(scope);
    }
    scopes
}

fn item_scope(range: Range, leading: Option<Range>, trailing: Option<Range>) -> Scope {
    Scope {
        leading_delimiter: leading,
        trailing_delimiter: trailing,
        ..Scope::simple(ScopeKind::CollectionItem, range)
    }
}

/// Shrinks a range past its leading and trailing whitespace; `None` when
/// nothing remains.
fn trim_range(document: &dyn Document, range: Range) -> Option<Range> {
    let start = document.offset_at(range.start);
    let end = document.offset_at(range.end);
    if start >= end {
        return None;
    }
    let text = document.text_in(range);
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return None;
    }
    let leading = trimmed.len() - trimmed.trim_start().len();
    Some(Range::new(
        document.position_at(start + leading),
        document.position_at(start + trimmed.len()),
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::document::TextDocument;
    use crate::settings::EngineSettings;
    use crate::syntax::TreeSitterProvider;
    use crate::tokenizer::Tokenizer;

    use super::*;

    fn items(text: &str) -> Vec<String> {
        let settings = EngineSettings::default();
        let provider = TreeSitterProvider::new();
        let tokenizer = Tokenizer::default();
        let ctx = ScopeContext {
            settings: &settings,
            provider: &provider,
            tokenizer: &tokenizer,
        };
        let doc = TextDocument::new("rust", text);
        candidates(&ctx, &doc)
            .into_iter()
            .map(|scope| doc.text_in(scope.content_range))
            .collect()
    }

    #[test]
    fn items_inside_brackets() {
        assert_eq!(items("[a, bb, ccc]"), vec!["a", "bb", "ccc"]);
    }

    #[test]
    fn nested_collections_group_independently() {
        let found = items("[a, (b, c), d]");
        assert!(found.contains(&"a".to_string()));
        assert!(found.contains(&"(b, c)".to_string()));
        assert!(found.contains(&"b".to_string()));
        assert!(found.contains(&"c".to_string()));
        assert!(found.contains(&"d".to_string()));
    }

    #[test]
    fn bare_line_items_need_a_separator() {
        assert_eq!(items("red, green, blue"), vec!["red", "green", "blue"]);
        assert!(items("just one thing").is_empty());
    }

    #[test]
    fn commas_inside_strings_do_not_separate() {
        assert_eq!(items("[\"a, b\", c]"), vec!["\"a, b\"", "c"]);
    }

    #[test]
    fn trailing_comma_yields_no_empty_item() {
        assert_eq!(items("[a, b,]"), vec!["a", "b"]);
    }

    #[test]
    fn lone_interior_is_a_single_item() {
        assert_eq!(items("(solo)"), vec!["solo"]);
    }
}
