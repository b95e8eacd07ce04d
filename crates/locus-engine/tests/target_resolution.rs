use locus_engine::pipeline::{Mark, Modifier};
use locus_engine::{
    Direction, Engine, EngineSettings, IterationOptions, PairKind, Position, Range,
    ResolutionError, ScopeKind, TargetRequest, TextDocument, TreeSitterProvider,
};

fn engine_with_rust() -> Engine {
    let mut provider = TreeSitterProvider::new();
    provider.register("rust", tree_sitter_rust::LANGUAGE.into());
    Engine::new(EngineSettings::default(), Box::new(provider))
}

fn cursor_request(modifiers: Vec<Modifier>) -> TargetRequest {
    TargetRequest {
        mark: Mark::Cursor,
        modifiers,
    }
}

#[test]
fn surrounding_pair_prefers_the_innermost_parens() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("rust", "foo(bar(baz))");

    // Cursor inside `baz` lands in the inner pair
    let targets = engine
        .resolve_targets(
            &doc,
            &[Range::empty(Position::new(0, 9))],
            &[cursor_request(vec![Modifier::SurroundingPair {
                family: PairKind::Parentheses,
                require_strong_containment: false,
            }])],
        )
        .unwrap();
    assert_eq!(
        targets[0].content_range,
        Range::new(Position::new(0, 7), Position::new(0, 12))
    );
}

#[test]
fn surrounding_pair_outside_any_pair_fails() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("rust", "foo(bar(baz))");

    let result = engine.resolve_targets(
        &doc,
        &[Range::empty(Position::new(0, 0))],
        &[cursor_request(vec![Modifier::SurroundingPair {
            family: PairKind::Parentheses,
            require_strong_containment: false,
        }])],
    );
    assert!(matches!(
        result,
        Err(ResolutionError::NoContainingScope { .. })
    ));
}

#[test]
fn every_item_on_a_bare_line_splits_at_commas() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("rust", "red, green, blue\n");

    let targets = engine
        .resolve_targets(
            &doc,
            &[Range::empty(Position::new(0, 6))],
            &[cursor_request(vec![Modifier::EveryScope(
                ScopeKind::CollectionItem,
            )])],
        )
        .unwrap();
    assert_eq!(targets.len(), 3);
    assert_eq!(
        targets[0].content_range,
        Range::new(Position::new(0, 0), Position::new(0, 3))
    );
    assert_eq!(
        targets[2].content_range,
        Range::new(Position::new(0, 12), Position::new(0, 16))
    );
}

#[test]
fn interior_excludes_the_delimiters() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("rust", "foo(bar(baz))");

    let targets = engine
        .resolve_targets(
            &doc,
            &[Range::empty(Position::new(0, 9))],
            &[cursor_request(vec![Modifier::Interior(
                PairKind::Parentheses,
            )])],
        )
        .unwrap();
    assert_eq!(
        targets[0].content_range,
        Range::new(Position::new(0, 8), Position::new(0, 11))
    );
}

#[test]
fn ordinal_past_the_last_scope_is_out_of_range() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("rust", "fn a() {}\n\nfn b() {}\n");

    let result = engine.resolve_targets(
        &doc,
        &[Range::empty(Position::new(0, 0))],
        &[cursor_request(vec![Modifier::OrdinalScope {
            kind: ScopeKind::NamedFunction,
            start: 3,
            length: 1,
        }])],
    );
    assert!(matches!(
        result,
        Err(ResolutionError::OutOfRange {
            requested: 3,
            available: 2,
            ..
        })
    ));
}

#[test]
fn ordinals_count_from_either_end() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("rust", "fn a() {}\n\nfn b() {}\n");
    let selections = [Range::empty(Position::new(0, 0))];

    let first = engine
        .resolve_targets(
            &doc,
            &selections,
            &[cursor_request(vec![Modifier::OrdinalScope {
                kind: ScopeKind::NamedFunction,
                start: 1,
                length: 1,
            }])],
        )
        .unwrap();
    assert_eq!(first[0].content_range.start.line, 0);

    let last = engine
        .resolve_targets(
            &doc,
            &selections,
            &[cursor_request(vec![Modifier::OrdinalScope {
                kind: ScopeKind::NamedFunction,
                start: -1,
                length: 1,
            }])],
        )
        .unwrap();
    assert_eq!(last[0].content_range.start.line, 2);
}

#[test]
fn every_line_fans_out_over_the_document() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("rust", "one\ntwo\nthree");

    let targets = engine
        .resolve_targets(
            &doc,
            &[Range::empty(Position::new(1, 0))],
            &[cursor_request(vec![Modifier::EveryScope(ScopeKind::Line)])],
        )
        .unwrap();
    assert_eq!(targets.len(), 3);
    assert_eq!(targets[2].content_range.start.line, 2);
}

#[test]
fn every_document_has_no_iteration_scope() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("rust", "one\n");

    let result = engine.resolve_targets(
        &doc,
        &[Range::empty(Position::new(0, 0))],
        &[cursor_request(vec![Modifier::EveryScope(
            ScopeKind::Document,
        )])],
    );
    assert!(matches!(
        result,
        Err(ResolutionError::NotHierarchicalScope {
            kind: ScopeKind::Document
        })
    ));
}

#[test]
fn relative_tokens_step_past_the_containing_one() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("rust", "one two three four");

    let targets = engine
        .resolve_targets(
            &doc,
            &[Range::empty(Position::new(0, 1))],
            &[cursor_request(vec![Modifier::RelativeScope {
                kind: ScopeKind::Token,
                offset: 1,
                length: 2,
                direction: Direction::Forward,
            }])],
        )
        .unwrap();
    // "two three" as one spanning target
    assert_eq!(
        targets[0].content_range,
        Range::new(Position::new(0, 4), Position::new(0, 13))
    );
}

#[test]
fn relative_scope_runs_out_of_scopes() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("rust", "one two");

    let result = engine.resolve_targets(
        &doc,
        &[Range::empty(Position::new(0, 0))],
        &[cursor_request(vec![Modifier::RelativeScope {
            kind: ScopeKind::Token,
            offset: 5,
            length: 1,
            direction: Direction::Forward,
        }])],
    );
    assert!(matches!(result, Err(ResolutionError::OutOfRange { .. })));
}

#[test]
fn containing_function_resolves_through_the_syntax_tree() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("rust", "fn main() {\n    let x = 1;\n}\n");

    let targets = engine
        .resolve_targets(
            &doc,
            &[Range::empty(Position::new(1, 8))],
            &[cursor_request(vec![Modifier::ContainingScope(
                ScopeKind::NamedFunction,
            )])],
        )
        .unwrap();
    assert_eq!(targets[0].content_range.start, Position::new(0, 0));
    assert_eq!(targets[0].content_range.end.line, 2);
}

#[test]
fn syntactic_scope_in_unknown_language_fails() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("cobol", "MOVE A TO B.");

    let result = engine.resolve_targets(
        &doc,
        &[Range::empty(Position::new(0, 0))],
        &[cursor_request(vec![Modifier::ContainingScope(
            ScopeKind::Statement,
        )])],
    );
    assert!(matches!(
        result,
        Err(ResolutionError::UnsupportedLanguage { .. })
    ));
}

#[test]
fn forward_enumeration_is_monotonic() {
    let engine = engine_with_rust();
    let doc = TextDocument::new("rust", "let total = (a + b) * (c + d);\nlet next = total;\n");

    let starts: Vec<Position> = engine
        .generate_scopes(
            &doc,
            ScopeKind::Token,
            Position::new(0, 14),
            Direction::Forward,
            IterationOptions::default(),
        )
        .unwrap()
        .map(|scope| scope.domain.start)
        .collect();
    assert!(!starts.is_empty());
    assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));

    let backward_starts: Vec<Position> = engine
        .generate_scopes(
            &doc,
            ScopeKind::Token,
            Position::new(0, 14),
            Direction::Backward,
            IterationOptions::default(),
        )
        .unwrap()
        .map(|scope| scope.domain.start)
        .collect();
    assert!(!backward_starts.is_empty());
    assert!(backward_starts.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn head_and_tail_extend_to_line_edges() {
    let mut engine = engine_with_rust();
    let doc = TextDocument::new("rust", "let total = 1;");

    // Target the `total` token, then take its head
    let targets = engine
        .resolve_targets(
            &doc,
            &[Range::empty(Position::new(0, 5))],
            &[cursor_request(vec![
                Modifier::ContainingScope(ScopeKind::Token),
                Modifier::HeadTail(locus_engine::pipeline::LineEdge::Head),
            ])],
        )
        .unwrap();
    assert_eq!(
        targets[0].content_range,
        Range::new(Position::new(0, 0), Position::new(0, 9))
    );
    assert!(targets[0].is_reversed);
}
