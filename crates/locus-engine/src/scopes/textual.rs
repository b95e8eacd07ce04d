//! Textual scope kinds: characters, words, tokens, lines, paragraphs and
//! the document itself. None of these need a syntax tree.

use crate::document::Document;
use crate::primitives::{Position, Range};
use crate::tokenizer::TokenKind;

use super::{Scope, ScopeContext, ScopeKind};

pub fn candidates(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    kind: ScopeKind,
) -> Vec<Scope> {
    match kind {
        ScopeKind::Character => character_candidates(document),
        ScopeKind::Word => word_candidates(ctx, document),
        ScopeKind::Token => token_candidates(ctx, document),
        ScopeKind::Line => line_candidates(document),
        ScopeKind::Paragraph => paragraph_candidates(document),
        ScopeKind::Document => vec![Scope::simple(ScopeKind::Document, document.full_range())],
        _ => unreachable!("non-textual scope kind {kind}"),
    }
}

fn character_candidates(document: &dyn Document) -> Vec<Scope> {
    let mut scopes = Vec::new();
    for line in 0..document.line_count() {
        let text = document.line_text(line);
        let mut character = 0u32;
        for ch in text.chars() {
            let width = ch.len_utf16() as u32;
            scopes.push(Scope::simple(
                ScopeKind::Character,
                Range::new(
                    Position::new(line, character),
                    Position::new(line, character + width),
                ),
            ));
            character += width;
        }
    }
    scopes
}

fn word_candidates(ctx: &ScopeContext<'_>, document: &dyn Document) -> Vec<Scope> {
    let mut scopes = Vec::new();
    for token in ctx.tokenizer.tokenize(document) {
        if token.kind == TokenKind::Word {
            for span in ctx.tokenizer.split_words(&token.text) {
                let line = token.range.start.line;
                let base = token.range.start.character;
                scopes.push(Scope::simple(
                    ScopeKind::Word,
                    Range::new(
                        Position::new(line, base + span.start as u32),
                        Position::new(line, base + span.end as u32),
                    ),
                ));
            }
        } else {
            scopes.push(Scope::simple(ScopeKind::Word, token.range));
        }
    }
    scopes
}

fn token_candidates(ctx: &ScopeContext<'_>, document: &dyn Document) -> Vec<Scope> {
    let tokens = ctx.tokenizer.tokenize(document);
    let mut scopes = Vec::with_capacity(tokens.len());

    for (index, token) in tokens.iter().enumerate() {
        let line = token.range.start.line;
        let line_len = crate::document::utf16_len(&document.line_text(line)) as u32;

        // Whitespace run back to the previous token on the same line (or
        // the line start)
        let leading_limit = match index.checked_sub(1).map(|i| &tokens[i]) {
            Some(prev) if prev.range.end.line == line => prev.range.end.character,
            _ => 0,
        };
        let leading = (leading_limit < token.range.start.character).then(|| {
            Range::new(
                Position::new(line, leading_limit),
                token.range.start,
            )
        });

        let trailing_limit = match tokens.get(index + 1) {
            Some(next) if next.range.start.line == line => next.range.start.character,
            _ => line_len,
        };
        let trailing = (token.range.end.character < trailing_limit).then(|| {
            Range::new(
                token.range.end,
                Position::new(line, trailing_limit),
            )
        });

        scopes.push(Scope {
            leading_delimiter: leading,
            trailing_delimiter: trailing,
            ..Scope::simple(ScopeKind::Token, token.range)
        });
    }
    scopes
}

fn line_candidates(document: &dyn Document) -> Vec<Scope> {
    let last = document.line_count().saturating_sub(1);
    (0..document.line_count())
        .map(|line| {
            let text = document.line_text(line);
            let full = document.line_range(line);
            let content = trimmed_range(line, &text).unwrap_or(full);

            // Removal takes the terminator too; the last line takes the
            // preceding one instead
            let removal = if line < last {
                Range::new(full.start, Position::new(line + 1, 0))
            } else if line > 0 {
                Range::new(document.line_range(line - 1).end, full.end)
            } else {
                full
            };

            Scope {
                domain: full,
                content_range: content,
                removal_range: Some(removal),
                ..Scope::simple(ScopeKind::Line, full)
            }
        })
        .collect()
}

fn paragraph_candidates(document: &dyn Document) -> Vec<Scope> {
    let mut scopes = Vec::new();
    let mut block_start: Option<u32> = None;

    let blank = |line: u32| document.line_text(line).trim().is_empty();

    for line in 0..document.line_count() {
        match (block_start, blank(line)) {
            (None, false) => block_start = Some(line),
            (Some(start), true) => {
                scopes.push(paragraph_scope(document, start, line - 1));
                block_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = block_start {
        scopes.push(paragraph_scope(document, start, document.line_count() - 1));
    }
    scopes
}

fn paragraph_scope(document: &dyn Document, first: u32, last: u32) -> Scope {
    let content = Range::new(
        document.line_range(first).start,
        document.line_range(last).end,
    );

    // Removal swallows the blank lines after the block, or before it when
    // the block ends the document
    let mut removal_end = content.end;
    let mut line = last + 1;
    while line < document.line_count() && document.line_text(line).trim().is_empty() {
        removal_end = document.line_range(line).end;
        line += 1;
    }
    let removal = if removal_end > content.end {
        Range::new(content.start, removal_end)
    } else {
        let mut removal_start = content.start;
        let mut line = first;
        while line > 0 && document.line_text(line - 1).trim().is_empty() {
            line -= 1;
            removal_start = document.line_range(line).start;
        }
        Range::new(removal_start, content.end)
    };

    Scope {
        removal_range: Some(removal),
        ..Scope::simple(ScopeKind::Paragraph, content)
    }
}

fn trimmed_range(line: u32, text: &str) -> Option<Range> {
    let trimmed = text.trim_end();
    let leading = trimmed.len() - trimmed.trim_start().len();
    if trimmed.is_empty() {
        return None;
    }
    let start = crate::document::utf16_len(&text[..leading]) as u32;
    let end = crate::document::utf16_len(trimmed) as u32;
    Some(Range::new(Position::new(line, start), Position::new(line, end)))
}
