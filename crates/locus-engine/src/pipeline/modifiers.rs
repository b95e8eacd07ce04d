//! The modifier chain. Each modifier maps one input target to one or more
//! output targets; a chain folds left over the fan-out.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::ResolutionError;
use crate::primitives::{Position, Range};
use crate::scopes::delimiters::PairKind;
use crate::scopes::{self, Direction, IterationOptions, Scope, ScopeContext, ScopeKind};

use super::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeEdge {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineEdge {
    Head,
    Tail,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Modifier {
    /// Smallest scope of `kind` containing the target.
    ContainingScope(ScopeKind),
    /// Every scope of `kind` overlapping the target (or its iteration
    /// scope when the target is empty). Fans out.
    EveryScope(ScopeKind),
    /// The `start`-th scope of `kind` in the iteration context, 1-indexed;
    /// negative counts from the end. `length > 1` spans several scopes.
    OrdinalScope {
        kind: ScopeKind,
        start: i32,
        length: usize,
    },
    /// Scopes counted outward from the target. `offset` 0 starts at the
    /// containing scope, 1 at the adjacent one.
    RelativeScope {
        kind: ScopeKind,
        offset: usize,
        length: usize,
        direction: Direction,
    },
    /// Smallest delimiter pair of `family` around the target.
    SurroundingPair {
        family: PairKind,
        /// When set, the target must sit strictly inside the delimiters,
        /// not on them.
        require_strong_containment: bool,
    },
    /// The inside of the surrounding pair, delimiters excluded.
    Interior(PairKind),
    /// Extend to the start (head) or end (tail) of the target's line.
    HeadTail(LineEdge),
    /// Collapse to an empty range at the target edge, dropping the
    /// insertion delimiter.
    RangePart(RangeEdge),
    /// Collapse to an empty range before/after the target, keeping the
    /// insertion delimiter.
    RelativePosition(Placement),
}

pub fn apply(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    modifier: Modifier,
    target: &Target,
) -> Result<Vec<Target>, ResolutionError> {
    match modifier {
        Modifier::ContainingScope(kind) => {
            let scope = containing_scope(ctx, document, kind, target.content_range)?;
            Ok(vec![Target::from_scope(&scope)])
        }
        Modifier::EveryScope(kind) => every_scope(ctx, document, kind, target),
        Modifier::OrdinalScope { kind, start, length } => {
            ordinal_scope(ctx, document, kind, start, length, target)
        }
        Modifier::RelativeScope {
            kind,
            offset,
            length,
            direction,
        } => relative_scope(ctx, document, kind, offset, length, direction, target),
        Modifier::SurroundingPair {
            family,
            require_strong_containment,
        } => surrounding_pair(ctx, document, family, require_strong_containment, target),
        Modifier::Interior(family) => {
            let kind = ScopeKind::PairInterior(family);
            let scope = containing_scope(ctx, document, kind, target.content_range)?;
            Ok(vec![Target::from_scope(&scope)])
        }
        Modifier::HeadTail(edge) => Ok(vec![head_tail(document, edge, target)]),
        Modifier::RangePart(edge) => {
            let range = match edge {
                RangeEdge::Start => target.content_range.to_empty_start(),
                RangeEdge::End => target.content_range.to_empty_end(),
            };
            Ok(vec![Target {
                content_range: range,
                removal_range: None,
                insertion_delimiter: String::new(),
                ..target.clone()
            }])
        }
        Modifier::RelativePosition(placement) => {
            let range = match placement {
                Placement::Before => target.content_range.to_empty_start(),
                Placement::After => target.content_range.to_empty_end(),
            };
            Ok(vec![Target {
                content_range: range,
                removal_range: None,
                ..target.clone()
            }])
        }
    }
}

/// Smallest scope of `kind` whose domain contains `range`.
fn containing_scope(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    kind: ScopeKind,
    range: Range,
) -> Result<Scope, ResolutionError> {
    let iterator = scopes::generate(
        ctx,
        document,
        kind,
        range.start,
        Direction::Forward,
        IterationOptions::containing(),
    )?;
    // Scopes containing the start come out innermost-first; the first one
    // that also contains the end is the smallest containing scope
    for scope in iterator {
        if scope.domain.contains(range) {
            return Ok(scope);
        }
    }
    Err(ResolutionError::NoContainingScope { kind })
}

/// The range "every"/"ordinal" enumerate within: the target itself when it
/// has extent, else the containing instance of the kind's iteration scope.
fn iteration_range(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    kind: ScopeKind,
    target: &Target,
) -> Result<Range, ResolutionError> {
    if !target.content_range.is_empty() {
        return Ok(target.content_range);
    }
    let Some(iteration_kind) = kind.iteration_kind() else {
        return Err(ResolutionError::NotHierarchicalScope { kind });
    };
    if iteration_kind == ScopeKind::Document {
        return Ok(document.full_range());
    }
    match containing_scope(ctx, document, iteration_kind, target.content_range) {
        Ok(scope) => Ok(scope.content_range),
        // Collection items outside any bracket interior segment the line,
        // matching what the handler does for bare comma-separated lines
        Err(ResolutionError::NoContainingScope { .. })
            if kind == ScopeKind::CollectionItem =>
        {
            Ok(document.line_range(target.content_range.start.line))
        }
        Err(e) => Err(e),
    }
}

/// All scopes of `kind` overlapping `range`, in document order.
fn scopes_in(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    kind: ScopeKind,
    range: Range,
) -> Result<Vec<Scope>, ResolutionError> {
    let options = IterationOptions {
        distal_position: Some(range.end),
        ..IterationOptions::default()
    };
    let iterator = scopes::generate(ctx, document, kind, range.start, Direction::Forward, options)?;
    let mut found: Vec<Scope> = iterator
        .filter(|scope| scope.domain.intersects(range))
        .collect();
    found.sort_by(|a, b| {
        a.domain
            .start
            .cmp(&b.domain.start)
            .then(a.domain.end.cmp(&b.domain.end))
    });
    Ok(found)
}

fn every_scope(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    kind: ScopeKind,
    target: &Target,
) -> Result<Vec<Target>, ResolutionError> {
    let range = iteration_range(ctx, document, kind, target)?;
    let found = scopes_in(ctx, document, kind, range)?;
    if found.is_empty() {
        return Err(ResolutionError::NoContainingScope { kind });
    }
    Ok(found.iter().map(Target::from_scope).collect())
}

fn ordinal_scope(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    kind: ScopeKind,
    start: i32,
    length: usize,
    target: &Target,
) -> Result<Vec<Target>, ResolutionError> {
    let range = iteration_range(ctx, document, kind, target)?;
    let found = scopes_in(ctx, document, kind, range)?;
    let length = length.max(1);

    let first = if start > 0 {
        (start - 1) as usize
    } else {
        let back = (-start) as usize;
        found.len().checked_sub(back).ok_or(ResolutionError::OutOfRange {
            kind,
            requested: back,
            available: found.len(),
        })?
    };
    let last = first + length - 1;
    if last >= found.len() {
        return Err(ResolutionError::OutOfRange {
            kind,
            requested: last + 1,
            available: found.len(),
        });
    }
    Ok(vec![span_target(&found[first..=last])])
}

fn relative_scope(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    kind: ScopeKind,
    offset: usize,
    length: usize,
    direction: Direction,
    target: &Target,
) -> Result<Vec<Target>, ResolutionError> {
    let position = match direction {
        Direction::Forward => target.content_range.end,
        Direction::Backward => target.content_range.start,
    };
    let options = if offset == 0 {
        IterationOptions {
            skip_ancestor_scopes: true,
            ..IterationOptions::default()
        }
    } else {
        IterationOptions::adjacent()
    };
    let iterator = scopes::generate(ctx, document, kind, position, direction, options)?;

    let skip = offset.saturating_sub(1);
    let needed = skip + length.max(1);
    let found: Vec<Scope> = iterator.take(needed).collect();
    if found.len() < needed {
        return Err(ResolutionError::OutOfRange {
            kind,
            requested: needed,
            available: found.len(),
        });
    }
    let mut result = span_target(&found[skip..]);
    result.is_reversed = direction == Direction::Backward;
    Ok(vec![result])
}

fn surrounding_pair(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    family: PairKind,
    require_strong_containment: bool,
    target: &Target,
) -> Result<Vec<Target>, ResolutionError> {
    let kind = ScopeKind::SurroundingPair(family);
    let iterator = scopes::generate(
        ctx,
        document,
        kind,
        target.content_range.start,
        Direction::Forward,
        IterationOptions::containing(),
    )?;
    for scope in iterator {
        if !scope.domain.contains(target.content_range) {
            continue;
        }
        if require_strong_containment && !interior_of(&scope).contains(target.content_range) {
            continue;
        }
        return Ok(vec![Target::from_scope(&scope)]);
    }
    Err(ResolutionError::NoContainingScope { kind })
}

fn interior_of(scope: &Scope) -> Range {
    match (scope.leading_delimiter, scope.trailing_delimiter) {
        (Some(open), Some(close)) => Range::new(open.end, close.start),
        _ => scope.content_range,
    }
}

fn head_tail(document: &dyn Document, edge: LineEdge, target: &Target) -> Target {
    let content = target.content_range;
    match edge {
        LineEdge::Head => Target {
            content_range: Range::new(Position::new(content.start.line, 0), content.end),
            removal_range: None,
            is_reversed: true,
            ..target.clone()
        },
        LineEdge::Tail => Target {
            content_range: Range::new(content.start, document.line_range(content.end.line).end),
            removal_range: None,
            is_reversed: false,
            ..target.clone()
        },
    }
}

/// One target spanning a run of scopes, taking removal and delimiters from
/// the extremes.
fn span_target(scopes: &[Scope]) -> Target {
    let first = &scopes[0];
    let last = &scopes[scopes.len() - 1];
    let mut target = Target::from_scope(first);
    target.content_range = first.content_range.union(last.content_range);
    target.removal_range = match (first.removal_range, last.removal_range) {
        (Some(a), Some(b)) => Some(a.union(b)),
        _ => None,
    };
    target
}
