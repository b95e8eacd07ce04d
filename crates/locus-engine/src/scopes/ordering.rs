//! The canonical scope ordering.
//!
//! Handlers sort their candidates with [`compare_scopes`] before yielding.
//! The ordering is relative to the iteration position: going forward, a
//! scope that starts before the position is only "seen" at its end point,
//! so it is ordered by where it ends; a scope starting at or after the
//! position is ordered by where it starts. This is what makes "next pair"
//! leave a nested pair before entering the following one.

use std::cmp::Ordering;

use crate::primitives::{Position, Range};

use super::{Direction, Scope};

pub fn compare_scopes(
    direction: Direction,
    position: Position,
    a: &Scope,
    b: &Scope,
) -> Ordering {
    match direction {
        Direction::Forward => compare_forward(position, a.domain, b.domain),
        Direction::Backward => compare_backward(position, a.domain, b.domain),
    }
}

fn compare_forward(position: Position, a: Range, b: Range) -> Ordering {
    let a_start_visible = a.start >= position;
    let b_start_visible = b.start >= position;

    match (a_start_visible, b_start_visible) {
        // Both ahead: order by start, smaller scope first on ties
        (true, true) => a.start.cmp(&b.start).then(a.end.cmp(&b.end)),
        // Both already entered: we only see their ends; the one ending
        // first comes first, inner (later-starting) scope first on ties
        (false, false) => a.end.cmp(&b.end).then(b.start.cmp(&a.start)),
        // `a` is ending while `b` is starting
        (false, true) => match a.end.cmp(&b.start) {
            Ordering::Equal => {
                if b.is_empty() {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            other => other,
        },
        (true, false) => match a.start.cmp(&b.end) {
            Ordering::Equal => {
                if a.is_empty() {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            other => other,
        },
    }
}

fn compare_backward(position: Position, a: Range, b: Range) -> Ordering {
    let a_end_visible = a.end <= position;
    let b_end_visible = b.end <= position;

    match (a_end_visible, b_end_visible) {
        (true, true) => b.end.cmp(&a.end).then(b.start.cmp(&a.start)),
        (false, false) => b.start.cmp(&a.start).then(a.end.cmp(&b.end)),
        (false, true) => match b.end.cmp(&a.start) {
            Ordering::Equal => {
                if b.is_empty() {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            other => other,
        },
        (true, false) => match b.start.cmp(&a.end) {
            Ordering::Equal => {
                if a.is_empty() {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            other => other,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scopes::ScopeKind;

    fn scope(start: u32, end: u32) -> Scope {
        Scope::simple(
            ScopeKind::Token,
            Range::new(Position::new(0, start), Position::new(0, end)),
        )
    }

    #[test]
    fn forward_orders_by_start_when_ahead() {
        let position = Position::new(0, 0);
        let mut scopes = vec![scope(4, 6), scope(1, 9), scope(1, 3)];
        scopes.sort_by(|a, b| compare_scopes(Direction::Forward, position, a, b));
        let starts: Vec<u32> = scopes.iter().map(|s| s.domain.start.character).collect();
        let ends: Vec<u32> = scopes.iter().map(|s| s.domain.end.character).collect();
        assert_eq!(starts, vec![1, 1, 4]);
        assert_eq!(ends, vec![3, 9, 6]);
    }

    #[test]
    fn forward_yields_entered_scopes_at_their_ends() {
        // Position inside nested pairs: inner pair ends first
        let position = Position::new(0, 5);
        let mut scopes = vec![scope(0, 10), scope(3, 7), scope(8, 9)];
        scopes.sort_by(|a, b| compare_scopes(Direction::Forward, position, a, b));
        let domains: Vec<(u32, u32)> = scopes
            .iter()
            .map(|s| (s.domain.start.character, s.domain.end.character))
            .collect();
        assert_eq!(domains, vec![(3, 7), (8, 9), (0, 10)]);
    }

    #[test]
    fn backward_is_mirrored() {
        let position = Position::new(0, 10);
        let mut scopes = vec![scope(0, 2), scope(4, 6), scope(7, 9)];
        scopes.sort_by(|a, b| compare_scopes(Direction::Backward, position, a, b));
        let starts: Vec<u32> = scopes.iter().map(|s| s.domain.start.character).collect();
        assert_eq!(starts, vec![7, 4, 0]);
    }
}
