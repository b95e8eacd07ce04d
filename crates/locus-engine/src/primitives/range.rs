use std::fmt;

use serde::{Deserialize, Serialize};

use super::Position;

/// A text range with `start <= end`. Degenerate (empty) ranges are legal and
/// represent cursor positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Constructs a range, swapping the endpoints if they are reversed.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn empty(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains_position(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    pub fn contains(&self, other: Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when this range properly contains `other` (contains it and is not
    /// equal to it).
    pub fn strictly_contains(&self, other: Range) -> bool {
        self.contains(other) && *self != other
    }

    pub fn intersects(&self, other: Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn union(&self, other: Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn intersection(&self, other: Range) -> Option<Range> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start <= end {
            Some(Range { start, end })
        } else {
            None
        }
    }

    pub fn to_empty_start(&self) -> Range {
        Range::empty(self.start)
    }

    pub fn to_empty_end(&self) -> Range {
        Range::empty(self.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
        Range::new(Position::new(sl, sc), Position::new(el, ec))
    }

    #[test]
    fn new_normalizes_reversed_endpoints() {
        let r = Range::new(Position::new(2, 0), Position::new(1, 5));
        assert_eq!(r.start, Position::new(1, 5));
        assert_eq!(r.end, Position::new(2, 0));
    }

    #[test]
    fn containment_is_inclusive() {
        let outer = range(0, 0, 0, 10);
        assert!(outer.contains(range(0, 0, 0, 10)));
        assert!(outer.contains(range(0, 3, 0, 7)));
        assert!(!outer.contains(range(0, 3, 1, 0)));
        assert!(outer.contains_position(Position::new(0, 10)));
        assert!(!outer.strictly_contains(range(0, 0, 0, 10)));
    }

    #[test]
    fn intersection_and_union() {
        let a = range(0, 0, 0, 5);
        let b = range(0, 3, 0, 8);
        assert_eq!(a.intersection(b), Some(range(0, 3, 0, 5)));
        assert_eq!(a.union(b), range(0, 0, 0, 8));
        assert!(a.intersects(b));
        assert!(!a.intersects(range(1, 0, 1, 1)));
        // Touching ranges intersect in a degenerate range
        assert_eq!(a.intersection(range(0, 5, 0, 9)), Some(range(0, 5, 0, 5)));
    }
}
