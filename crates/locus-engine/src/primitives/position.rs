use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in a document: zero-based line and UTF-16 code-unit column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    pub fn is_before(&self, other: Position) -> bool {
        *self < other
    }

    pub fn is_after(&self, other: Position) -> bool {
        *self > other
    }

    pub fn is_before_or_equal(&self, other: Position) -> bool {
        *self <= other
    }

    pub fn is_after_or_equal(&self, other: Position) -> bool {
        *self >= other
    }

    pub fn compare(&self, other: Position) -> Ordering {
        self.cmp(&other)
    }

    /// Position shifted within the same line.
    pub fn translate(&self, characters: i64) -> Position {
        let character = (self.character as i64 + characters).max(0) as u32;
        Position::new(self.line, character)
    }

    pub fn with_character(&self, character: u32) -> Position {
        Position::new(self.line, character)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_line_major() {
        assert!(Position::new(0, 10).is_before(Position::new(1, 0)));
        assert!(Position::new(2, 3).is_after(Position::new(2, 2)));
        assert!(Position::new(2, 3).is_before_or_equal(Position::new(2, 3)));
    }

    #[test]
    fn translate_clamps_at_line_start() {
        assert_eq!(Position::new(1, 2).translate(-5), Position::new(1, 0));
        assert_eq!(Position::new(1, 2).translate(3), Position::new(1, 5));
    }
}
