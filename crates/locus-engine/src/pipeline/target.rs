use serde::Serialize;

use crate::primitives::{Position, Range};
use crate::scopes::Scope;

/// A resolved text target: the concrete answer to one mark + modifier
/// chain. `that_target` indexes the previous command's target arena when
/// this target was derived from a `That` mark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub content_range: Range,
    pub removal_range: Option<Range>,
    pub is_reversed: bool,
    pub insertion_delimiter: String,
    pub that_target: Option<usize>,
}

impl Target {
    pub fn from_range(range: Range) -> Self {
        Self {
            content_range: range,
            removal_range: None,
            is_reversed: false,
            insertion_delimiter: String::new(),
            that_target: None,
        }
    }

    pub fn from_scope(scope: &Scope) -> Self {
        Self {
            content_range: scope.content_range,
            removal_range: scope.removal_range,
            is_reversed: false,
            insertion_delimiter: scope.insertion_delimiter.to_string(),
            that_target: None,
        }
    }

    /// Range an action would delete: the removal range when one exists,
    /// else the content range.
    pub fn removal(&self) -> Range {
        self.removal_range.unwrap_or(self.content_range)
    }

    /// The moving end of the selection.
    pub fn active_position(&self) -> Position {
        if self.is_reversed {
            self.content_range.start
        } else {
            self.content_range.end
        }
    }
}
