//! The engine's view of an editor document.
//!
//! The host editor owns the real buffer; the engine only needs read access
//! plus a `version` counter for cache invalidation, so the boundary is a
//! small trait. [`TextDocument`] is the in-memory implementation used by the
//! CLI and the test suite, backed by an `xi_rope::Rope` with a precomputed
//! line index.
//!
//! All `Position` columns are UTF-16 code units (see [`crate::primitives`]),
//! while the rope is indexed by bytes, so every crossing of that boundary
//! goes through the conversion helpers at the bottom of this module.

use std::borrow::Cow;

use xi_rope::Rope;

use crate::primitives::{Position, Range};

pub trait Document {
    fn language_id(&self) -> &str;

    /// Monotonic counter incremented on every edit.
    fn version(&self) -> u64;

    fn line_count(&self) -> u32;

    /// Text of the given line, without its line terminator.
    fn line_text(&self, line: u32) -> String;

    fn text(&self) -> String;

    /// Byte offset for a position, clamping to line/document bounds.
    fn offset_at(&self, position: Position) -> usize;

    /// Position for a byte offset, clamping to document bounds.
    fn position_at(&self, offset: usize) -> Position;

    fn text_in(&self, range: Range) -> String {
        let start = self.offset_at(range.start);
        let end = self.offset_at(range.end);
        let text = self.text();
        text[start.min(text.len())..end.min(text.len())].to_string()
    }

    fn full_range(&self) -> Range {
        let last = self.line_count().saturating_sub(1);
        Range::new(
            Position::new(0, 0),
            Position::new(last, utf16_len(&self.line_text(last)) as u32),
        )
    }

    /// Range covering the given line's content (not the terminator).
    fn line_range(&self, line: u32) -> Range {
        Range::new(
            Position::new(line, 0),
            Position::new(line, utf16_len(&self.line_text(line)) as u32),
        )
    }
}

/// In-memory document over an `xi_rope::Rope` buffer.
pub struct TextDocument {
    buffer: Rope,
    /// Byte offset of the start of each line. Always non-empty.
    line_starts: Vec<usize>,
    version: u64,
    language_id: String,
}

impl TextDocument {
    pub fn new(language_id: impl Into<String>, text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            line_starts: compute_line_starts(text),
            version: 0,
            language_id: language_id.into(),
        }
    }

    /// Replaces the entire content, bumping the version. The engine never
    /// edits documents itself; this exists for hosts that push fresh
    /// snapshots rather than deltas.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = Rope::from(text);
        self.line_starts = compute_line_starts(text);
        self.version += 1;
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    fn slice_to_cow(&self, range: std::ops::Range<usize>) -> Cow<'_, str> {
        let doc_len = self.buffer.len();

        // Clamp to document bounds to prevent xi-rope panics
        let start = range.start.min(doc_len);
        let end = range.end.min(doc_len).max(start);

        self.buffer.slice_to_cow(start..end)
    }

    fn line_byte_range(&self, line: u32) -> std::ops::Range<usize> {
        let line = line as usize;
        let start = self.line_starts[line.min(self.line_starts.len() - 1)];
        let end = if line + 1 < self.line_starts.len() {
            self.line_starts[line + 1]
        } else {
            self.buffer.len()
        };
        start..end
    }
}

impl Document for TextDocument {
    fn language_id(&self) -> &str {
        &self.language_id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    fn line_text(&self, line: u32) -> String {
        let range = self.line_byte_range(line);
        let text = self.slice_to_cow(range);
        text.trim_end_matches('\n').trim_end_matches('\r').to_string()
    }

    fn text(&self) -> String {
        self.buffer.to_string()
    }

    fn offset_at(&self, position: Position) -> usize {
        let line = position.line.min(self.line_count() - 1);
        let line_text = self.line_text(line);
        let start = self.line_byte_range(line).start;
        start + byte_offset_for_utf16(&line_text, position.character as usize)
    }

    fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.buffer.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insertion) => insertion - 1,
        };
        let line_text = self.line_text(line as u32);
        let byte_in_line = (offset - self.line_starts[line]).min(line_text.len());
        Position::new(
            line as u32,
            utf16_offset_for_byte(&line_text, byte_in_line) as u32,
        )
    }
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

pub(crate) fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Byte offset of the `utf16`-th UTF-16 code unit in `s`, clamped to `s.len()`.
pub(crate) fn byte_offset_for_utf16(s: &str, utf16: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in s.char_indices() {
        if units >= utf16 {
            return byte;
        }
        units += ch.len_utf16();
    }
    s.len()
}

pub(crate) fn utf16_offset_for_byte(s: &str, byte: usize) -> usize {
    let mut units = 0;
    for (b, ch) in s.char_indices() {
        if b >= byte {
            return units;
        }
        units += ch.len_utf16();
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_index_round_trip() {
        let doc = TextDocument::new("rust", "fn main() {\n    let x = 1;\n}\n");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.line_text(0), "fn main() {");
        assert_eq!(doc.line_text(1), "    let x = 1;");
        assert_eq!(doc.line_text(3), "");

        let pos = Position::new(1, 8);
        assert_eq!(doc.position_at(doc.offset_at(pos)), pos);
    }

    #[test]
    fn offsets_use_utf16_columns() {
        // '𝕩' is one char, two UTF-16 code units, four bytes
        let doc = TextDocument::new("rust", "let 𝕩 = 1;\n");
        let after_x = Position::new(0, 6);
        assert_eq!(doc.offset_at(after_x), "let 𝕩".len());
        assert_eq!(doc.position_at("let 𝕩".len()), after_x);
    }

    #[test]
    fn text_in_range_slices_between_lines() {
        let doc = TextDocument::new("rust", "foo\nbar\nbaz\n");
        let range = Range::new(Position::new(0, 1), Position::new(1, 2));
        assert_eq!(doc.text_in(range), "oo\nba");
    }

    #[test]
    fn set_text_bumps_version() {
        let mut doc = TextDocument::new("rust", "a\n");
        assert_eq!(doc.version(), 0);
        doc.set_text("b\n");
        assert_eq!(doc.version(), 1);
        assert_eq!(doc.text(), "b\n");
    }

    #[test]
    fn full_range_spans_document() {
        let doc = TextDocument::new("rust", "foo\nbar");
        assert_eq!(
            doc.full_range(),
            Range::new(Position::new(0, 0), Position::new(1, 3))
        );
    }
}
