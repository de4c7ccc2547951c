//! Offset ↔ position conversion.
//!
//! Editor offsets count characters (Unicode scalar values); LSP positions count UTF-16 code units
//! within a line. Lines break on `\n`, `\r\n` and a lone `\r`.
//!
//! Conversion never fails: lines past the end map to the document length and characters past the
//! end of a line clamp to the end of that line's content (before its line break).

use crate::protocol::{Position, Range};
use ropey::{Rope, RopeSlice};

fn line_content(text: &Rope, line: usize) -> RopeSlice<'_> {
    let slice = text.line(line);
    let len = slice.len_chars();
    let trim = match (
        len.checked_sub(2).map(|i| slice.char(i)),
        len.checked_sub(1).map(|i| slice.char(i)),
    ) {
        (Some('\r'), Some('\n')) => 2,
        (_, Some('\n' | '\r')) => 1,
        _ => 0,
    };
    slice.slice(..len - trim)
}

/// Convert `position` to a character offset in `text`.
pub fn offset_at(text: &Rope, position: Position) -> usize {
    let line = position.line as usize;
    if line >= text.len_lines() {
        return text.len_chars();
    }

    let content = line_content(text, line);
    let utf16 = (position.character as usize).min(content.len_utf16_cu());
    text.line_to_char(line) + content.utf16_cu_to_char(utf16)
}

/// Convert a character offset in `text` to a position. Offsets past the end clamp to the end.
pub fn position_at(text: &Rope, offset: usize) -> Position {
    let offset = offset.min(text.len_chars());
    let line = text.char_to_line(offset);
    let column = offset - text.line_to_char(line);
    let character = text.line(line).char_to_utf16_cu(column);
    Position::new(line as u32, character as u32)
}

/// Convert `range` to an ordered pair of character offsets.
///
/// Each endpoint is resolved against its own line; reversed ranges are swapped.
pub fn offsets_for_range(text: &Rope, range: &Range) -> (usize, usize) {
    let start = offset_at(text, range.start);
    let end = offset_at(text, range.end);
    (start.min(end), start.max(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_at_clamps_to_line_content() {
        let text = Rope::from_str("line1\nline2\r\nline3\rend");
        assert_eq!(offset_at(&text, Position::new(0, 1000)), 5);
        assert_eq!(offset_at(&text, Position::new(1, 1000)), 11);
        assert_eq!(offset_at(&text, Position::new(2, 1000)), 18);
        assert_eq!(offset_at(&text, Position::new(3, 1)), 20);
        assert_eq!(offset_at(&text, Position::new(9, 0)), text.len_chars());
    }

    #[test]
    fn test_utf16_columns() {
        // 😀 is two UTF-16 code units but one char.
        let text = Rope::from_str("a😀b\n");
        assert_eq!(offset_at(&text, Position::new(0, 3)), 2);
        assert_eq!(position_at(&text, 2), Position::new(0, 3));
        assert_eq!(position_at(&text, 3), Position::new(0, 4));
    }

    #[test]
    fn test_round_trip_every_offset() {
        let text = Rope::from_str("fn main() {\r\n\tlet é = \"😀\";\n}\r");
        for offset in 0..=text.len_chars() {
            assert_eq!(
                offset_at(&text, position_at(&text, offset)),
                offset_cap(&text, offset)
            );
        }
    }

    // Offsets between `\r` and `\n` of a CRLF pair normalize to the end of the line content.
    fn offset_cap(text: &Rope, offset: usize) -> usize {
        let len = text.len_chars();
        if offset > 0 && offset < len && text.char(offset - 1) == '\r' && text.char(offset) == '\n'
        {
            offset - 1
        } else {
            offset
        }
    }

    #[test]
    fn test_position_at_clamps() {
        let text = Rope::from_str("ab\ncd");
        assert_eq!(position_at(&text, 99), Position::new(1, 2));
        assert_eq!(position_at(&text, 3), Position::new(1, 0));
    }

    #[test]
    fn test_offsets_for_range_orders_endpoints() {
        let text = Rope::from_str("line1\nline2\n");
        let range = Range::new(Position::new(1, 0), Position::new(0, 1000));
        assert_eq!(offsets_for_range(&text, &range), (5, 6));
    }
}
