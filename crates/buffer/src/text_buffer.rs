//! TextBuffer is the edit engine: the public API for text editing operations.
//!
//! It owns one [`Document`] and the [`Cursor`] into it, so a cursor can never
//! be paired with a foreign document. Every command returns a [`Changeset`]
//! describing the rows it touched and how the cursor moved, enabling
//! downstream rendering to minimize redraws.
//!
//! Commands with a repeat count clamp at the document boundaries. Running
//! out of room is not an error: the changeset reflects the steps that
//! actually happened, possibly none.

use std::path::Path;

use crate::changeset::Changeset;
use crate::cursor::Cursor;
use crate::document::Document;
use crate::error::BufferError;
use crate::line::Line;
use crate::line_arena::Iter;
use crate::types::Position;

/// A document with cursor tracking and changeset reporting.
#[derive(Debug)]
pub struct TextBuffer {
    document: Document,
    cursor: Cursor,
    /// Mutation counter for sampling debug assertions (debug builds only).
    #[cfg(debug_assertions)]
    debug_mutation_count: u64,
}

impl TextBuffer {
    /// Creates a buffer holding a single empty line.
    pub fn new() -> Self {
        Self::from_document(Document::new())
    }

    /// Creates a buffer with the cursor at the start of `document`.
    pub fn from_document(document: Document) -> Self {
        let cursor = Cursor::new(document.arena().first(), Position::default());
        Self {
            document,
            cursor,
            #[cfg(debug_assertions)]
            debug_mutation_count: 0,
        }
    }

    /// Creates a text buffer initialized with the given content.
    ///
    /// Note: We don't implement `FromStr` because it requires returning `Result`,
    /// but parsing a string into a TextBuffer cannot fail.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Self {
        Self::from_document(Document::from_text(content))
    }

    /// Loads `path` into a new buffer. A missing file starts empty.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BufferError> {
        Ok(Self::from_document(Document::load(path)?))
    }

    /// Writes the buffer to `path`. The buffer stays usable on failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BufferError> {
        self.document.save(path)
    }

    // ==================== Accessors ====================

    /// Returns the current cursor position.
    pub fn cursor_position(&self) -> Position {
        self.cursor.pos
    }

    /// Returns the number of lines in the buffer.
    ///
    /// Always at least 1 (even for an empty buffer).
    pub fn line_count(&self) -> usize {
        self.document.line_count()
    }

    /// Returns the content of `row`, or an empty string past the last line.
    pub fn line_content(&self, row: usize) -> String {
        self.document
            .line(row)
            .map(Line::to_string)
            .unwrap_or_default()
    }

    /// Returns the length of `row` in characters (0 past the last line).
    pub fn line_len(&self, row: usize) -> usize {
        self.document.line(row).map_or(0, Line::len)
    }

    /// Iterates over all lines in document order.
    pub fn lines(&self) -> Iter<'_> {
        self.document.lines()
    }

    /// Returns the entire content as a string, lines joined by `\n`.
    pub fn content(&self) -> String {
        self.document.to_text()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn current_len(&self) -> usize {
        self.document
            .arena()
            .get(self.cursor.line)
            .map_or(0, Line::len)
    }

    fn at_document_start(&self) -> bool {
        self.cursor.pos.col == 0 && self.document.arena().prev(self.cursor.line).is_none()
    }

    /// Changeset for a command that only moved the cursor: every row between
    /// the old and new cursor rows, or nothing if the cursor stayed put.
    fn motion(&self, before: Cursor) -> Changeset {
        let after = self.cursor;
        if before.pos == after.pos {
            return Changeset::unchanged(after.pos);
        }
        let top = if before.pos.row <= after.pos.row {
            before.line
        } else {
            after.line
        };
        let count = before.pos.row.abs_diff(after.pos.row) + 1;
        Changeset::capture(&self.document, top, count, before.pos, after.pos)
    }

    /// Folds one step of a compound command into its accumulated changeset.
    fn merge(acc: &mut Changeset, step: Changeset) {
        if let Err(err) = acc.combine(step) {
            tracing::error!(%err, "compound command produced non-adjacent steps");
            panic!("compound command produced non-adjacent steps: {err}");
        }
    }

    // ==================== Cursor Movement ====================

    /// Moves the cursor left by `n` characters, wrapping to the end of the
    /// previous line. Each wrap consumes one step.
    pub fn move_left(&mut self, n: usize) -> Changeset {
        let before = self.cursor;
        for _ in 0..n {
            if self.cursor.pos.col > 0 {
                self.cursor.pos.col -= 1;
            } else if let Some(prev) = self.document.arena().prev(self.cursor.line) {
                self.cursor.line = prev;
                self.cursor.pos.row -= 1;
                self.cursor.pos.col = self.current_len();
            } else {
                break;
            }
        }
        tracing::trace!(n, cursor = %self.cursor.pos, "move_left");
        self.assert_cursor_consistent();
        self.motion(before)
    }

    /// Moves the cursor right by `n` characters, wrapping to the start of the
    /// next line. Each wrap consumes one step.
    pub fn move_right(&mut self, n: usize) -> Changeset {
        let before = self.cursor;
        for _ in 0..n {
            if self.cursor.pos.col < self.current_len() {
                self.cursor.pos.col += 1;
            } else if let Some(next) = self.document.arena().next(self.cursor.line) {
                self.cursor.line = next;
                self.cursor.pos.row += 1;
                self.cursor.pos.col = 0;
            } else {
                break;
            }
        }
        tracing::trace!(n, cursor = %self.cursor.pos, "move_right");
        self.assert_cursor_consistent();
        self.motion(before)
    }

    /// Moves the cursor up by `n` lines, clamped at the first line, and
    /// places it at column 0.
    pub fn move_up(&mut self, n: usize) -> Changeset {
        let before = self.cursor;
        if n == 0 {
            return Changeset::unchanged(before.pos);
        }
        for _ in 0..n {
            let Some(prev) = self.document.arena().prev(self.cursor.line) else {
                break;
            };
            self.cursor.line = prev;
            self.cursor.pos.row -= 1;
        }
        self.cursor.pos.col = 0;
        tracing::trace!(n, cursor = %self.cursor.pos, "move_up");
        self.assert_cursor_consistent();
        self.motion(before)
    }

    /// Moves the cursor down by `n` lines, clamped at the last line, and
    /// places it at column 0.
    pub fn move_down(&mut self, n: usize) -> Changeset {
        let before = self.cursor;
        if n == 0 {
            return Changeset::unchanged(before.pos);
        }
        for _ in 0..n {
            let Some(next) = self.document.arena().next(self.cursor.line) else {
                break;
            };
            self.cursor.line = next;
            self.cursor.pos.row += 1;
        }
        self.cursor.pos.col = 0;
        tracing::trace!(n, cursor = %self.cursor.pos, "move_down");
        self.assert_cursor_consistent();
        self.motion(before)
    }

    /// Moves the cursor to the start of the current line.
    pub fn home(&mut self) -> Changeset {
        let before = self.cursor;
        self.cursor.pos.col = 0;
        tracing::trace!(cursor = %self.cursor.pos, "home");
        self.motion(before)
    }

    /// Moves the cursor past the last character of the current line.
    pub fn end(&mut self) -> Changeset {
        let before = self.cursor;
        self.cursor.pos.col = self.current_len();
        tracing::trace!(cursor = %self.cursor.pos, "end");
        self.motion(before)
    }

    /// Moves the cursor to the start of the first line.
    pub fn move_to_buffer_start(&mut self) -> Changeset {
        let before = self.cursor;
        self.cursor = Cursor::new(self.document.arena().first(), Position::default());
        tracing::trace!(cursor = %self.cursor.pos, "move_to_buffer_start");
        self.motion(before)
    }

    /// Moves the cursor past the last character of the last line.
    pub fn move_to_buffer_end(&mut self) -> Changeset {
        let before = self.cursor;
        let last = self.document.arena().last();
        let row = self.document.line_count() - 1;
        self.cursor = Cursor::new(last, Position::new(0, row));
        self.cursor.pos.col = self.current_len();
        tracing::trace!(cursor = %self.cursor.pos, "move_to_buffer_end");
        self.motion(before)
    }

    // ==================== Validation ====================

    /// Debug assertion: verifies that the cached position matches the one
    /// derived from the line handle.
    ///
    /// Deriving the row walks the document, so only every 64th mutation is
    /// checked. Compiled out in release builds.
    #[cfg(debug_assertions)]
    fn assert_cursor_consistent(&mut self) {
        self.debug_mutation_count += 1;
        if self.debug_mutation_count % 64 != 0 {
            return;
        }
        let row = self.document.arena().row_of(self.cursor.line);
        assert_eq!(
            row,
            Some(self.cursor.pos.row),
            "cursor drift detected after {} mutations!\n  cursor: {:?}\n  line count: {}",
            self.debug_mutation_count,
            self.cursor,
            self.document.line_count(),
        );
        assert!(
            self.cursor.pos.col <= self.current_len(),
            "cursor column {} past end of line (len {})",
            self.cursor.pos.col,
            self.current_len(),
        );
    }

    #[cfg(not(debug_assertions))]
    fn assert_cursor_consistent(&mut self) {}

    // ==================== Mutations ====================

    /// Inserts a character before the cursor and advances past it.
    ///
    /// `'\n'` splits the line, exactly like [`enter(1)`](Self::enter).
    pub fn insert(&mut self, ch: char) -> Changeset {
        if ch == '\n' {
            return self.enter(1);
        }
        let before = self.cursor;
        if !self.document.insert_char(&self.cursor, ch) {
            return Changeset::unchanged(before.pos);
        }
        self.cursor.pos.col += 1;
        tracing::trace!(?ch, cursor = %self.cursor.pos, "insert");
        self.assert_cursor_consistent();
        Changeset::capture(&self.document, self.cursor.line, 1, before.pos, self.cursor.pos)
    }

    /// Inserts each character of `text` in turn, as one command.
    pub fn insert_str(&mut self, text: &str) -> Changeset {
        let mut acc = Changeset::unchanged(self.cursor.pos);
        for ch in text.chars() {
            let step = self.insert(ch);
            Self::merge(&mut acc, step);
        }
        acc
    }

    /// Deletes up to `n` characters at the cursor. At the end of a line the
    /// next line is joined onto the current one, which counts as one step.
    ///
    /// The cursor never moves.
    pub fn delete(&mut self, n: usize) -> Changeset {
        let before = self.cursor;
        let mut steps = 0;
        let mut joins: isize = 0;
        for _ in 0..n {
            if self.document.erase_char(&self.cursor).is_some() {
                steps += 1;
            } else if self.document.join_with_next(&self.cursor) {
                steps += 1;
                joins += 1;
            } else {
                break;
            }
        }
        tracing::trace!(n, steps, joins, cursor = %self.cursor.pos, "delete");
        if steps == 0 {
            return Changeset::unchanged(before.pos);
        }
        self.assert_cursor_consistent();
        Changeset::capture(&self.document, self.cursor.line, 1, before.pos, self.cursor.pos)
            .with_row_shift(-joins)
    }

    /// Deletes up to `n` characters before the cursor, joining with the
    /// previous line at column 0.
    ///
    /// Each press is a move left followed by a delete; the steps are folded
    /// into one changeset.
    pub fn backspace(&mut self, n: usize) -> Changeset {
        let mut acc = Changeset::unchanged(self.cursor.pos);
        for _ in 0..n {
            if self.at_document_start() {
                break;
            }
            let left = self.move_left(1);
            Self::merge(&mut acc, left);
            let delete = self.delete(1);
            Self::merge(&mut acc, delete);
        }
        tracing::trace!(n, cursor = %self.cursor.pos, "backspace");
        acc
    }

    /// Splits the line at the cursor `n` times. The cursor ends at the start
    /// of the last new line, which holds the text that followed the cursor.
    pub fn enter(&mut self, n: usize) -> Changeset {
        let before = self.cursor;
        let mut inserted: usize = 0;
        for _ in 0..n {
            let Some(new_line) = self.document.split_line(&self.cursor) else {
                break;
            };
            self.cursor = Cursor::new(new_line, Position::new(0, self.cursor.pos.row + 1));
            inserted += 1;
        }
        tracing::trace!(n, cursor = %self.cursor.pos, "enter");
        if inserted == 0 {
            return Changeset::unchanged(before.pos);
        }
        self.assert_cursor_consistent();
        Changeset::capture(&self.document, before.line, inserted + 1, before.pos, self.cursor.pos)
            .with_row_shift(inserted as isize)
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DirtyLines;

    fn at(content: &str, col: usize, row: usize) -> TextBuffer {
        let mut buf = TextBuffer::from_str(content);
        buf.move_down(row);
        buf.move_right(col);
        assert_eq!(buf.cursor_position(), Position::new(col, row));
        buf
    }

    fn rows(buf: &TextBuffer) -> Vec<String> {
        buf.lines().map(|line| line.to_string()).collect()
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_buffer_is_one_empty_line() {
        let buf = TextBuffer::new();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.content(), "");
        assert_eq!(buf.cursor_position(), Position::new(0, 0));
    }

    #[test]
    fn test_line_content_past_end_is_empty() {
        let buf = TextBuffer::from_str("abc");
        assert_eq!(buf.line_content(0), "abc");
        assert_eq!(buf.line_content(5), "");
        assert_eq!(buf.line_len(0), 3);
        assert_eq!(buf.line_len(5), 0);
    }

    // ==================== Cursor Movement Tests ====================

    #[test]
    fn test_move_left_at_start_clamps() {
        let mut buf = TextBuffer::from_str("ab");
        let cs = buf.move_left(1);
        assert_eq!(buf.cursor_position(), Position::new(0, 0));
        assert!(cs.is_empty());
        assert_eq!(cs.cursor_before(), cs.cursor_after());
    }

    #[test]
    fn test_move_left_wraps_to_previous_line_end() {
        let mut buf = at("abc\ndef", 1, 1);
        let cs = buf.move_left(2);
        assert_eq!(buf.cursor_position(), Position::new(3, 0));
        assert_eq!(cs.changed(), ["abc", "def"]);
        assert_eq!(cs.cursor_before(), Position::new(1, 1));
        assert_eq!(cs.cursor_after(), Position::new(3, 0));
    }

    #[test]
    fn test_move_right_wraps_and_clamps_at_end() {
        let mut buf = TextBuffer::from_str("ab\nc");
        buf.move_right(3);
        assert_eq!(buf.cursor_position(), Position::new(0, 1));
        buf.move_right(10);
        assert_eq!(buf.cursor_position(), Position::new(1, 1));
    }

    #[test]
    fn test_move_within_line_reports_single_row() {
        let mut buf = TextBuffer::from_str("abc\ndef");
        let cs = buf.move_right(2);
        assert_eq!(cs.changed(), ["abc"]);
        assert_eq!(cs.dirty_lines(), DirtyLines::Single(0));
    }

    #[test]
    fn test_move_up_resets_column() {
        let mut buf = at("abc\ndef\nghi", 2, 2);
        let cs = buf.move_up(1);
        assert_eq!(buf.cursor_position(), Position::new(0, 1));
        assert_eq!(cs.changed(), ["def", "ghi"]);
        assert_eq!((cs.top_row(), cs.bottom_row()), (1, 2));
    }

    #[test]
    fn test_move_up_at_top_still_resets_column() {
        let mut buf = at("abc", 2, 0);
        let cs = buf.move_up(3);
        assert_eq!(buf.cursor_position(), Position::new(0, 0));
        assert_eq!(cs.changed(), ["abc"]);
    }

    #[test]
    fn test_move_down_clamps_at_last_line() {
        let mut buf = TextBuffer::from_str("a\nb\nc");
        let cs = buf.move_down(10);
        assert_eq!(buf.cursor_position(), Position::new(0, 2));
        assert_eq!(cs.changed(), ["a", "b", "c"]);
    }

    #[test]
    fn test_zero_count_is_noop() {
        let mut buf = at("abc\ndef", 1, 1);
        for cs in [
            buf.move_up(0),
            buf.move_down(0),
            buf.move_left(0),
            buf.move_right(0),
            buf.delete(0),
            buf.backspace(0),
            buf.enter(0),
        ] {
            assert!(cs.is_empty());
            assert!(!cs.cursor_moved());
        }
        assert_eq!(buf.cursor_position(), Position::new(1, 1));
        assert_eq!(buf.content(), "abc\ndef");
    }

    #[test]
    fn test_home_and_end() {
        let mut buf = at("hello", 2, 0);
        buf.end();
        assert_eq!(buf.cursor_position(), Position::new(5, 0));
        buf.home();
        assert_eq!(buf.cursor_position(), Position::new(0, 0));
        let cs = buf.home();
        assert!(cs.is_empty());
    }

    #[test]
    fn test_buffer_start_and_end() {
        let mut buf = TextBuffer::from_str("ab\ncd\nefg");
        let cs = buf.move_to_buffer_end();
        assert_eq!(buf.cursor_position(), Position::new(3, 2));
        assert_eq!(cs.changed().len(), 3);
        buf.move_to_buffer_start();
        assert_eq!(buf.cursor_position(), Position::new(0, 0));
    }

    // ==================== Insert Tests ====================

    #[test]
    fn test_insert_advances_cursor() {
        let mut buf = at("ac", 1, 0);
        let cs = buf.insert('b');
        assert_eq!(buf.content(), "abc");
        assert_eq!(buf.cursor_position(), Position::new(2, 0));
        assert_eq!(cs.changed(), ["abc"]);
        assert_eq!(cs.cursor_before(), Position::new(1, 0));
        assert_eq!(cs.row_shift(), 0);
    }

    #[test]
    fn test_insert_newline_splits() {
        let mut buf = at("helloworld", 5, 0);
        let cs = buf.insert('\n');
        assert_eq!(rows(&buf), vec!["hello", "world"]);
        assert_eq!(cs.row_shift(), 1);
    }

    #[test]
    fn test_insert_str_is_one_changeset() {
        let mut buf = TextBuffer::new();
        let cs = buf.insert_str("ab\ncd");
        assert_eq!(rows(&buf), vec!["ab", "cd"]);
        assert_eq!(cs.changed(), ["ab", "cd"]);
        assert_eq!(cs.cursor_before(), Position::new(0, 0));
        assert_eq!(cs.cursor_after(), Position::new(2, 1));
        assert_eq!(cs.row_shift(), 1);
    }

    // ==================== Delete Tests ====================

    #[test]
    fn test_delete_at_line_end_joins_without_moving() {
        let mut buf = at("abc\ndef", 3, 0);
        let cs = buf.delete(1);
        assert_eq!(rows(&buf), vec!["abcdef"]);
        assert_eq!(cs.changed(), ["abcdef"]);
        assert_eq!(cs.cursor_before(), Position::new(3, 0));
        assert_eq!(cs.cursor_after(), Position::new(3, 0));
        assert_eq!(cs.row_shift(), -1);
    }

    #[test]
    fn test_delete_counts_joins_as_steps() {
        let mut buf = at("ab\ncd", 1, 0);
        let cs = buf.delete(3);
        assert_eq!(rows(&buf), vec!["ad"]);
        assert_eq!(cs.row_shift(), -1);
    }

    #[test]
    fn test_delete_at_document_end_is_noop() {
        let mut buf = at("ab", 2, 0);
        let cs = buf.delete(4);
        assert_eq!(buf.content(), "ab");
        assert!(cs.is_empty());
    }

    // ==================== Backspace Tests ====================

    #[test]
    fn test_backspace_within_line() {
        let mut buf = at("abc", 2, 0);
        let cs = buf.backspace(1);
        assert_eq!(buf.content(), "ac");
        assert_eq!(buf.cursor_position(), Position::new(1, 0));
        assert_eq!(cs.changed(), ["ac"]);
        assert_eq!(cs.cursor_before(), Position::new(2, 0));
        assert_eq!(cs.cursor_after(), Position::new(1, 0));
    }

    #[test]
    fn test_backspace_at_line_start_joins() {
        let mut buf = at("abc\ndef\nghi", 0, 1);
        let cs = buf.backspace(1);
        assert_eq!(rows(&buf), vec!["abcdef", "ghi"]);
        assert_eq!(buf.cursor_position(), Position::new(3, 0));
        assert_eq!(cs.changed(), ["abcdef"]);
        assert_eq!(cs.row_shift(), -1);
        assert_eq!(cs.dirty_lines(), DirtyLines::FromLineToEnd(0));
    }

    #[test]
    fn test_backspace_stops_at_document_start() {
        let mut buf = at("ab\nc", 1, 1);
        let cs = buf.backspace(10);
        assert_eq!(buf.content(), "");
        assert_eq!(buf.cursor_position(), Position::new(0, 0));
        assert_eq!(cs.changed(), [""]);
        assert_eq!(cs.cursor_before(), Position::new(1, 1));
        assert_eq!(cs.row_shift(), -1);
    }

    // ==================== Enter Tests ====================

    #[test]
    fn test_enter_moves_tail_to_new_line() {
        let mut buf = at("abcd", 2, 0);
        let cs = buf.enter(1);
        assert_eq!(rows(&buf), vec!["ab", "cd"]);
        assert_eq!(buf.cursor_position(), Position::new(0, 1));
        assert_eq!(cs.changed(), ["ab", "cd"]);
        assert_eq!(cs.row_shift(), 1);
    }

    #[test]
    fn test_enter_repeated_carries_tail_down() {
        let mut buf = at("abcd\nx", 2, 0);
        let cs = buf.enter(3);
        assert_eq!(rows(&buf), vec!["ab", "", "", "cd", "x"]);
        assert_eq!(buf.cursor_position(), Position::new(0, 3));
        assert_eq!(cs.changed(), ["ab", "", "", "cd"]);
        assert_eq!((cs.top_row(), cs.bottom_row()), (0, 3));
        assert_eq!(cs.row_shift(), 3);
    }

    #[test]
    fn test_enter_then_backspace_restores_line() {
        let mut buf = at("hello", 3, 0);
        buf.enter(1);
        buf.backspace(1);
        assert_eq!(rows(&buf), vec!["hello"]);
        assert_eq!(buf.cursor_position(), Position::new(3, 0));
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_many_mutations_keep_cursor_consistent() {
        let mut buf = TextBuffer::new();
        for i in 0..500 {
            if i % 7 == 6 {
                buf.enter(1);
            } else {
                buf.insert('x');
            }
            if i % 11 == 10 {
                buf.move_up(1);
                buf.end();
            }
        }
        let row = buf.document().arena().row_of(buf.cursor.line);
        assert_eq!(row, Some(buf.cursor_position().row));
    }
}
