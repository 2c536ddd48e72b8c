//! The ordered collection of lines that makes up a file's in-memory state.
//!
//! Editing primitives take a [`Cursor`] and act on the line it names. A
//! cursor issued for another document (or naming a line that has since been
//! removed) does not resolve in this document's arena, so the primitive does
//! nothing and reports that through its return value.

use std::fs;
use std::io;
use std::path::Path;

use crate::cursor::Cursor;
use crate::error::BufferError;
use crate::line::Line;
use crate::line_arena::{Iter, LineArena, LineId};

/// A mutable, line-oriented document. Always holds at least one line.
#[derive(Debug, Default)]
pub struct Document {
    lines: LineArena,
}

impl Document {
    /// Creates a document with a single empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document from already-split rows.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            lines: LineArena::from_lines(lines.into_iter().map(|text| Line::from(text.as_ref()))),
        }
    }

    /// Creates a document from newline-delimited text.
    ///
    /// Rows are split on `\n` and kept verbatim, so text without a final
    /// newline still forms a last row and a final newline leaves an empty
    /// last row. [`to_text`](Self::to_text) is the exact inverse.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.split('\n'))
    }

    /// Reads a document from `path`.
    ///
    /// A missing file yields a document with one empty line, as for a new
    /// file that has not been written yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BufferError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                let document = Self::from_text(&text);
                tracing::debug!(path = %path.display(), lines = document.line_count(), "loaded document");
                Ok(document)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no file on disk, starting empty");
                Ok(Self::new())
            }
            Err(source) => Err(BufferError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Writes the document to `path`, lines joined by `\n` with no trailing
    /// newline after the last line.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BufferError> {
        let path = path.as_ref();
        fs::write(path, self.to_text()).map_err(|source| BufferError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), lines = self.line_count(), "saved document");
        Ok(())
    }

    // ==================== Accessors ====================

    /// Number of lines. Always at least 1.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The line at `row`, walking from the top. O(row).
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(self.lines.nth(row)?)
    }

    /// Iterates over all lines in document order.
    pub fn lines(&self) -> Iter<'_> {
        self.lines.iter()
    }

    /// The whole document as text, lines joined by `\n`.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (row, line) in self.lines.iter().enumerate() {
            if row > 0 {
                text.push('\n');
            }
            text.extend(line.chars());
        }
        text
    }

    /// Copies the content of up to `count` consecutive lines starting at
    /// `top`, in document order.
    pub fn snapshot(&self, top: LineId, count: usize) -> Vec<String> {
        let mut rows = Vec::with_capacity(count);
        let mut current = Some(top);
        while rows.len() < count {
            let Some(id) = current else { break };
            let Some(line) = self.lines.get(id) else { break };
            rows.push(line.to_string());
            current = self.lines.next(id);
        }
        rows
    }

    pub(crate) fn arena(&self) -> &LineArena {
        &self.lines
    }

    // ==================== Editing primitives ====================

    /// Moves everything from the cursor to the end of its line into a new
    /// line inserted directly below, leaving the current line truncated at
    /// the cursor. Returns the new line's handle.
    pub fn split_line(&mut self, at: &Cursor) -> Option<LineId> {
        let tail = self.lines.get_mut(at.line)?.split_off(at.col());
        self.lines.insert_after(at.line, tail)
    }

    /// Appends the next line's content to the cursor's line and removes the
    /// next line. Returns false if the cursor is on the last line.
    pub fn join_with_next(&mut self, at: &Cursor) -> bool {
        let Some(next) = self.lines.next(at.line) else {
            return false;
        };
        let Some(mut tail) = self.lines.remove(next) else {
            return false;
        };
        match self.lines.get_mut(at.line) {
            Some(line) => {
                line.append(&mut tail);
                true
            }
            None => false,
        }
    }

    /// Inserts `ch` immediately before the cursor's character position.
    pub fn insert_char(&mut self, at: &Cursor, ch: char) -> bool {
        match self.lines.get_mut(at.line) {
            Some(line) => {
                line.insert(at.col(), ch);
                true
            }
            None => false,
        }
    }

    /// Removes the character under the cursor.
    ///
    /// Returns `None` at the end of the line; the caller joins with the next
    /// line instead.
    pub fn erase_char(&mut self, at: &Cursor) -> Option<char> {
        self.lines.get_mut(at.line)?.remove(at.col())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn rows(doc: &Document) -> Vec<String> {
        doc.lines().map(|line| line.to_string()).collect()
    }

    fn cursor(doc: &Document, col: usize, row: usize) -> Cursor {
        let line = doc.arena().nth(row).unwrap();
        Cursor::new(line, Position::new(col, row))
    }

    // ==================== Construction ====================

    #[test]
    fn test_from_text_splits_rows() {
        let doc = Document::from_text("abc\ndef");
        assert_eq!(rows(&doc), vec!["abc", "def"]);
    }

    #[test]
    fn test_from_text_trailing_newline_leaves_empty_row() {
        assert_eq!(rows(&Document::from_text("abc\n")), vec!["abc", ""]);
        assert_eq!(rows(&Document::from_text("abc\n\n")), vec!["abc", "", ""]);
        assert_eq!(rows(&Document::from_text("\n")), vec!["", ""]);
        assert_eq!(Document::from_text("abc\n").to_text(), "abc\n");
    }

    #[test]
    fn test_from_text_empty_is_one_empty_line() {
        let doc = Document::from_text("");
        assert_eq!(doc.line_count(), 1);
        assert_eq!(rows(&doc), vec![""]);
    }

    #[test]
    fn test_from_text_keeps_whitespace_verbatim() {
        let doc = Document::from_text("\tindented  \n  \r");
        assert_eq!(rows(&doc), vec!["\tindented  ", "  \r"]);
    }

    #[test]
    fn test_to_text_has_no_trailing_newline() {
        let doc = Document::from_lines(["a", "", "b"]);
        assert_eq!(doc.to_text(), "a\n\nb");
    }

    // ==================== Editing primitives ====================

    #[test]
    fn test_split_line_moves_tail_below() {
        let mut doc = Document::from_text("hello world\nnext");
        let at = cursor(&doc, 5, 0);
        let new_line = doc.split_line(&at).unwrap();
        assert_eq!(rows(&doc), vec!["hello", " world", "next"]);
        assert_eq!(doc.arena().row_of(new_line), Some(1));
    }

    #[test]
    fn test_split_line_at_end_inserts_empty_line() {
        let mut doc = Document::from_text("abc");
        let at = cursor(&doc, 3, 0);
        doc.split_line(&at).unwrap();
        assert_eq!(rows(&doc), vec!["abc", ""]);
    }

    #[test]
    fn test_join_with_next() {
        let mut doc = Document::from_text("abc\ndef\nghi");
        let at = cursor(&doc, 3, 0);
        assert!(doc.join_with_next(&at));
        assert_eq!(rows(&doc), vec!["abcdef", "ghi"]);
    }

    #[test]
    fn test_join_with_next_on_last_line_is_noop() {
        let mut doc = Document::from_text("abc");
        let at = cursor(&doc, 3, 0);
        assert!(!doc.join_with_next(&at));
        assert_eq!(rows(&doc), vec!["abc"]);
    }

    #[test]
    fn test_insert_and_erase_char() {
        let mut doc = Document::from_text("ac");
        let at = cursor(&doc, 1, 0);
        assert!(doc.insert_char(&at, 'b'));
        assert_eq!(rows(&doc), vec!["abc"]);
        assert_eq!(doc.erase_char(&at), Some('b'));
        assert_eq!(rows(&doc), vec!["ac"]);
    }

    #[test]
    fn test_erase_char_at_line_end_is_noop() {
        let mut doc = Document::from_text("ab\ncd");
        let at = cursor(&doc, 2, 0);
        assert_eq!(doc.erase_char(&at), None);
        assert_eq!(rows(&doc), vec!["ab", "cd"]);
    }

    #[test]
    fn test_cursor_from_other_document_is_rejected() {
        let other = Document::from_text("zzz");
        let foreign = cursor(&other, 0, 0);

        let mut doc = Document::from_text("abc\ndef");
        assert!(!doc.insert_char(&foreign, 'x'));
        assert_eq!(doc.erase_char(&foreign), None);
        assert_eq!(doc.split_line(&foreign), None);
        assert!(!doc.join_with_next(&foreign));
        assert_eq!(rows(&doc), vec!["abc", "def"]);
    }

    #[test]
    fn test_snapshot_collects_consecutive_rows() {
        let doc = Document::from_text("a\nb\nc");
        let second = doc.arena().nth(1).unwrap();
        assert_eq!(doc.snapshot(second, 2), vec!["b", "c"]);
        assert_eq!(doc.snapshot(second, 5), vec!["b", "c"]);
        assert!(doc.snapshot(second, 0).is_empty());
    }

    // ==================== File I/O ====================

    #[test]
    fn test_load_missing_file_is_one_empty_line() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Document::load(dir.path().join("missing.txt")).unwrap();
        assert_eq!(rows(&doc), vec![""]);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        let doc = Document::from_lines(["first", "\tsecond ", "", "last"]);

        doc.save(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\n\tsecond \n\nlast");

        let loaded = Document::load(&path).unwrap();
        assert_eq!(rows(&loaded), rows(&doc));
    }

    #[test]
    fn test_trailing_empty_line_survives_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        let doc = Document::from_lines(["abc", ""]);

        doc.save(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "abc\n");
        assert_eq!(rows(&Document::load(&path).unwrap()), vec!["abc", ""]);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("file.txt");
        let doc = Document::from_text("keep me");

        let err = doc.save(&path).unwrap_err();
        assert!(matches!(err, BufferError::Write { .. }));
        assert_eq!(doc.to_text(), "keep me");
    }
}
