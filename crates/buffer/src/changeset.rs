//! What a single editing command changed, for incremental redraw.
//!
//! A [`Changeset`] carries snapshots of every row the command touched, top
//! to bottom, together with the cursor position before and after the
//! command. Snapshots are copies, so a changeset stays valid after the
//! document is edited again.
//!
//! # Row bounds
//!
//! `top_row` and `bottom_row` are the smallest and largest cursor rows seen
//! by the command. When `changed` is not empty it holds exactly one entry
//! per row in `top_row..=bottom_row`. A command that neither edits nor moves
//! the cursor reports no rows.
//!
//! `row_shift` counts lines inserted (positive) or removed (negative)
//! directly below `bottom_row`. When it is non-zero every row below
//! `bottom_row` has moved and must be repainted from the live document.
//!
//! # Combining
//!
//! Compound commands (backspace is move-left then delete) build one
//! changeset per step and fold them together with [`Changeset::combine`],
//! so the renderer repaints each row once with its final content and moves
//! the cursor once.

use crate::document::Document;
use crate::error::ChangesetError;
use crate::line_arena::LineId;
use crate::types::{DirtyLines, Position};

/// Rows changed and cursor motion caused by one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changeset {
    changed: Vec<String>,
    cursor_before: Position,
    cursor_after: Position,
    top_row: usize,
    bottom_row: usize,
    row_shift: isize,
}

impl Changeset {
    /// A changeset with no rows where the cursor stayed at `at`.
    pub fn unchanged(at: Position) -> Self {
        Self::from_rows(Vec::new(), at, at)
    }

    /// Snapshots `count` consecutive lines starting at `top`.
    ///
    /// `top` must be the line at the smaller of the two cursor rows and
    /// `count` either 0 or the number of rows between the cursors, inclusive.
    pub(crate) fn capture(
        document: &Document,
        top: LineId,
        count: usize,
        before: Position,
        after: Position,
    ) -> Self {
        Self::from_rows(document.snapshot(top, count), before, after)
    }

    pub(crate) fn from_rows(changed: Vec<String>, before: Position, after: Position) -> Self {
        let changeset = Self {
            changed,
            cursor_before: before,
            cursor_after: after,
            top_row: before.row.min(after.row),
            bottom_row: before.row.max(after.row),
            row_shift: 0,
        };
        debug_assert!(
            changeset.changed.is_empty() || changeset.changed.len() == changeset.row_span(),
            "changeset holds {} rows for bounds {}..={}",
            changeset.changed.len(),
            changeset.top_row,
            changeset.bottom_row,
        );
        changeset
    }

    pub(crate) fn with_row_shift(mut self, row_shift: isize) -> Self {
        self.row_shift = row_shift;
        self
    }

    // ==================== Accessors ====================

    /// Snapshots of the changed rows, top to bottom.
    pub fn changed(&self) -> &[String] {
        &self.changed
    }

    /// Changed rows paired with their row index.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.changed
            .iter()
            .enumerate()
            .map(|(offset, text)| (self.top_row + offset, text.as_str()))
    }

    pub fn cursor_before(&self) -> Position {
        self.cursor_before
    }

    pub fn cursor_after(&self) -> Position {
        self.cursor_after
    }

    pub fn top_row(&self) -> usize {
        self.top_row
    }

    pub fn bottom_row(&self) -> usize {
        self.bottom_row
    }

    /// Net lines inserted (+) or removed (-) below `bottom_row`.
    pub fn row_shift(&self) -> isize {
        self.row_shift
    }

    /// Returns true if no rows were reported.
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn cursor_moved(&self) -> bool {
        self.cursor_before != self.cursor_after
    }

    /// Row-level summary for renderers that repaint from the live document.
    pub fn dirty_lines(&self) -> DirtyLines {
        if self.row_shift != 0 {
            DirtyLines::FromLineToEnd(self.top_row)
        } else if self.changed.is_empty() {
            DirtyLines::None
        } else if self.top_row == self.bottom_row {
            DirtyLines::Single(self.top_row)
        } else {
            DirtyLines::Range {
                from: self.top_row,
                to: self.bottom_row + 1,
            }
        }
    }

    // ==================== Combining ====================

    /// Folds `later`, produced by the command step right after this one,
    /// into this changeset.
    ///
    /// `later` must start where this changeset ended
    /// (`later.cursor_before == self.cursor_after`); otherwise nothing is
    /// changed and [`ChangesetError::NotAdjacent`] is returned.
    ///
    /// Rows present in both take `later`'s content. Rows of `later` above or
    /// below this changeset's range are prepended or appended. If `later`
    /// inserted or removed lines, rows of this changeset below `later`'s
    /// range no longer hold the content shown at those rows, so they are
    /// dropped; they are covered by the accumulated `row_shift`.
    pub fn combine(&mut self, later: Changeset) -> Result<(), ChangesetError> {
        if later.cursor_before != self.cursor_after {
            return Err(ChangesetError::NotAdjacent {
                expected: self.cursor_after,
                found: later.cursor_before,
            });
        }

        if later.row_shift != 0 && !self.changed.is_empty() && self.bottom_row > later.bottom_row {
            let keep = (later.bottom_row + 1).saturating_sub(self.top_row);
            self.changed.truncate(keep);
            self.bottom_row = later.bottom_row.max(self.top_row);
        }

        if self.changed.is_empty() {
            if !later.changed.is_empty() {
                self.changed = later.changed;
                self.top_row = later.top_row;
                self.bottom_row = later.bottom_row;
            }
        } else if !later.changed.is_empty() {
            let mut above = Vec::new();
            for (offset, text) in later.changed.into_iter().enumerate() {
                let row = later.top_row + offset;
                if row < self.top_row {
                    above.push(text);
                } else if row <= self.bottom_row {
                    self.changed[row - self.top_row] = text;
                } else {
                    self.changed.push(text);
                }
            }
            self.changed.splice(0..0, above);
            self.top_row = self.top_row.min(later.top_row);
            self.bottom_row = self.bottom_row.max(later.bottom_row);
        }

        self.cursor_after = later.cursor_after;
        self.row_shift += later.row_shift;
        debug_assert!(self.changed.is_empty() || self.changed.len() == self.row_span());
        Ok(())
    }

    fn row_span(&self) -> usize {
        self.bottom_row - self.top_row + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changeset(rows: &[&str], before: (usize, usize), after: (usize, usize)) -> Changeset {
        Changeset::from_rows(
            rows.iter().map(|row| row.to_string()).collect(),
            Position::new(before.0, before.1),
            Position::new(after.0, after.1),
        )
    }

    // ==================== Construction ====================

    #[test]
    fn test_bounds_follow_cursor_rows() {
        let up = changeset(&["b", "c", "d"], (4, 3), (0, 1));
        assert_eq!(up.top_row(), 1);
        assert_eq!(up.bottom_row(), 3);
        let rows: Vec<_> = up.rows().collect();
        assert_eq!(rows, vec![(1, "b"), (2, "c"), (3, "d")]);
    }

    #[test]
    fn test_unchanged_reports_nothing() {
        let cs = Changeset::unchanged(Position::new(2, 5));
        assert!(cs.is_empty());
        assert!(!cs.cursor_moved());
        assert_eq!(cs.top_row(), 5);
        assert_eq!(cs.bottom_row(), 5);
        assert_eq!(cs.dirty_lines(), DirtyLines::None);
    }

    #[test]
    fn test_dirty_lines_summary() {
        assert_eq!(
            changeset(&["x"], (0, 2), (1, 2)).dirty_lines(),
            DirtyLines::Single(2)
        );
        assert_eq!(
            changeset(&["x", "y"], (0, 2), (0, 3)).dirty_lines(),
            DirtyLines::Range { from: 2, to: 4 }
        );
        assert_eq!(
            changeset(&["x", ""], (1, 2), (0, 3))
                .with_row_shift(1)
                .dirty_lines(),
            DirtyLines::FromLineToEnd(2)
        );
    }

    // ==================== Combine ====================

    #[test]
    fn test_combine_rejects_non_adjacent() {
        let mut first = changeset(&["ab"], (2, 0), (1, 0));
        let original = first.clone();
        let stray = changeset(&["ab"], (2, 0), (2, 0));

        let err = first.combine(stray).unwrap_err();
        assert_eq!(
            err,
            ChangesetError::NotAdjacent {
                expected: Position::new(1, 0),
                found: Position::new(2, 0),
            }
        );
        assert_eq!(first, original);
    }

    #[test]
    fn test_combine_same_row_takes_later_content() {
        // backspace at (2, 0) in "abc": move left, then delete
        let mut acc = changeset(&["abc"], (2, 0), (1, 0));
        acc.combine(changeset(&["ac"], (1, 0), (1, 0))).unwrap();

        assert_eq!(acc.changed(), ["ac"]);
        assert_eq!(acc.cursor_before(), Position::new(2, 0));
        assert_eq!(acc.cursor_after(), Position::new(1, 0));
        assert_eq!((acc.top_row(), acc.bottom_row()), (0, 0));
    }

    #[test]
    fn test_combine_into_empty_takes_later_rows() {
        let mut acc = Changeset::unchanged(Position::new(0, 1));
        acc.combine(changeset(&["abc", "def"], (0, 1), (3, 0))).unwrap();
        assert_eq!(acc.changed(), ["abc", "def"]);
        assert_eq!((acc.top_row(), acc.bottom_row()), (0, 1));
    }

    #[test]
    fn test_combine_with_empty_keeps_rows() {
        let mut acc = changeset(&["abc"], (0, 0), (1, 0));
        acc.combine(Changeset::unchanged(Position::new(1, 0))).unwrap();
        assert_eq!(acc.changed(), ["abc"]);
        assert_eq!(acc.cursor_after(), Position::new(1, 0));
    }

    #[test]
    fn test_combine_prepends_rows_above() {
        let mut acc = changeset(&["c"], (0, 2), (1, 2));
        acc.combine(changeset(&["a", "b", "c2"], (1, 2), (0, 0))).unwrap();
        assert_eq!(acc.changed(), ["a", "b", "c2"]);
        assert_eq!((acc.top_row(), acc.bottom_row()), (0, 2));
        assert_eq!(acc.cursor_after(), Position::new(0, 0));
    }

    #[test]
    fn test_combine_appends_rows_below() {
        let mut acc = changeset(&["a"], (0, 0), (1, 0));
        acc.combine(changeset(&["a", "b", "c"], (1, 0), (0, 2))).unwrap();
        assert_eq!(acc.changed(), ["a", "b", "c"]);
        assert_eq!((acc.top_row(), acc.bottom_row()), (0, 2));
    }

    #[test]
    fn test_combine_after_join_drops_rows_below() {
        // backspace at (0, 1) in ["abc", "def"]: wrap left, then join
        let mut acc = changeset(&["abc", "def"], (0, 1), (3, 0));
        acc.combine(changeset(&["abcdef"], (3, 0), (3, 0)).with_row_shift(-1))
            .unwrap();

        assert_eq!(acc.changed(), ["abcdef"]);
        assert_eq!((acc.top_row(), acc.bottom_row()), (0, 0));
        assert_eq!(acc.row_shift(), -1);
        assert_eq!(acc.cursor_before(), Position::new(0, 1));
        assert_eq!(acc.cursor_after(), Position::new(3, 0));
        assert_eq!(acc.dirty_lines(), DirtyLines::FromLineToEnd(0));
    }

    #[test]
    fn test_combine_accumulates_row_shift() {
        let mut acc = changeset(&["ab"], (0, 0), (0, 0)).with_row_shift(-1);
        acc.combine(changeset(&["abc"], (0, 0), (0, 0)).with_row_shift(-1))
            .unwrap();
        assert_eq!(acc.row_shift(), -2);
    }
}
