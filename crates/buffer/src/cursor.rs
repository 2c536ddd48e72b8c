use crate::line_arena::LineId;
use crate::types::Position;

/// The edit position inside a [`Document`](crate::Document).
///
/// Holds a handle to the current line plus the logical position. The column
/// doubles as the in-line character offset (`0..=line.len()`, where `len` is
/// the insertion point after the last character). The row is a cache of the
/// line's index in the document, kept in lock-step by the edit engine so
/// reporting a position never walks the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub(crate) line: LineId,
    pub(crate) pos: Position,
}

impl Cursor {
    pub(crate) fn new(line: LineId, pos: Position) -> Self {
        Self { line, pos }
    }

    /// Handle to the line the cursor is on.
    pub fn line(&self) -> LineId {
        self.line
    }

    /// Character offset within the current line.
    pub fn col(&self) -> usize {
        self.pos.col
    }

    /// Cached (column, row) position.
    pub fn position(&self) -> Position {
        self.pos
    }
}
