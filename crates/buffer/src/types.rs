use std::cmp::Ordering;
use std::fmt;

/// Logical cursor coordinate as (column, row), both 0-indexed.
///
/// `row` is the index of the line within the document and `col` the
/// character offset within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    pub col: usize,
    pub row: usize,
}

impl Position {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        // Document order: row first, then column
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Row-level summary of what a changeset touched.
///
/// Renderers that repaint whole rows from the live document can use this
/// instead of the content snapshots carried by a
/// [`Changeset`](crate::Changeset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirtyLines {
    /// No rows changed (no-op command).
    None,
    /// A single row changed.
    Single(usize),
    /// Rows `[from, to)` changed.
    Range { from: usize, to: usize },
    /// Everything from a row to the end of the document changed.
    /// Used when lines were inserted or removed, shifting the rows below.
    FromLineToEnd(usize),
}

impl DirtyLines {
    /// Returns true if no rows were dirtied.
    pub fn is_none(&self) -> bool {
        matches!(self, DirtyLines::None)
    }

    /// Returns the first dirty row, if any.
    pub fn start_line(&self) -> Option<usize> {
        match self {
            DirtyLines::None => None,
            DirtyLines::Single(line) | DirtyLines::FromLineToEnd(line) => Some(*line),
            DirtyLines::Range { from, .. } => Some(*from),
        }
    }

    /// Merges another dirty region into this one, producing the smallest
    /// region that covers both.
    ///
    /// A renderer that drains several commands before painting folds each
    /// command's summary in here and repaints once.
    pub fn merge(&mut self, other: DirtyLines) {
        *self = match (&*self, &other) {
            (DirtyLines::None, _) => other,
            (_, DirtyLines::None) => return,

            (DirtyLines::FromLineToEnd(a), other) | (other, DirtyLines::FromLineToEnd(a)) => {
                let b = other.start_line().unwrap_or(*a);
                DirtyLines::FromLineToEnd((*a).min(b))
            }

            (DirtyLines::Single(a), DirtyLines::Single(b)) if a == b => DirtyLines::Single(*a),
            (DirtyLines::Single(a), DirtyLines::Single(b)) => DirtyLines::Range {
                from: (*a).min(*b),
                to: (*a).max(*b) + 1,
            },

            (DirtyLines::Single(a), DirtyLines::Range { from, to })
            | (DirtyLines::Range { from, to }, DirtyLines::Single(a)) => DirtyLines::Range {
                from: (*from).min(*a),
                to: (*to).max(*a + 1),
            },

            (DirtyLines::Range { from: a, to: b }, DirtyLines::Range { from: c, to: d }) => {
                DirtyLines::Range {
                    from: (*a).min(*c),
                    to: (*b).max(*d),
                }
            }
        };
    }
}
