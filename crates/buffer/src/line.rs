//! A single row of text.
//!
//! Lines never contain a newline; the line boundary is represented by the
//! arena that links lines together.

use std::fmt;

/// One row of text: an ordered, mutable sequence of characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    chars: Vec<char>,
}

impl Line {
    /// Creates an empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of characters in the line.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The characters of the line, in order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Inserts `ch` before the character at `col`.
    ///
    /// `col` is clamped to `len()`, so inserting past the end appends.
    pub fn insert(&mut self, col: usize, ch: char) {
        let col = col.min(self.chars.len());
        self.chars.insert(col, ch);
    }

    /// Removes and returns the character at `col`.
    ///
    /// Returns `None` when `col` is at or past the end of the line.
    pub fn remove(&mut self, col: usize) -> Option<char> {
        if col < self.chars.len() {
            Some(self.chars.remove(col))
        } else {
            None
        }
    }

    /// Splits the line at `col`, returning everything from `col` onward.
    ///
    /// `self` keeps the characters before `col`.
    pub fn split_off(&mut self, col: usize) -> Line {
        let col = col.min(self.chars.len());
        Line {
            chars: self.chars.split_off(col),
        }
    }

    /// Moves all characters of `other` onto the end of this line.
    pub fn append(&mut self, other: &mut Line) {
        self.chars.append(&mut other.chars);
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.chars {
            fmt::Write::write_char(f, *ch)?;
        }
        Ok(())
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }
}

impl FromIterator<char> for Line {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}
