//! jp-edit-buffer: the editable text model behind the jp-edit editor.
//!
//! This crate provides a line-oriented document with a cursor, the editing
//! commands that act at the cursor, and a report of exactly which rows each
//! command changed so a renderer can redraw minimally.
//!
//! # Overview
//!
//! The main type is [`TextBuffer`], which provides:
//! - Character insertion, forward delete and backspace at the cursor
//! - Line splitting ("enter") and joining
//! - Cursor movement with line wrap, plus home/end
//! - Whole-file load and save
//!
//! Lines live in a [`LineArena`] and are addressed by generation-checked
//! [`LineId`] handles, so inserting or removing a line never invalidates a
//! handle to any other line.
//!
//! # Example
//!
//! ```
//! use jp_edit_buffer::{DirtyLines, Position, TextBuffer};
//!
//! let mut buffer = TextBuffer::new();
//!
//! // Insert some text
//! buffer.insert_str("Hello, world!");
//! assert_eq!(buffer.line_count(), 1);
//! assert_eq!(buffer.line_content(0), "Hello, world!");
//!
//! // Split into multiple lines
//! buffer.move_left(7);
//! let changes = buffer.enter(1);
//! assert_eq!(changes.changed(), ["Hello,", " world!"]);
//! assert_eq!(changes.cursor_after(), Position::new(0, 1));
//! assert_eq!(changes.dirty_lines(), DirtyLines::FromLineToEnd(0));
//! assert_eq!(buffer.line_count(), 2);
//! ```
//!
//! # Changesets
//!
//! Each command returns a [`Changeset`] holding snapshots of the rows it
//! touched and the cursor position before and after. Compound commands fold
//! their steps together with [`Changeset::combine`], which refuses to merge
//! steps that do not follow one another.
//!
//! [`Changeset::dirty_lines`] condenses a changeset into a [`DirtyLines`]
//! value for renderers that repaint from the live document:
//!
//! - `DirtyLines::None` - No visual change (e.g., no-op at buffer boundary)
//! - `DirtyLines::Single(line)` - Only one line changed
//! - `DirtyLines::FromLineToEnd(line)` - All lines from `line` to the end changed
//!   (used when lines are split or joined)

mod changeset;
mod cursor;
mod document;
mod error;
mod line;
mod line_arena;
mod text_buffer;
mod types;

pub use changeset::Changeset;
pub use cursor::Cursor;
pub use document::Document;
pub use error::{BufferError, ChangesetError};
pub use line::Line;
pub use line_arena::{Iter, LineArena, LineId};
pub use text_buffer::TextBuffer;
pub use types::{DirtyLines, Position};
