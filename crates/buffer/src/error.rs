use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::Position;

/// Errors from loading or saving a document.
///
/// A failed save leaves the in-memory document untouched and editable.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors from stitching changesets together.
///
/// These indicate a bug in a compound command, never bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangesetError {
    /// The later changeset does not start where the earlier one ended.
    #[error("changesets are not adjacent: earlier ends at {expected}, later starts at {found}")]
    NotAdjacent { expected: Position, found: Position },
}
