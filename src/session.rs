//! Editing session: the open documents, which one is active, and dispatch
//! of [`EditorCommand`]s to the active document's edit engine.
//!
//! A session always holds at least one document. It starts with an empty
//! scratch document, which the first [`Session::open`] replaces as long as
//! it is still untouched.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use jp_edit_buffer::{BufferError, Changeset, DirtyLines, TextBuffer};
use jp_edit_input::EditorCommand;
use thiserror::Error;

use crate::config::Config;

/// Normalized path used to tell whether a file is already open.
///
/// A file that does not exist yet is keyed by its canonical parent directory
/// joined with its name, so the key stays the same once a save creates it.
fn document_key(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Identifies an open document within a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(usize);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error("document {0} has no file path")]
    NoPath(DocumentId),
    #[error("no open document {0}")]
    UnknownDocument(DocumentId),
}

/// A document together with where it lives on disk.
#[derive(Debug)]
pub struct OpenDocument {
    buffer: TextBuffer,
    path: Option<PathBuf>,
    modified: bool,
    /// Rows changed since the last [`take_dirty`](Self::take_dirty).
    dirty: DirtyLines,
}

impl OpenDocument {
    fn new(buffer: TextBuffer, path: Option<PathBuf>) -> Self {
        Self {
            buffer,
            path,
            modified: false,
            dirty: DirtyLines::None,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The file this document is saved to; `None` for a scratch document.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True if the document was edited since it was loaded or last saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns the rows to repaint since the last call and resets the
    /// accumulated region.
    pub fn take_dirty(&mut self) -> DirtyLines {
        std::mem::replace(&mut self.dirty, DirtyLines::None)
    }

    fn is_pristine_scratch(&self) -> bool {
        self.path.is_none() && !self.modified && self.buffer.content().is_empty()
    }
}

/// The result of applying one command.
#[derive(Debug)]
pub enum Outcome {
    /// The active document ran an editing or motion command.
    Changed {
        document: DocumentId,
        changeset: Changeset,
    },
    Saved {
        document: DocumentId,
        path: PathBuf,
    },
    /// A save was attempted and failed; the document is unchanged.
    SaveFailed {
        document: DocumentId,
        error: SessionError,
    },
    /// Another document became active.
    Switched { document: DocumentId },
    Quit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Changed {
                document,
                changeset,
            } => {
                if changeset.is_empty() {
                    return write!(f, "{document} unchanged at {}", changeset.cursor_after());
                }
                write!(
                    f,
                    "{document} rows {}..={} cursor {} -> {}",
                    changeset.top_row(),
                    changeset.bottom_row(),
                    changeset.cursor_before(),
                    changeset.cursor_after(),
                )?;
                if changeset.row_shift() != 0 {
                    write!(f, " shift {:+}", changeset.row_shift())?;
                }
                Ok(())
            }
            Outcome::Saved { document, path } => {
                write!(f, "{document} saved {}", path.display())
            }
            Outcome::SaveFailed { document, error } => {
                write!(f, "{document} save failed: {error}")
            }
            Outcome::Switched { document } => write!(f, "switched to {document}"),
            Outcome::Quit => write!(f, "quit"),
        }
    }
}

/// Open documents plus the selected one.
#[derive(Debug)]
pub struct Session {
    config: Config,
    documents: Vec<OpenDocument>,
    active: usize,
}

impl Session {
    /// Creates a session holding one empty scratch document.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            documents: vec![OpenDocument::new(TextBuffer::new(), None)],
            active: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Documents ====================

    /// Opens `path` and makes it the active document.
    ///
    /// A path that is already open is selected instead of loaded twice. A
    /// missing file opens as an empty document that is created on save.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<DocumentId, SessionError> {
        let path = path.as_ref();
        let key = document_key(path);
        if let Some(index) = self
            .documents
            .iter()
            .position(|doc| doc.path.as_deref() == Some(key.as_path()))
        {
            tracing::debug!(path = %path.display(), "document already open");
            self.active = index;
            return Ok(DocumentId(index));
        }

        let opened = OpenDocument::new(TextBuffer::load(path)?, Some(key));
        if self.documents.len() == 1 && self.documents[0].is_pristine_scratch() {
            self.documents[0] = opened;
            self.active = 0;
        } else {
            self.documents.push(opened);
            self.active = self.documents.len() - 1;
        }
        tracing::debug!(path = %path.display(), document = %self.active_id(), "opened document");
        Ok(self.active_id())
    }

    /// Adds an empty document with no path and makes it active.
    pub fn open_scratch(&mut self) -> DocumentId {
        self.documents.push(OpenDocument::new(TextBuffer::new(), None));
        self.active = self.documents.len() - 1;
        self.active_id()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: DocumentId) -> Option<&OpenDocument> {
        self.documents.get(id.0)
    }

    /// Iterates over the open documents in the order they were opened.
    pub fn documents(&self) -> impl Iterator<Item = (DocumentId, &OpenDocument)> + '_ {
        self.documents
            .iter()
            .enumerate()
            .map(|(index, doc)| (DocumentId(index), doc))
    }

    // ==================== Selection ====================

    pub fn active_id(&self) -> DocumentId {
        DocumentId(self.active)
    }

    pub fn active(&self) -> &OpenDocument {
        &self.documents[self.active]
    }

    pub fn active_mut(&mut self) -> &mut OpenDocument {
        &mut self.documents[self.active]
    }

    pub fn select(&mut self, id: DocumentId) -> Result<(), SessionError> {
        if id.0 >= self.documents.len() {
            return Err(SessionError::UnknownDocument(id));
        }
        self.active = id.0;
        Ok(())
    }

    /// Selects the next document, wrapping around after the last.
    pub fn select_next(&mut self) -> DocumentId {
        self.active = (self.active + 1) % self.documents.len();
        self.active_id()
    }

    /// Selects the previous document, wrapping around before the first.
    pub fn select_previous(&mut self) -> DocumentId {
        self.active = (self.active + self.documents.len() - 1) % self.documents.len();
        self.active_id()
    }

    // ==================== Commands ====================

    /// Writes the active document to its path.
    ///
    /// On failure the document keeps its content and stays marked modified.
    pub fn save_active(&mut self) -> Result<PathBuf, SessionError> {
        let id = self.active_id();
        let doc = self.active_mut();
        let path = doc.path.clone().ok_or(SessionError::NoPath(id))?;
        doc.buffer.save(&path)?;
        doc.modified = false;
        tracing::debug!(document = %id, path = %path.display(), "saved document");
        Ok(path)
    }

    /// Applies one command to the session.
    pub fn apply(&mut self, command: EditorCommand) -> Outcome {
        tracing::debug!(%command, document = %self.active_id(), "apply");
        match command {
            EditorCommand::Quit => Outcome::Quit,
            EditorCommand::Save => {
                let document = self.active_id();
                match self.save_active() {
                    Ok(path) => Outcome::Saved { document, path },
                    Err(error) => {
                        tracing::warn!(%document, %error, "save failed");
                        Outcome::SaveFailed { document, error }
                    }
                }
            }
            EditorCommand::NextDocument => Outcome::Switched {
                document: self.select_next(),
            },
            EditorCommand::PreviousDocument => Outcome::Switched {
                document: self.select_previous(),
            },
            command => self.edit_active(command),
        }
    }

    /// Runs an editing or motion command on the active document.
    fn edit_active(&mut self, command: EditorCommand) -> Outcome {
        let tab = self.config.tab_text();
        let document = self.active_id();
        let doc = self.active_mut();
        let buffer = &mut doc.buffer;

        let (changeset, edits) = match command {
            EditorCommand::Insert(ch) => (buffer.insert(ch), true),
            EditorCommand::Type(text) => (buffer.insert_str(&text), true),
            EditorCommand::InsertTab => (buffer.insert_str(&tab), true),
            EditorCommand::Backspace(n) => (buffer.backspace(n), true),
            EditorCommand::Delete(n) => (buffer.delete(n), true),
            EditorCommand::Enter(n) => (buffer.enter(n), true),
            EditorCommand::MoveUp(n) => (buffer.move_up(n), false),
            EditorCommand::MoveDown(n) => (buffer.move_down(n), false),
            EditorCommand::MoveLeft(n) => (buffer.move_left(n), false),
            EditorCommand::MoveRight(n) => (buffer.move_right(n), false),
            EditorCommand::Home => (buffer.home(), false),
            EditorCommand::End => (buffer.end(), false),
            EditorCommand::BufferStart => (buffer.move_to_buffer_start(), false),
            EditorCommand::BufferEnd => (buffer.move_to_buffer_end(), false),
            EditorCommand::Save
            | EditorCommand::NextDocument
            | EditorCommand::PreviousDocument
            | EditorCommand::Quit => (Changeset::unchanged(buffer.cursor_position()), false),
        };

        if edits && !changeset.is_empty() {
            doc.modified = true;
        }
        doc.dirty.merge(changeset.dirty_lines());
        Outcome::Changed {
            document,
            changeset,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
