//! jp-edit: an editing session over the `jp-edit-buffer` text model.
//!
//! This crate ties the pieces together: a [`Session`] owns the open
//! documents and routes each [`EditorCommand`](jp_edit_input::EditorCommand)
//! to the active document's edit engine, [`Config`] holds user settings, and
//! [`script::run`] drives a session from newline-separated textual commands.

pub mod config;
pub mod script;
pub mod session;

pub use config::{Config, ConfigError};
pub use session::{DocumentId, OpenDocument, Outcome, Session, SessionError};
