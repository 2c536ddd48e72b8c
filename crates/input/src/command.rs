use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{Key, KeyEvent};

/// Commands the editor understands, independent of how they were entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    /// Insert a character at the cursor
    Insert(char),
    /// Insert text at the cursor as one edit
    Type(String),
    /// Insert a tab (or spaces, depending on configuration)
    InsertTab,
    /// Move cursor up by n lines
    MoveUp(usize),
    /// Move cursor down by n lines
    MoveDown(usize),
    /// Move cursor left by n characters
    MoveLeft(usize),
    /// Move cursor right by n characters
    MoveRight(usize),
    /// Delete n characters before the cursor
    Backspace(usize),
    /// Delete n characters at the cursor
    Delete(usize),
    /// Split the line at the cursor n times
    Enter(usize),
    /// Move cursor to the start of the line
    Home,
    /// Move cursor to the end of the line
    End,
    /// Move cursor to the start of the buffer
    BufferStart,
    /// Move cursor to the end of the buffer
    BufferEnd,
    /// Write the active document to its file
    Save,
    /// Switch to the next open document
    NextDocument,
    /// Switch to the previous open document
    PreviousDocument,
    /// Stop reading input
    Quit,
}

/// Resolves a key event to a command.
///
/// This is a pure stateless function: (modifiers, key) → Option<EditorCommand>.
/// All chords are single-step modifier+key combinations, so no state machine
/// is needed.
pub fn resolve_command(event: &KeyEvent) -> Option<EditorCommand> {
    let mods = &event.modifiers;

    match &event.key {
        // Ctrl chords
        Key::Char('s') if mods.control => Some(EditorCommand::Save),
        Key::Char('n') if mods.control => Some(EditorCommand::NextDocument),
        Key::Char('p') if mods.control => Some(EditorCommand::PreviousDocument),
        // Emacs-style line start/end
        Key::Char('a') if mods.control => Some(EditorCommand::Home),
        Key::Char('e') if mods.control => Some(EditorCommand::End),

        // Printable characters (no modifier, or shift for uppercase)
        Key::Char(ch) if mods.is_empty() || mods.is_shift_only() => {
            Some(EditorCommand::Insert(*ch))
        }

        Key::Return if !mods.control => Some(EditorCommand::Enter(1)),
        Key::Tab if !mods.control => Some(EditorCommand::InsertTab),
        Key::Backspace => Some(EditorCommand::Backspace(1)),
        Key::Delete => Some(EditorCommand::Delete(1)),

        // Arrow keys
        Key::Left => Some(EditorCommand::MoveLeft(1)),
        Key::Right => Some(EditorCommand::MoveRight(1)),
        Key::Up => Some(EditorCommand::MoveUp(1)),
        Key::Down => Some(EditorCommand::MoveDown(1)),

        // Ctrl+Home / Ctrl+End → buffer start / end
        Key::Home if mods.control => Some(EditorCommand::BufferStart),
        Key::End if mods.control => Some(EditorCommand::BufferEnd),
        Key::Home => Some(EditorCommand::Home),
        Key::End => Some(EditorCommand::End),

        Key::Escape => Some(EditorCommand::Quit),

        // Unhandled
        _ => None,
    }
}

/// Errors from parsing the textual command language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` expects a count, got `{value}`")]
    InvalidCount { command: String, value: String },
    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: String,
        expected: &'static str,
    },
    #[error("unexpected argument `{argument}` after `{command}`")]
    UnexpectedArgument { command: String, argument: String },
}

impl FromStr for EditorCommand {
    type Err = ParseCommandError;

    /// Parses one command line: a word, optionally followed by a count
    /// (`left 3`), a character (`insert x`) or, for `type`, the rest of the
    /// line verbatim.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        if word.is_empty() {
            return Err(ParseCommandError::Empty);
        }
        if word == "type" {
            if rest.is_empty() {
                return Err(ParseCommandError::MissingArgument {
                    command: word.to_string(),
                    expected: "text",
                });
            }
            return Ok(EditorCommand::Type(rest.to_string()));
        }

        let mut args = rest.split_whitespace();
        let arg = args.next();
        if let Some(extra) = args.next() {
            return Err(ParseCommandError::UnexpectedArgument {
                command: word.to_string(),
                argument: extra.to_string(),
            });
        }

        let counted = |make: fn(usize) -> EditorCommand| -> Result<EditorCommand, ParseCommandError> {
            match arg {
                None => Ok(make(1)),
                Some(value) => value.parse().map(make).map_err(|_| ParseCommandError::InvalidCount {
                    command: word.to_string(),
                    value: value.to_string(),
                }),
            }
        };
        let bare = |command: EditorCommand| -> Result<EditorCommand, ParseCommandError> {
            match arg {
                None => Ok(command),
                Some(argument) => Err(ParseCommandError::UnexpectedArgument {
                    command: word.to_string(),
                    argument: argument.to_string(),
                }),
            }
        };

        match word {
            "left" => counted(EditorCommand::MoveLeft),
            "right" => counted(EditorCommand::MoveRight),
            "up" => counted(EditorCommand::MoveUp),
            "down" => counted(EditorCommand::MoveDown),
            "backspace" => counted(EditorCommand::Backspace),
            "delete" => counted(EditorCommand::Delete),
            "enter" => counted(EditorCommand::Enter),
            "insert" => parse_char(word, arg).map(EditorCommand::Insert),
            "home" => bare(EditorCommand::Home),
            "end" => bare(EditorCommand::End),
            "top" => bare(EditorCommand::BufferStart),
            "bottom" => bare(EditorCommand::BufferEnd),
            "tab" => bare(EditorCommand::InsertTab),
            "save" => bare(EditorCommand::Save),
            "next" => bare(EditorCommand::NextDocument),
            "prev" => bare(EditorCommand::PreviousDocument),
            "quit" => bare(EditorCommand::Quit),
            other => Err(ParseCommandError::UnknownCommand(other.to_string())),
        }
    }
}

/// A single character, or `space` for ' '.
fn parse_char(word: &str, arg: Option<&str>) -> Result<char, ParseCommandError> {
    let missing = || ParseCommandError::MissingArgument {
        command: word.to_string(),
        expected: "a single character",
    };
    let arg = arg.ok_or_else(missing)?;
    if arg == "space" {
        return Ok(' ');
    }
    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(missing()),
    }
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorCommand::Insert(' ') => write!(f, "insert space"),
            EditorCommand::Insert(ch) => write!(f, "insert {ch}"),
            EditorCommand::Type(text) => write!(f, "type {text}"),
            EditorCommand::InsertTab => write!(f, "tab"),
            EditorCommand::MoveUp(n) => write!(f, "up {n}"),
            EditorCommand::MoveDown(n) => write!(f, "down {n}"),
            EditorCommand::MoveLeft(n) => write!(f, "left {n}"),
            EditorCommand::MoveRight(n) => write!(f, "right {n}"),
            EditorCommand::Backspace(n) => write!(f, "backspace {n}"),
            EditorCommand::Delete(n) => write!(f, "delete {n}"),
            EditorCommand::Enter(n) => write!(f, "enter {n}"),
            EditorCommand::Home => write!(f, "home"),
            EditorCommand::End => write!(f, "end"),
            EditorCommand::BufferStart => write!(f, "top"),
            EditorCommand::BufferEnd => write!(f, "bottom"),
            EditorCommand::Save => write!(f, "save"),
            EditorCommand::NextDocument => write!(f, "next"),
            EditorCommand::PreviousDocument => write!(f, "prev"),
            EditorCommand::Quit => write!(f, "quit"),
        }
    }
}
