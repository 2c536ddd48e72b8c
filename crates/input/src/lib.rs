//! Input event types for keyboard handling, and the commands they resolve to.
//!
//! These types abstract over terminal keycode details and provide a clean
//! Rust-native interface for input handling. Decoding raw terminal input into
//! [`KeyEvent`]s happens outside this crate; turning a [`KeyEvent`] into an
//! [`EditorCommand`] is the pure function [`resolve_command`].

mod command;

pub use command::{resolve_command, EditorCommand, ParseCommandError};

/// A keyboard event.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// The key that was pressed
    pub key: Key,
    /// Modifier keys held during the event
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Creates a new KeyEvent with the given key and modifiers.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Creates a KeyEvent for a single character with no modifiers.
    pub fn char(ch: char) -> Self {
        Self {
            key: Key::Char(ch),
            modifiers: Modifiers::default(),
        }
    }

    /// Creates a KeyEvent for a character with control held.
    pub fn ctrl(ch: char) -> Self {
        Self {
            key: Key::Char(ch),
            modifiers: Modifiers {
                control: true,
                ..Default::default()
            },
        }
    }

    /// Creates a KeyEvent for a non-character key with no modifiers.
    pub fn key(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }
}

/// Modifier keys that can be held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift key
    pub shift: bool,
    /// Control key
    pub control: bool,
    /// Alt / Meta key
    pub alt: bool,
}

impl Modifiers {
    /// Returns true if no modifier keys are held.
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.control && !self.alt
    }

    /// Returns true if only shift is held (for uppercase letters).
    pub fn is_shift_only(&self) -> bool {
        self.shift && !self.control && !self.alt
    }
}

/// Keys that can be pressed.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// A printable character (already accounts for shift state)
    Char(char),
    /// Backspace / Delete backward
    Backspace,
    /// Forward delete
    Delete,
    /// Return / Enter
    Return,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Home key
    Home,
    /// End key
    End,
    /// Tab key
    Tab,
    /// Escape key
    Escape,
}
