//! Scan-level value types: raw key input and completed scan codes.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::fmt;
use thiserror::Error;

/// A single keystroke as seen by the scan accumulator.
///
/// Keyboard-emulating scanners send the decoded text one character at a time,
/// optionally followed by Enter. Nothing else on the keyboard is relevant to
/// scan reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKeyEvent {
    /// A printable character.
    Char(char),
    /// The Enter key (scan terminator).
    Enter,
}

impl RawKeyEvent {
    /// Convert a terminal key event into a raw scan key.
    ///
    /// Returns `None` for key releases/repeats, non-character keys, and
    /// characters typed with Ctrl or Alt held. Shift is allowed since
    /// scanners emit upper-case letters with it.
    pub fn from_key_event(key: &KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let modifiers = key.modifiers.difference(KeyModifiers::SHIFT);
        if !modifiers.is_empty() {
            return None;
        }

        match key.code {
            KeyCode::Enter => Some(RawKeyEvent::Enter),
            KeyCode::Char(c) => Some(RawKeyEvent::Char(c)),
            _ => None,
        }
    }
}

/// Error returned when constructing a [`ScanCode`] from blank text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("scan code must contain at least one non-whitespace character")]
pub struct EmptyScanCode;

/// The trimmed text of a completed scan.
///
/// Always non-empty. Comparison is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScanCode(String);

impl ScanCode {
    /// Create a scan code from raw text, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyScanCode`] if nothing remains after trimming.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmptyScanCode> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmptyScanCode);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the code text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the code, returning the owned text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ScanCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A scan reconstructed by the accumulator.
pub type CompletedScan = ScanCode;
