//! Text document buffer and position arithmetic
//!
//! LSP positions count UTF-16 code units while Rust strings are UTF-8, so
//! every piece of completion logic that slices a line or shifts a cursor
//! goes through the helpers here instead of doing byte math directly.

use std::path::PathBuf;

use tower_lsp::lsp_types::{Position, Range};
use url::Url;

/// An open (or disk-loaded) markdown document: its URI plus full content.
///
/// Deliberately opaque to the completion logic — strategies only see line
/// text, positions, and the resolved file path.
#[derive(Debug, Clone)]
pub struct TextDocument {
    pub uri: Url,
    pub content: String,
}

impl TextDocument {
    pub fn new(uri: Url, content: impl Into<String>) -> Self {
        Self {
            uri,
            content: content.into(),
        }
    }

    /// Text of the given 0-indexed line, without its terminator.
    pub fn line(&self, line: u32) -> Option<&str> {
        self.content.lines().nth(line as usize)
    }

    /// Filesystem path for `file://` documents; `None` for other schemes.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.uri.to_file_path().ok()
    }
}

/// Convert a UTF-16 code unit offset to the corresponding byte offset in a
/// UTF-8 string.
///
/// Returns `None` if `utf16_offset` is beyond the end of the string.
pub fn utf16_to_byte_offset(s: &str, utf16_offset: usize) -> Option<usize> {
    let mut byte_pos = 0;
    let mut utf16_pos = 0;
    for ch in s.chars() {
        if utf16_pos >= utf16_offset {
            return Some(byte_pos);
        }
        byte_pos += ch.len_utf8();
        utf16_pos += ch.len_utf16();
    }
    // Cursor at the very end of the string is valid.
    if utf16_pos >= utf16_offset { Some(byte_pos) } else { None }
}

/// Length of a string in UTF-16 code units.
pub fn utf16_len(s: &str) -> u32 {
    s.chars().map(|c| c.len_utf16() as u32).sum()
}

/// Shift a position backward by `n` UTF-16 code units on the same line.
pub fn shift_back(position: Position, n: u32) -> Position {
    Position {
        line: position.line,
        character: position.character.saturating_sub(n),
    }
}

/// Shift a position forward by `n` UTF-16 code units on the same line.
pub fn shift_forward(position: Position, n: u32) -> Position {
    Position {
        line: position.line,
        character: position.character + n,
    }
}

/// Half-open range `[start, end)` between two positions on the same line.
pub fn range_between(start: Position, end: Position) -> Range {
    Range { start, end }
}
