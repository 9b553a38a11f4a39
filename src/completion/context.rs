//! Completion context classification
//!
//! Given one line of text and the cursor position on it, decide whether the
//! cursor sits inside an unterminated inline-link target `[text](…`, inside
//! a reference-link key `[text][…`, or in neither, and extract the typed
//! prefix, the trailing suffix, and any `#anchor` fragment.
//!
//! The patterns anchor at the end of the text before the cursor, so only the
//! link target immediately enclosing the cursor is detected — a line with
//! two inline links `[a](b) [c](d` only classifies the second. They are a
//! frozen contract: nested or escaped brackets are out of scope.

use std::sync::LazyLock;

use regex::Regex;
use tower_lsp::lsp_types::Position;

use crate::document::{shift_back, utf16_len, utf16_to_byte_offset};

/// Unterminated inline link target: `[label](` followed by the typed run.
static INLINE_LINK_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*?\]\(\s*([^\s()]*)$").unwrap());

/// Unterminated reference link key: `[label][` followed by the typed run.
static REFERENCE_LINK_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*?\]\[\s*([^\s()\[\]]*)$").unwrap());

/// Scheme-like prefix (`http:`, `mailto:`, `a1-b:`) — external URI, not a path.
static URI_SCHEME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[\w\-]+:").unwrap());

/// Splits a prefix at its last `#` when the fragment part is slug-shaped.
static ANCHOR_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.*)#([\w\-]*)$").unwrap());

/// Longest leading run after the cursor that still belongs to an inline target.
static INLINE_TARGET_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^)\s]*").unwrap());

/// Longest leading run after the cursor that still belongs to a reference key.
static REFERENCE_KEY_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\]\s]*").unwrap());

/// What kind of link target the cursor is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionContextKind {
    /// `[text](path#anchor`
    InlineLink,
    /// `[text][key`
    ReferenceLink,
    /// `[label]: target` — recognized but deliberately never completed.
    LinkDefinition,
}

/// The `#`-fragment portion of an inline link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorInfo {
    /// Text preceding the `#`; empty when the target is purely `#fragment`.
    pub before_anchor: String,
    /// Text after the `#`, restricted to word/digit/hyphen characters.
    pub anchor_prefix: String,
}

/// Parse result at one cursor position.
///
/// Invariant: `link_text_start` plus the UTF-16 length of `link_prefix`
/// equals the cursor position, by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionContext {
    pub kind: CompletionContextKind,
    /// Text of the link target already typed before the cursor.
    pub link_prefix: String,
    /// Position where `link_prefix` starts.
    pub link_text_start: Position,
    /// Text of the link target immediately after the cursor, up to the first
    /// terminating character (`)`/whitespace inline, `]`/whitespace reference).
    pub link_suffix: String,
    /// Present iff `link_prefix` contains a slug-shaped `#` fragment.
    pub anchor: Option<AnchorInfo>,
}

impl CompletionContext {
    /// True when the target is purely `#fragment`, referring to the current
    /// document rather than another file.
    pub fn is_anchor_in_current_doc(&self) -> bool {
        self.anchor.as_ref().is_some_and(|a| a.before_anchor.is_empty())
    }
}

/// Classify the cursor position on `line`.
///
/// `position.character` is a UTF-16 code unit offset, per LSP. Returns `None`
/// when the cursor is not inside a recognized link target — including when
/// the typed prefix looks like an external URI (`http:` etc.), for which
/// path suggestions must not fire.
pub fn classify(line: &str, position: Position) -> Option<CompletionContext> {
    let byte_cursor = utf16_to_byte_offset(line, position.character as usize)?;
    let (line_prefix, line_suffix) = line.split_at(byte_cursor);

    if let Some(caps) = INLINE_LINK_TARGET.captures(line_prefix) {
        let prefix = caps.get(1).map_or("", |m| m.as_str());

        if URI_SCHEME.is_match(prefix) {
            return None;
        }

        let anchor = ANCHOR_SPLIT.captures(prefix).map(|c| AnchorInfo {
            before_anchor: c[1].to_string(),
            anchor_prefix: c[2].to_string(),
        });

        let suffix = INLINE_TARGET_SUFFIX.find(line_suffix).map_or("", |m| m.as_str());

        return Some(CompletionContext {
            kind: CompletionContextKind::InlineLink,
            link_text_start: shift_back(position, utf16_len(prefix)),
            link_prefix: prefix.to_string(),
            link_suffix: suffix.to_string(),
            anchor,
        });
    }

    if let Some(caps) = REFERENCE_LINK_KEY.captures(line_prefix) {
        let prefix = caps.get(1).map_or("", |m| m.as_str());
        let suffix = REFERENCE_KEY_SUFFIX.find(line_suffix).map_or("", |m| m.as_str());

        return Some(CompletionContext {
            kind: CompletionContextKind::ReferenceLink,
            link_text_start: shift_back(position, utf16_len(prefix)),
            link_prefix: prefix.to_string(),
            link_suffix: suffix.to_string(),
            anchor: None,
        });
    }

    None
}
