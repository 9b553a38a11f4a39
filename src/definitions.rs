//! Link reference definition scanning
//!
//! Collects `[key]: target` definition lines from a document in declaration
//! order. Lines inside fenced code blocks are ignored, and duplicate keys
//! keep their first declaration, per CommonMark.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// A definition line: up to three leading spaces, `[key]:`, then the target.
static DEFINITION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}\[([^\]]+)\]:\s*(\S+)").unwrap());

/// One reference-link definition, `[key]: target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDefinition {
    pub key: String,
    pub target: String,
}

/// Scan `text` for reference-link definitions, in declaration order.
pub fn reference_definitions(text: &str) -> Vec<ReferenceDefinition> {
    let mut definitions = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut open_fence: Option<(char, usize)> = None;

    for line in text.lines() {
        let trimmed = line.trim_start();

        if let Some((ch, len)) = fence_marker(trimmed) {
            match open_fence {
                Some((open_ch, open_len)) if ch == open_ch && len >= open_len => {
                    // Closing fences carry nothing after the marker.
                    if trimmed[len..].trim().is_empty() {
                        open_fence = None;
                    }
                    continue;
                }
                Some(_) => continue,
                None => {
                    open_fence = Some((ch, len));
                    continue;
                }
            }
        }
        if open_fence.is_some() {
            continue;
        }

        if let Some(caps) = DEFINITION_LINE.captures(line) {
            let key = caps[1].to_string();
            // Reference matching is case-insensitive; first declaration wins.
            if seen.insert(key.to_lowercase()) {
                definitions.push(ReferenceDefinition {
                    key,
                    target: caps[2].to_string(),
                });
            }
        }
    }

    definitions
}

/// A fence marker (three or more backticks or tildes), if the line opens with one.
fn fence_marker(trimmed: &str) -> Option<(char, usize)> {
    for ch in ['`', '~'] {
        if trimmed.starts_with(ch) {
            let len = trimmed.chars().take_while(|&c| c == ch).count();
            if len >= 3 {
                return Some((ch, len));
            }
        }
    }
    None
}
