//! Table of contents extraction
//!
//! Produces the ordered list of headings in a markdown document, each with a
//! stable URL-safe slug. Slugs follow the usual fragment normalization
//! (lowercase, punctuation collapsed to hyphens) and duplicates are
//! disambiguated in document order: the first `intro` keeps its slug, later
//! ones become `intro-1`, `intro-2`, … A kramdown-style `{#custom-id}`
//! attribute at the end of a heading overrides the generated slug.

use std::collections::HashMap;
use std::sync::LazyLock;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;

/// Trailing `{#custom-id}` heading attribute.
static CUSTOM_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*\{#([\w\-]+)\}\s*$").unwrap());

/// One heading in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading text with inline markup flattened and any `{#…}` attribute removed.
    pub text: String,
    /// Heading level, 1–6.
    pub level: u8,
    /// Unique slug within the document.
    pub slug: String,
}

/// Extract the ordered table of contents from markdown text.
///
/// Parsing goes through pulldown-cmark, so ATX and setext headings are both
/// picked up and `#` lines inside code blocks are not.
pub fn document_headings(text: &str) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    let mut seen = SlugSet::default();
    let mut current: Option<(HeadingLevel, String)> = None;

    for event in Parser::new_ext(text, Options::empty()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, raw)) = current.take() {
                    let (text, custom) = split_custom_anchor(&raw);
                    let base = custom.unwrap_or_else(|| slugify(&text));
                    entries.push(TocEntry {
                        text,
                        level: heading_level(level),
                        slug: seen.disambiguate(base),
                    });
                }
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&t);
                }
            }
            _ => {}
        }
    }

    entries
}

/// Convert heading text to a URL-safe fragment identifier.
///
/// Lowercase, trim, map every non-alphanumeric character to `-`, collapse
/// consecutive hyphens, and strip leading/trailing hyphens.
pub fn slugify(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let hyphenated: String = lower
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    hyphenated
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Tracks slugs handed out so far and appends `-N` to repeats.
#[derive(Default)]
struct SlugSet {
    // slug -> highest suffix handed out for it (0 = bare form taken)
    counts: HashMap<String, usize>,
}

impl SlugSet {
    fn disambiguate(&mut self, base: String) -> String {
        match self.counts.get(&base).copied() {
            None => {
                self.counts.insert(base.clone(), 0);
                base
            }
            Some(n) => {
                let mut next = n + 1;
                let mut candidate = format!("{base}-{next}");
                // A generated suffix may itself collide with a slug already
                // taken literally; keep counting until free.
                while self.counts.contains_key(&candidate) {
                    next += 1;
                    candidate = format!("{base}-{next}");
                }
                self.counts.insert(base, next);
                self.counts.insert(candidate.clone(), 0);
                candidate
            }
        }
    }
}

fn split_custom_anchor(raw: &str) -> (String, Option<String>) {
    if let Some(caps) = CUSTOM_ANCHOR.captures(raw) {
        (caps[1].to_string(), Some(caps[2].to_string()))
    } else {
        (raw.to_string(), None)
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
