//! mdlink — context-aware completion for Markdown link targets
//!
//! Given a cursor position inside an unterminated markdown link, mdlink
//! figures out what kind of target is being typed and offers the matching
//! candidates:
//!
//! - `[text](#…` — heading anchors of the current document
//! - `[text](other.md#…` — heading anchors of another document
//! - `[text](dir/…` — filesystem entries relative to the link's base path
//! - `[text][…` — reference-link definition keys declared in the document
//!
//! The completion engine lives in [`completion`] and talks to its
//! surroundings through a small host trait; the [`lsp`] module wires it into
//! editors via the Language Server Protocol (`mdlink server`).

pub mod completion;
pub mod definitions;
pub mod document;
pub mod lsp;
pub mod toc;

pub use completion::{
    AnchorInfo, CandidateItem, CandidateKind, CompletionContext, CompletionContextKind,
    CompletionHost, FsEntry, ListDirError, PathCompletionProvider, classify,
};
pub use definitions::{ReferenceDefinition, reference_definitions};
pub use document::TextDocument;
pub use toc::{TocEntry, document_headings};
