//! Completion engine for markdown link targets
//!
//! Layered leaf-first:
//!
//! - [`context`] — classifies the cursor position (inline link target,
//!   reference-link key, or neither) and extracts prefix/suffix/anchor spans.
//! - [`resolver`] — turns typed references into candidate filesystem paths.
//! - [`host`] — the trait seam to the I/O services the provider consumes.
//! - [`provider`] — the orchestrator dispatching to the heading-anchor,
//!   reference-key, and filesystem-path strategies.

pub mod context;
pub mod host;
pub mod provider;
pub mod resolver;

pub use context::{AnchorInfo, CompletionContext, CompletionContextKind, classify};
pub use host::{CompletionHost, FsEntry, ListDirError};
pub use provider::{CandidateItem, CandidateKind, PathCompletionProvider};
pub use resolver::{normalize_path, resolve_reference};
