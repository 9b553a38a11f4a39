//! Suggestion orchestration
//!
//! Dispatches a classified cursor context to the suggestion strategies:
//!
//! - **Heading-anchor** — `#slug` entries from the table of contents of the
//!   current document or of another resolvable markdown document.
//! - **Reference-key** — keys of the `[key]: target` definitions declared in
//!   the current document.
//! - **Filesystem-path** — entries of the directory the typed prefix points
//!   into, with folders re-triggering completion so users can keep drilling.
//!
//! Every external failure (unresolvable reference, unreadable directory,
//! unloadable document) degrades to an empty contribution; completion never
//! surfaces an error to the editor.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tower_lsp::lsp_types::{Position, Range};

use crate::completion::context::{AnchorInfo, CompletionContext, CompletionContextKind, classify};
use crate::completion::host::CompletionHost;
use crate::completion::resolver::resolve_reference;
use crate::definitions::reference_definitions;
use crate::document::{TextDocument, range_between, shift_back, shift_forward, utf16_len};
use crate::toc::document_headings;

/// What a candidate completes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// A `#slug` heading anchor.
    HeadingReference,
    /// A reference-link definition key.
    DefinitionReference,
    File,
    Folder,
}

/// One proposed completion.
///
/// `insert_range` covers the text replaced on insert-only acceptance;
/// `replace_range` starts at the same position but also swallows the
/// `link_suffix` already sitting after the cursor, so accepting a suggestion
/// mid-target neither duplicates nor truncates existing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    pub label: String,
    pub kind: CandidateKind,
    pub insert_range: Range,
    pub replace_range: Range,
    /// Re-invoke completion after acceptance. Set only for folders.
    pub retrigger: bool,
}

/// The completion orchestrator. Stateless across requests; all I/O goes
/// through the [`CompletionHost`].
#[derive(Clone)]
pub struct PathCompletionProvider {
    host: Arc<dyn CompletionHost>,
}

impl PathCompletionProvider {
    pub fn new(host: Arc<dyn CompletionHost>) -> Self {
        Self { host }
    }

    /// Produce candidates for the cursor at `position` in `document`.
    ///
    /// Returns an empty list when path suggestions are disabled for the
    /// document, when the cursor is not inside a link target, when `cancel`
    /// fires, or when every dispatched strategy comes back empty.
    pub async fn provide(
        &self,
        document: &TextDocument,
        position: Position,
        cancel: &CancellationToken,
    ) -> Vec<CandidateItem> {
        if !self.host.path_completions_enabled(&document.uri).await {
            return Vec::new();
        }
        if cancel.is_cancelled() {
            return Vec::new();
        }

        let Some(line) = document.line(position.line) else {
            return Vec::new();
        };
        let Some(context) = classify(line, position) else {
            return Vec::new();
        };

        self.dispatch(document, position, &context, cancel).await
    }

    async fn dispatch(
        &self,
        document: &TextDocument,
        position: Position,
        context: &CompletionContext,
        cancel: &CancellationToken,
    ) -> Vec<CandidateItem> {
        let insert_range = range_between(context.link_text_start, position);

        match context.kind {
            CompletionContextKind::ReferenceLink => {
                reference_key_candidates(&document.content, insert_range, &context.link_suffix)
            }
            // Recognized but deliberately not completed.
            CompletionContextKind::LinkDefinition => Vec::new(),
            CompletionContextKind::InlineLink => {
                let mut items = Vec::new();
                let anchor_in_current_doc = context.is_anchor_in_current_doc();

                if context.link_prefix.is_empty() || anchor_in_current_doc {
                    items.extend(heading_candidates(
                        &document.content,
                        insert_range,
                        &context.link_suffix,
                    ));
                }

                if !anchor_in_current_doc {
                    if let Some(anchor) = &context.anchor {
                        items.extend(
                            self.cross_document_heading_candidates(
                                document,
                                position,
                                anchor,
                                &context.link_suffix,
                                cancel,
                            )
                            .await,
                        );
                    } else {
                        items.extend(self.path_candidates(document, position, context, cancel).await);
                    }
                }

                items
            }
        }
    }

    /// Heading anchors of the document `anchor.before_anchor` resolves to.
    ///
    /// The insertion range covers the `#fragment` typed so far (the `+1`
    /// accounts for the `#` itself), not the whole link prefix.
    async fn cross_document_heading_candidates(
        &self,
        document: &TextDocument,
        position: Position,
        anchor: &AnchorInfo,
        link_suffix: &str,
        cancel: &CancellationToken,
    ) -> Vec<CandidateItem> {
        let Some(document_path) = document.file_path() else {
            return Vec::new();
        };

        let root = self.host.workspace_root(&document_path).await;
        let Some(target) = resolve_reference(&document_path, &anchor.before_anchor, root.as_deref())
        else {
            return Vec::new();
        };

        if cancel.is_cancelled() {
            return Vec::new();
        }
        let Some(content) = self.host.load_document(&target).await else {
            log::debug!("no markdown document at {}", target.display());
            return Vec::new();
        };
        if cancel.is_cancelled() {
            return Vec::new();
        }

        let start = shift_back(position, utf16_len(&anchor.anchor_prefix) + 1);
        heading_candidates(&content, range_between(start, position), link_suffix)
    }

    /// Entries of the directory the typed prefix points into.
    async fn path_candidates(
        &self,
        document: &TextDocument,
        position: Position,
        context: &CompletionContext,
        cancel: &CancellationToken,
    ) -> Vec<CandidateItem> {
        let Some(document_path) = document.file_path() else {
            return Vec::new();
        };

        let prefix = context.link_prefix.as_str();
        let value_before_last_slash = match prefix.rfind('/') {
            Some(i) => &prefix[..=i],
            None => "",
        };

        let root = self.host.workspace_root(&document_path).await;
        let parent_ref = if value_before_last_slash.is_empty() {
            "."
        } else {
            value_before_last_slash
        };
        let Some(parent_dir) = resolve_reference(&document_path, parent_ref, root.as_deref()) else {
            return Vec::new();
        };

        // Only the final path segment (after the last slash) is replaced.
        let segment_len = utf16_len(prefix) - utf16_len(value_before_last_slash);
        let segment_start = shift_back(position, segment_len);
        let insert_range = range_between(segment_start, position);
        let replace_range = replace_extended(insert_range, &context.link_suffix);

        if cancel.is_cancelled() {
            return Vec::new();
        }
        let entries = match self.host.read_dir(&parent_dir).await {
            Ok(entries) => entries,
            Err(err) => {
                log::debug!("directory listing failed for {}: {err}", parent_dir.display());
                return Vec::new();
            }
        };
        if cancel.is_cancelled() {
            return Vec::new();
        }

        entries
            .into_iter()
            .filter(|entry| !entry.name.starts_with('.'))
            .map(|entry| {
                if entry.is_dir {
                    CandidateItem {
                        label: format!("{}/", entry.name),
                        kind: CandidateKind::Folder,
                        insert_range,
                        replace_range,
                        retrigger: true,
                    }
                } else {
                    CandidateItem {
                        label: entry.name,
                        kind: CandidateKind::File,
                        insert_range,
                        replace_range,
                        retrigger: false,
                    }
                }
            })
            .collect()
    }
}

/// `#slug` candidates for every heading of `text`, in document order.
fn heading_candidates(text: &str, insert_range: Range, link_suffix: &str) -> Vec<CandidateItem> {
    let replace_range = replace_extended(insert_range, link_suffix);
    document_headings(text)
        .into_iter()
        .map(|entry| CandidateItem {
            label: format!("#{}", entry.slug),
            kind: CandidateKind::HeadingReference,
            insert_range,
            replace_range,
            retrigger: false,
        })
        .collect()
}

/// Definition-key candidates, unfiltered, in declaration order.
fn reference_key_candidates(text: &str, insert_range: Range, link_suffix: &str) -> Vec<CandidateItem> {
    let replace_range = replace_extended(insert_range, link_suffix);
    reference_definitions(text)
        .into_iter()
        .map(|definition| CandidateItem {
            label: definition.key,
            kind: CandidateKind::DefinitionReference,
            insert_range,
            replace_range,
            retrigger: false,
        })
        .collect()
}

/// Extend an insertion range past the suffix already following the cursor.
fn replace_extended(insert_range: Range, link_suffix: &str) -> Range {
    Range {
        start: insert_range.start,
        end: shift_forward(insert_range.end, utf16_len(link_suffix)),
    }
}
