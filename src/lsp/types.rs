//! LSP-facing types: server configuration and candidate conversion

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{
    Command, CompletionItem, CompletionItemKind, CompletionTextEdit, InsertReplaceEdit,
};

use crate::completion::{CandidateItem, CandidateKind};

/// Configuration for the mdlink language server, passed by the editor as
/// LSP initialization options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MdlinkLspConfig {
    /// Master switch for link-target completion. When false the server
    /// answers every completion request with no results.
    pub enable_path_completions: bool,
    /// Log level override (error/warn/info/debug/trace)
    pub log_level: Option<String>,
}

impl Default for MdlinkLspConfig {
    fn default() -> Self {
        Self {
            enable_path_completions: true,
            log_level: None,
        }
    }
}

/// Convert an engine candidate into an LSP completion item.
///
/// The dual insert/replace ranges map onto an `InsertAndReplace` text edit;
/// `sort_text` is padded from the source index so editors keep the engine's
/// ordering; folder candidates get the standard suggest-retrigger command.
pub fn candidate_to_completion_item(candidate: CandidateItem, index: usize) -> CompletionItem {
    let kind = match candidate.kind {
        CandidateKind::HeadingReference | CandidateKind::DefinitionReference => {
            CompletionItemKind::REFERENCE
        }
        CandidateKind::File => CompletionItemKind::FILE,
        CandidateKind::Folder => CompletionItemKind::FOLDER,
    };

    let command = candidate.retrigger.then(|| Command {
        title: "Suggest".to_string(),
        command: "editor.action.triggerSuggest".to_string(),
        arguments: None,
    });

    CompletionItem {
        label: candidate.label.clone(),
        kind: Some(kind),
        sort_text: Some(format!("{index:04}")),
        filter_text: Some(candidate.label.clone()),
        text_edit: Some(CompletionTextEdit::InsertAndReplace(InsertReplaceEdit {
            new_text: candidate.label,
            insert: candidate.insert_range,
            replace: candidate.replace_range,
        })),
        command,
        ..Default::default()
    }
}
