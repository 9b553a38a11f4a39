//! Main Language Server Protocol server implementation for mdlink
//!
//! Wires the completion provider into the editor: document sync, workspace
//! roots, configuration from initialization options, and the completion
//! handler with per-document cancellation of stale requests.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tower_lsp::jsonrpc::Result as JsonRpcResult;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::completion::PathCompletionProvider;
use crate::document::TextDocument;
use crate::lsp::types::{MdlinkLspConfig, candidate_to_completion_item};
use crate::lsp::workspace::ServerWorkspace;

/// LSP server for markdown link-target completion
#[derive(Clone)]
pub struct MdlinkLanguageServer {
    pub(crate) client: Client,
    /// Configuration from initialization options
    pub(crate) config: Arc<RwLock<MdlinkLspConfig>>,
    /// Document store and filesystem access, shared with the provider
    pub(crate) workspace: Arc<ServerWorkspace>,
    /// The completion engine
    pub(crate) provider: PathCompletionProvider,
    /// One cancellation token per document with an outstanding completion;
    /// replaced (and the old one cancelled) whenever the document changes.
    pub(crate) inflight: Arc<RwLock<HashMap<Url, CancellationToken>>>,
}

impl MdlinkLanguageServer {
    pub fn new(client: Client) -> Self {
        let config = Arc::new(RwLock::new(MdlinkLspConfig::default()));
        let workspace = Arc::new(ServerWorkspace::new(config.clone()));
        let provider = PathCompletionProvider::new(workspace.clone());

        Self {
            client,
            config,
            workspace,
            provider,
            inflight: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Token for a new completion request on `uri`.
    ///
    /// The same token stays live until the document changes, so several
    /// overlapping requests for one unchanged document share it.
    pub(crate) async fn completion_token(&self, uri: &Url) -> CancellationToken {
        let mut inflight = self.inflight.write().await;
        inflight.entry(uri.clone()).or_default().clone()
    }

    /// Cancel whatever completion work is still running for `uri`.
    pub(crate) async fn cancel_inflight(&self, uri: &Url) {
        if let Some(token) = self.inflight.write().await.remove(uri) {
            token.cancel();
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for MdlinkLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> JsonRpcResult<InitializeResult> {
        log::info!("Initializing mdlink Language Server");

        if let Some(options) = params.initialization_options
            && let Ok(config) = serde_json::from_value::<MdlinkLspConfig>(options)
        {
            if let Some(level) = config.log_level.as_deref()
                && let Ok(filter) = level.parse::<log::LevelFilter>()
            {
                log::set_max_level(filter);
            }
            *self.config.write().await = config;
        }

        // Extract and store workspace roots
        let mut roots = Vec::new();
        if let Some(workspace_folders) = params.workspace_folders {
            for folder in workspace_folders {
                if let Ok(path) = folder.uri.to_file_path() {
                    let path = path.canonicalize().unwrap_or(path);
                    log::info!("Workspace root: {}", path.display());
                    roots.push(path);
                }
            }
        } else if let Some(root_uri) = params.root_uri
            && let Ok(path) = root_uri.to_file_path()
        {
            let path = path.canonicalize().unwrap_or(path);
            log::info!("Workspace root: {}", path.display());
            roots.push(path);
        }
        self.workspace.set_workspace_roots(roots).await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    ..Default::default()
                })),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![".".to_string(), "/".to_string(), "#".to_string()]),
                    resolve_provider: Some(false),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                    all_commit_characters: None,
                    completion_item: None,
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "mdlink".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let version = env!("CARGO_PKG_VERSION");
        log::info!("mdlink Language Server v{version} initialized");

        self.client
            .log_message(MessageType::INFO, format!("mdlink v{version} started"))
            .await;
    }

    async fn shutdown(&self) -> JsonRpcResult<()> {
        log::info!("Shutting down mdlink Language Server");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        log::debug!("Document opened: {}", doc.uri);
        self.workspace
            .open_document(doc.uri, doc.text, Some(doc.version))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        // Full sync: the last change carries the whole document.
        if let Some(change) = params.content_changes.into_iter().next_back() {
            self.workspace
                .open_document(uri.clone(), change.text, Some(params.text_document.version))
                .await;
        }

        // The cursor has moved on; whatever completion is still running for
        // the old text must not produce observable results.
        self.cancel_inflight(&uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        log::debug!("Document closed: {uri}");
        self.workspace.close_document(&uri).await;
        self.cancel_inflight(&uri).await;
    }

    async fn completion(&self, params: CompletionParams) -> JsonRpcResult<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some(text) = self.workspace.get_document_content(&uri).await else {
            return Ok(None);
        };

        log::debug!(
            "Completion requested at {}:{} in {uri}",
            position.line,
            position.character
        );

        let token = self.completion_token(&uri).await;
        let document = TextDocument::new(uri, text);
        let candidates = self.provider.provide(&document, position, &token).await;

        if candidates.is_empty() {
            return Ok(None);
        }

        let items = candidates
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| candidate_to_completion_item(candidate, index))
            .collect();

        Ok(Some(CompletionResponse::Array(items)))
    }
}
