use tower_lsp::lsp_types::*;
use tower_lsp::{LanguageServer, LspService};

use super::*;

fn create_test_server() -> MdlinkLanguageServer {
    let (service, _socket) = LspService::new(MdlinkLanguageServer::new);
    service.inner().clone()
}

fn completion_params(uri: &Url, line: u32, character: u32) -> CompletionParams {
    CompletionParams {
        text_document_position: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
            position: Position { line, character },
        },
        work_done_progress_params: Default::default(),
        partial_result_params: Default::default(),
        context: None,
    }
}

async fn open(server: &MdlinkLanguageServer, uri: &Url, text: &str) {
    server
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "markdown".to_string(),
                version: 1,
                text: text.to_string(),
            },
        })
        .await;
}

#[tokio::test]
async fn test_server_creation() {
    let server = create_test_server();

    let config = server.config.read().await;
    assert!(config.enable_path_completions);
}

#[tokio::test]
async fn test_initialize_advertises_completion_triggers() {
    let server = create_test_server();

    let result = server.initialize(InitializeParams::default()).await.unwrap();
    let completion = result.capabilities.completion_provider.expect("completion capability");
    assert_eq!(
        completion.trigger_characters,
        Some(vec![".".to_string(), "/".to_string(), "#".to_string()])
    );
    assert_eq!(result.server_info.unwrap().name, "mdlink");
}

#[tokio::test]
async fn test_initialize_parses_options() {
    let server = create_test_server();

    let params = InitializeParams {
        initialization_options: Some(serde_json::json!({"enablePathCompletions": false})),
        ..Default::default()
    };
    server.initialize(params).await.unwrap();

    assert!(!server.config.read().await.enable_path_completions);
}

#[tokio::test]
async fn test_anchor_completion_for_open_document() {
    let server = create_test_server();
    let uri = Url::parse("file:///ws/doc.md").unwrap();

    open(&server, &uri, "# Alpha\n\n## Beta Gamma\n\n[link](#").await;

    let response = server
        .completion(completion_params(&uri, 4, 8))
        .await
        .unwrap()
        .expect("anchor candidates");

    let CompletionResponse::Array(items) = response else {
        panic!("expected array response");
    };
    let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["#alpha", "#beta-gamma"]);
    assert!(items.iter().all(|i| i.kind == Some(CompletionItemKind::REFERENCE)));
}

#[tokio::test]
async fn test_reference_key_completion_for_open_document() {
    let server = create_test_server();
    let uri = Url::parse("file:///ws/doc.md").unwrap();

    open(&server, &uri, "[foo]: a.md\n[bar]: b.md\n\n[link][").await;

    let response = server
        .completion(completion_params(&uri, 3, 7))
        .await
        .unwrap()
        .expect("definition keys");

    let CompletionResponse::Array(items) = response else {
        panic!("expected array response");
    };
    let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["foo", "bar"]);
}

#[tokio::test]
async fn test_completion_outside_link_returns_none() {
    let server = create_test_server();
    let uri = Url::parse("file:///ws/doc.md").unwrap();

    open(&server, &uri, "# Alpha\n\nplain prose").await;

    let response = server.completion(completion_params(&uri, 2, 5)).await.unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn test_completion_for_unknown_document_returns_none() {
    let server = create_test_server();
    let uri = Url::parse("file:///ws/never-opened-here.md").unwrap();

    let response = server.completion(completion_params(&uri, 0, 0)).await.unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn test_completion_respects_disabled_config() {
    let server = create_test_server();
    let uri = Url::parse("file:///ws/doc.md").unwrap();

    server.config.write().await.enable_path_completions = false;
    open(&server, &uri, "# Alpha\n\n[link](#").await;

    let response = server.completion(completion_params(&uri, 2, 8)).await.unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn test_did_change_replaces_content_and_cancels_inflight() {
    let server = create_test_server();
    let uri = Url::parse("file:///ws/doc.md").unwrap();

    open(&server, &uri, "# Old\n\n[link](#").await;
    let token = server.completion_token(&uri).await;
    assert!(!token.is_cancelled());

    server
        .did_change(DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: uri.clone(),
                version: 2,
            },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: "# New\n\n[link](#".to_string(),
            }],
        })
        .await;

    assert!(token.is_cancelled());
    assert_eq!(
        server.workspace.get_document_content(&uri).await.as_deref(),
        Some("# New\n\n[link](#")
    );
}

#[tokio::test]
async fn test_did_close_drops_document() {
    let server = create_test_server();
    let uri = Url::parse("file:///ws/doc.md").unwrap();

    open(&server, &uri, "# Doc").await;
    server
        .did_close(DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
        })
        .await;

    // Nothing on disk either, so the content is gone.
    assert_eq!(server.workspace.get_document_content(&uri).await, None);
}

#[tokio::test]
async fn test_folder_candidates_retrigger_via_command() {
    use std::io::Write as _;

    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("img")).unwrap();
    let mut f = std::fs::File::create(dir.path().join("other.md")).unwrap();
    writeln!(f, "# Other").unwrap();

    let server = create_test_server();
    let doc_path = dir.path().join("doc.md");
    let uri = Url::from_file_path(&doc_path).unwrap();

    open(&server, &uri, "[link](").await;

    let response = server
        .completion(completion_params(&uri, 0, 7))
        .await
        .unwrap()
        .expect("directory candidates");
    let CompletionResponse::Array(items) = response else {
        panic!("expected array response");
    };

    let folder = items.iter().find(|i| i.label == "img/").expect("folder entry");
    assert_eq!(folder.kind, Some(CompletionItemKind::FOLDER));
    assert_eq!(
        folder.command.as_ref().map(|c| c.command.as_str()),
        Some("editor.action.triggerSuggest")
    );

    let file = items.iter().find(|i| i.label == "other.md").expect("file entry");
    assert!(file.command.is_none());
}
