//! The real [`CompletionHost`]: open-document cache plus `tokio::fs`
//!
//! Owns the document store shared with the server (open files first, disk
//! fallback with caching for cross-document loads) and answers the
//! provider's directory-listing, document-loading, and workspace-root
//! queries.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;

use crate::completion::{CompletionHost, FsEntry, ListDirError};
use crate::lsp::types::MdlinkLspConfig;

/// Supported markdown file extensions (without leading dot)
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdx", "mkd", "mkdn", "mdown", "mdwn"];

/// Check if a file extension is a markdown extension
#[inline]
fn is_markdown_extension(ext: &str) -> bool {
    MARKDOWN_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// A document in the store
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DocumentEntry {
    /// The document content
    pub(crate) content: String,
    /// Version number from the editor (None for disk-loaded documents)
    pub(crate) version: Option<i32>,
    /// Whether the document was loaded from disk (true) or opened in editor (false)
    pub(crate) from_disk: bool,
}

/// Shared workspace state behind the LSP server.
pub struct ServerWorkspace {
    pub(crate) documents: Arc<RwLock<HashMap<Url, DocumentEntry>>>,
    pub(crate) workspace_roots: Arc<RwLock<Vec<PathBuf>>>,
    pub(crate) config: Arc<RwLock<MdlinkLspConfig>>,
}

impl ServerWorkspace {
    pub fn new(config: Arc<RwLock<MdlinkLspConfig>>) -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            workspace_roots: Arc::new(RwLock::new(Vec::new())),
            config,
        }
    }

    pub async fn set_workspace_roots(&self, roots: Vec<PathBuf>) {
        *self.workspace_roots.write().await = roots;
    }

    /// Record a document opened in the editor.
    pub async fn open_document(&self, uri: Url, content: String, version: Option<i32>) {
        let entry = DocumentEntry {
            content,
            version,
            from_disk: false,
        };
        self.documents.write().await.insert(uri, entry);
    }

    /// Drop a closed document from the store.
    pub async fn close_document(&self, uri: &Url) {
        self.documents.write().await.remove(uri);
    }

    /// Get document content, either from the store or by reading from disk.
    ///
    /// Disk-loaded content is cached for future requests, the same way open
    /// documents are, so repeated cross-document completions stay cheap.
    pub async fn get_document_content(&self, uri: &Url) -> Option<String> {
        {
            let docs = self.documents.read().await;
            if let Some(entry) = docs.get(uri) {
                return Some(entry.content.clone());
            }
        }

        if let Ok(path) = uri.to_file_path() {
            if let Ok(content) = tokio::fs::read_to_string(&path).await {
                let entry = DocumentEntry {
                    content: content.clone(),
                    version: None,
                    from_disk: true,
                };
                self.documents.write().await.insert(uri.clone(), entry);

                log::debug!("loaded document from disk and cached: {uri}");
                return Some(content);
            }
            log::debug!("failed to read file from disk: {uri}");
        }

        None
    }
}

#[async_trait]
impl CompletionHost for ServerWorkspace {
    async fn path_completions_enabled(&self, _document: &Url) -> bool {
        self.config.read().await.enable_path_completions
    }

    async fn read_dir(&self, directory: &Path) -> Result<Vec<FsEntry>, ListDirError> {
        let mut reader = tokio::fs::read_dir(directory).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ListDirError::NotFound(directory.to_path_buf()),
            ErrorKind::NotADirectory => ListDirError::NotADirectory(directory.to_path_buf()),
            _ => ListDirError::Io(e),
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            entries.push(FsEntry { name, is_dir });
        }
        // Readdir order is platform-dependent; sort so suggestions are stable.
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn load_document(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?;
        if !is_markdown_extension(ext) {
            return None;
        }
        let uri = Url::from_file_path(path).ok()?;
        self.get_document_content(&uri).await
    }

    async fn workspace_root(&self, document_path: &Path) -> Option<PathBuf> {
        let roots = self.workspace_roots.read().await;
        roots.iter().find(|root| document_path.starts_with(root)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> ServerWorkspace {
        ServerWorkspace::new(Arc::new(RwLock::new(MdlinkLspConfig::default())))
    }

    #[test]
    fn test_is_markdown_extension() {
        assert!(is_markdown_extension("md"));
        assert!(is_markdown_extension("MD"));
        assert!(is_markdown_extension("markdown"));
        assert!(!is_markdown_extension("rs"));
        assert!(!is_markdown_extension("txt"));
    }

    #[tokio::test]
    async fn test_open_document_roundtrip() {
        let ws = workspace();
        let uri = Url::parse("file:///ws/doc.md").unwrap();
        ws.open_document(uri.clone(), "# Hi".to_string(), Some(1)).await;
        assert_eq!(ws.get_document_content(&uri).await.as_deref(), Some("# Hi"));

        ws.close_document(&uri).await;
        // /ws/doc.md does not exist on disk, so the fallback also fails.
        assert_eq!(ws.get_document_content(&uri).await, None);
    }

    #[tokio::test]
    async fn test_load_document_rejects_non_markdown() {
        let ws = workspace();
        assert_eq!(ws.load_document(Path::new("/ws/main.rs")).await, None);
        assert_eq!(ws.load_document(Path::new("/ws/noext")).await, None);
    }

    #[tokio::test]
    async fn test_workspace_root_lookup() {
        let ws = workspace();
        ws.set_workspace_roots(vec![PathBuf::from("/a"), PathBuf::from("/b")]).await;
        assert_eq!(
            ws.workspace_root(Path::new("/b/doc.md")).await,
            Some(PathBuf::from("/b"))
        );
        assert_eq!(ws.workspace_root(Path::new("/c/doc.md")).await, None);
    }

    #[tokio::test]
    async fn test_read_dir_missing_directory() {
        let ws = workspace();
        let err = ws.read_dir(Path::new("/definitely/not/here")).await.unwrap_err();
        assert!(matches!(err, ListDirError::NotFound(_)));
    }
}
