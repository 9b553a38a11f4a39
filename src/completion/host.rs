//! Host services consumed by the completion provider
//!
//! The orchestrator only needs four capabilities from its surroundings:
//! the per-document configuration flag, directory listing, cross-document
//! loading, and workspace-root lookup. They sit behind one trait so the
//! decision policy can be exercised against in-memory fakes; the real
//! implementation lives in the LSP layer.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// One directory entry as reported by the listing service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub name: String,
    pub is_dir: bool,
}

impl FsEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_dir: false }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_dir: true }
    }
}

/// Directory listing failure classes.
///
/// All of them degrade to "no suggestions" in the provider; the distinction
/// exists for logging and for tests of the listing service itself.
#[derive(Debug, Error)]
pub enum ListDirError {
    #[error("directory not found: {0}")]
    NotFound(PathBuf),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Services the completion provider consumes from its host.
#[async_trait]
pub trait CompletionHost: Send + Sync {
    /// The "path suggestions enabled" flag for a document. When false the
    /// provider returns nothing, before any classification work.
    async fn path_completions_enabled(&self, document: &Url) -> bool;

    /// List the entries of `directory`.
    async fn read_dir(&self, directory: &Path) -> Result<Vec<FsEntry>, ListDirError>;

    /// Load the content of the markdown document at `path`, if there is one.
    async fn load_document(&self, path: &Path) -> Option<String>;

    /// The workspace root containing `document_path`, if any.
    async fn workspace_root(&self, document_path: &Path) -> Option<PathBuf>;
}
