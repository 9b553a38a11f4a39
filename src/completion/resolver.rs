//! Reference resolution
//!
//! Turns the raw reference string typed in a link target into a candidate
//! filesystem location. Resolution is purely lexical — `.` and `..` are
//! folded without touching the filesystem, and existence of the result is
//! never verified here.

use std::path::{Component, Path, PathBuf};

/// Resolve `raw_ref` against the document at `document_path`.
///
/// References starting with `/` are workspace-rooted and fail when no
/// workspace root is known for the document. Everything else resolves
/// relative to the document's directory.
pub fn resolve_reference(
    document_path: &Path,
    raw_ref: &str,
    workspace_root: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(rest) = raw_ref.strip_prefix('/') {
        let root = workspace_root?;
        return Some(normalize_path(root.join(rest)));
    }

    let dir = document_path.parent()?;
    Some(normalize_path(dir.join(raw_ref)))
}

/// Resolve `..` and `.` components in a path without touching the filesystem.
pub fn normalize_path(path: PathBuf) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            c => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to_document_dir() {
        let resolved = resolve_reference(Path::new("/ws/docs/guide.md"), "img/logo.png", None);
        assert_eq!(resolved, Some(PathBuf::from("/ws/docs/img/logo.png")));
    }

    #[test]
    fn test_dot_resolves_to_document_dir() {
        let resolved = resolve_reference(Path::new("/ws/docs/guide.md"), ".", None);
        assert_eq!(resolved, Some(PathBuf::from("/ws/docs")));
    }

    #[test]
    fn test_parent_segments_fold() {
        let resolved = resolve_reference(Path::new("/ws/docs/guide.md"), "../other/./a.md", None);
        assert_eq!(resolved, Some(PathBuf::from("/ws/other/a.md")));
    }

    #[test]
    fn test_trailing_slash_prefix() {
        let resolved = resolve_reference(Path::new("/ws/doc.md"), "sub/", None);
        assert_eq!(resolved, Some(PathBuf::from("/ws/sub")));
    }

    #[test]
    fn test_workspace_rooted() {
        let resolved = resolve_reference(
            Path::new("/ws/docs/guide.md"),
            "/assets/logo.png",
            Some(Path::new("/ws")),
        );
        assert_eq!(resolved, Some(PathBuf::from("/ws/assets/logo.png")));
    }

    #[test]
    fn test_workspace_rooted_without_root_fails() {
        assert_eq!(resolve_reference(Path::new("/ws/doc.md"), "/assets", None), None);
    }

    #[test]
    fn test_document_without_parent_fails() {
        assert_eq!(resolve_reference(Path::new("/"), "a.md", None), None);
    }

    #[test]
    fn test_excess_parent_segments_stop_at_root() {
        let resolved = resolve_reference(Path::new("/ws/doc.md"), "../../../a.md", None);
        assert_eq!(resolved, Some(PathBuf::from("/a.md")));
    }

    #[test]
    fn test_normalize_is_lexical() {
        assert_eq!(
            normalize_path(PathBuf::from("/a/b/../c/./d")),
            PathBuf::from("/a/c/d")
        );
    }
}
