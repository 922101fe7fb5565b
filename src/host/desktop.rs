//! Workbench backed by the desktop's default handlers

use super::Workbench;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Opens paths with whatever the OS associates with them
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopWorkbench;

impl DesktopWorkbench {
    pub fn new() -> Self {
        Self
    }

    async fn launch(path: PathBuf) -> io::Result<()> {
        tokio::task::spawn_blocking(move || open::that_detached(&path))
            .await
            .map_err(io::Error::other)?
    }
}

/// Folder shown when revealing `path`: files reveal their parent
fn reveal_target(path: &Path, is_dir: bool) -> PathBuf {
    if is_dir {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => path.to_path_buf(),
    }
}

#[async_trait]
impl Workbench for DesktopWorkbench {
    async fn open_document(&self, path: &Path) -> io::Result<()> {
        tracing::debug!("Opening document {:?}", path);
        Self::launch(path.to_path_buf()).await
    }

    async fn reveal_in_os(&self, path: &Path) -> io::Result<()> {
        let is_dir = tokio::fs::metadata(path).await?.is_dir();
        let target = reveal_target(path, is_dir);
        tracing::debug!("Revealing {:?} via {:?}", path, target);
        Self::launch(target).await
    }

    async fn open_external(&self, path: &Path) -> io::Result<()> {
        tracing::debug!("Opening {:?} externally", path);
        Self::launch(path.to_path_buf()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_target_uses_parent_for_files() {
        assert_eq!(
            reveal_target(Path::new("/notes/todo.md"), false),
            PathBuf::from("/notes")
        );
        assert_eq!(
            reveal_target(Path::new("/notes"), true),
            PathBuf::from("/notes")
        );
        assert_eq!(
            reveal_target(Path::new("todo.md"), false),
            PathBuf::from("todo.md")
        );
    }

    #[tokio::test]
    async fn test_reveal_missing_path_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing.txt");

        let result = DesktopWorkbench::new().reveal_in_os(&missing).await;
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
