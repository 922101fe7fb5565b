//! Filesystem abstraction used by the registry, the tree provider and file operations
//!
//! This module provides a single trait for the filesystem calls the rest of the
//! crate needs, allowing it to work with different backends:
//! - `StdFileSystem`: native filesystem using `tokio::fs`, deleting through the OS trash
//! - Custom implementations supplied by an embedding host (remote, virtual, test doubles)
//!
//! All failures are plain `io::Error`s so callers can classify them by
//! `io::ErrorKind` (not found, permission denied, ...).

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

// ============================================================================
// Entry Types
// ============================================================================

/// Type of filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    File,
    Directory,
    Symlink,
    /// Sockets, FIFOs, devices and anything else that is neither file nor directory
    Unknown,
}

/// A directory entry returned by `read_dir`
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// Full path to the entry
    pub path: PathBuf,
    /// File/directory name (last component of path)
    pub name: String,
    /// Type of entry, not following symlinks
    pub entry_type: EntryType,
}

impl DirEntry {
    pub fn new(path: PathBuf, name: String, entry_type: EntryType) -> Self {
        Self {
            path,
            name,
            entry_type,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }
}

/// Result of `stat`. Follows symlinks.
#[derive(Debug, Clone)]
pub struct FileStat {
    pub entry_type: EntryType,
    /// Size in bytes (0 for directories)
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl FileStat {
    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }
}

/// Options for `FileSystem::delete`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Remove directories together with their contents
    pub recursive: bool,
    /// Move to the OS trash / recycle bin instead of unlinking
    pub use_trash: bool,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            use_trash: true,
        }
    }
}

// ============================================================================
// FileSystem Trait
// ============================================================================

/// Filesystem operations consumed by globo-note
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Get the type and size of a path
    ///
    /// # Errors
    ///
    /// `io::ErrorKind::NotFound` when nothing exists at `path`.
    async fn stat(&self, path: &Path) -> io::Result<FileStat>;

    /// List entries in a directory (non-recursive, unsorted)
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Create or truncate a file with the given contents
    async fn write_file(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    /// Create a single directory
    async fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Rename/move a file or directory
    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Delete a file or directory
    async fn delete(&self, path: &Path, options: DeleteOptions) -> io::Result<()>;

    /// Check if path exists
    async fn exists(&self, path: &Path) -> bool {
        self.stat(path).await.is_ok()
    }

    /// Check if path is a directory
    ///
    /// Returns an error if the path doesn't exist or cannot be read.
    async fn is_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(self.stat(path).await?.is_dir())
    }
}

// ============================================================================
// StdFileSystem Implementation
// ============================================================================

/// Native filesystem implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl StdFileSystem {
    fn entry_type_of(file_type: std::fs::FileType) -> EntryType {
        if file_type.is_dir() {
            EntryType::Directory
        } else if file_type.is_symlink() {
            EntryType::Symlink
        } else if file_type.is_file() {
            EntryType::File
        } else {
            EntryType::Unknown
        }
    }

    fn remove_permanently(path: &Path, recursive: bool) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if meta.is_dir() {
            if recursive {
                std::fs::remove_dir_all(path)
            } else {
                std::fs::remove_dir(path)
            }
        } else {
            std::fs::remove_file(path)
        }
    }
}

#[async_trait]
impl FileSystem for StdFileSystem {
    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(FileStat {
            entry_type: Self::entry_type_of(meta.file_type()),
            size: meta.len(),
            modified: meta.modified().ok(),
        })
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(path).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let entry_type = Self::entry_type_of(entry.file_type().await?);
            entries.push(DirEntry::new(entry.path(), name, entry_type));
        }
        Ok(entries)
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, data).await
    }

    async fn create_dir(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir(path).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        tokio::fs::rename(from, to).await
    }

    async fn delete(&self, path: &Path, options: DeleteOptions) -> io::Result<()> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            if options.use_trash {
                // The trash API has no "not found" kind of its own
                std::fs::symlink_metadata(&path)?;
                trash::delete(&path).map_err(io::Error::other)
            } else {
                Self::remove_permanently(&path, options.recursive)
            }
        })
        .await
        .map_err(io::Error::other)?
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stat_file_and_directory() {
        let fs = StdFileSystem;
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("file.txt");
        std::fs::write(&file, b"hello").unwrap();

        let stat = fs.stat(&file).await.unwrap();
        assert!(stat.is_file());
        assert_eq!(stat.size, 5);

        assert!(fs.is_dir(temp_dir.path()).await.unwrap());
        assert!(!fs.is_dir(&file).await.unwrap());
    }

    #[tokio::test]
    async fn test_stat_missing_is_not_found() {
        let fs = StdFileSystem;
        let temp_dir = tempfile::tempdir().unwrap();

        let err = fs.stat(&temp_dir.path().join("missing")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!fs.exists(&temp_dir.path().join("missing")).await);
    }

    #[tokio::test]
    async fn test_read_dir() {
        let fs = StdFileSystem;
        let temp_dir = tempfile::tempdir().unwrap();

        fs.create_dir(&temp_dir.path().join("subdir")).await.unwrap();
        fs.write_file(&temp_dir.path().join("file1.txt"), b"content1")
            .await
            .unwrap();
        fs.write_file(&temp_dir.path().join("file2.txt"), b"content2")
            .await
            .unwrap();

        let entries = fs.read_dir(temp_dir.path()).await.unwrap();
        assert_eq!(entries.len(), 3);

        let subdir = entries.iter().find(|e| e.name == "subdir").unwrap();
        assert!(subdir.is_dir());
        let file = entries.iter().find(|e| e.name == "file1.txt").unwrap();
        assert!(file.is_file());
        assert_eq!(file.path, temp_dir.path().join("file1.txt"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_read_dir_reports_symlinks_without_following() {
        let fs = StdFileSystem;
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp_dir.path().join("target")).unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("target"),
            temp_dir.path().join("link"),
        )
        .unwrap();

        let entries = fs.read_dir(temp_dir.path()).await.unwrap();
        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert_eq!(link.entry_type, EntryType::Symlink);
    }

    #[tokio::test]
    async fn test_rename() {
        let fs = StdFileSystem;
        let temp_dir = tempfile::tempdir().unwrap();
        let from = temp_dir.path().join("old.txt");
        let to = temp_dir.path().join("new.txt");
        fs.write_file(&from, b"x").await.unwrap();

        fs.rename(&from, &to).await.unwrap();

        assert!(!fs.exists(&from).await);
        assert!(fs.exists(&to).await);
    }

    #[tokio::test]
    async fn test_permanent_recursive_delete() {
        let fs = StdFileSystem;
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("dir");
        fs.create_dir(&dir).await.unwrap();
        fs.write_file(&dir.join("inner.txt"), b"x").await.unwrap();

        fs.delete(
            &dir,
            DeleteOptions {
                recursive: true,
                use_trash: false,
            },
        )
        .await
        .unwrap();

        assert!(!fs.exists(&dir).await);
    }

    #[tokio::test]
    async fn test_delete_missing_path_fails() {
        let fs = StdFileSystem;
        let temp_dir = tempfile::tempdir().unwrap();

        let err = fs
            .delete(&temp_dir.path().join("missing"), DeleteOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
