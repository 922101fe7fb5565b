use crate::app::commands::CommandId;
use crate::model::folder::FolderEntry;
use std::fmt;
use std::path::{Path, PathBuf};

/// What a tree node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A registered root folder
    Root,
    /// A directory below a root
    Directory,
    /// A regular file
    File,
}

impl NodeKind {
    /// Context value hosts use to pick node menus
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Directory => "directory",
            NodeKind::File => "file",
        }
    }

    /// Whether the node lists children
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Root | NodeKind::Directory)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expansion state shown by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collapsible {
    /// Leaf, cannot be expanded
    None,
    Collapsed,
    Expanded,
}

/// A displayed entry in the folder tree
///
/// Nodes are recomputed on every listing and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub path: PathBuf,
    pub label: String,
    /// Full path
    pub tooltip: String,
    pub collapsible: Collapsible,
    /// Command run when the node is activated
    pub command: Option<CommandId>,
}

impl TreeNode {
    fn new(kind: NodeKind, label: String, path: PathBuf) -> Self {
        let (collapsible, command) = match kind {
            NodeKind::Root | NodeKind::Directory => (Collapsible::Collapsed, None),
            NodeKind::File => (Collapsible::None, Some(CommandId::OpenFile)),
        };
        Self {
            kind,
            tooltip: path.display().to_string(),
            path,
            label,
            collapsible,
            command,
        }
    }

    pub fn root(folder: &FolderEntry) -> Self {
        Self::new(NodeKind::Root, folder.label.clone(), folder.path.clone())
    }

    pub fn directory(name: impl Into<String>, path: PathBuf) -> Self {
        Self::new(NodeKind::Directory, name.into(), path)
    }

    pub fn file(name: impl Into<String>, path: PathBuf) -> Self {
        Self::new(NodeKind::File, name.into(), path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.kind == NodeKind::Root
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }
}
