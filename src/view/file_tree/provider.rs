//! Read-through tree of the registered folders
//!
//! Nothing is cached: every `children` call lists the directory again, so the
//! tree always reflects the filesystem at the time it is drawn.

use super::node::TreeNode;
use crate::app::registry::FolderRegistry;
use crate::host::{Dialogs, FileSystem, Host};
use crate::model::filesystem::{DirEntry, EntryType};
use crate::model::folder::label_for_path;
use crate::services::events::Emitter;
use rust_i18n::t;
use std::cmp::Ordering;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Which part of the tree must be redrawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeRefresh {
    All,
    Node(TreeNode),
}

pub struct FolderTreeProvider {
    fs: Arc<dyn FileSystem>,
    dialogs: Arc<dyn Dialogs>,
    refreshes: Emitter<TreeRefresh>,
}

impl FolderTreeProvider {
    pub fn new(host: &Host) -> Self {
        Self {
            fs: Arc::clone(&host.fs),
            dialogs: Arc::clone(&host.dialogs),
            refreshes: Emitter::new(),
        }
    }

    /// Redraw the whole tree whenever the registry changes
    pub fn watch(&self, registry: &FolderRegistry) {
        let refreshes = self.refreshes.clone();
        registry.changes().on(move |change| {
            tracing::debug!("Folder registry changed: {:?}", change);
            refreshes.fire(&TreeRefresh::All);
        });
    }

    /// Events for view subscribers
    pub fn refreshes(&self) -> &Emitter<TreeRefresh> {
        &self.refreshes
    }

    /// Ask the view to redraw one node, or everything
    pub fn refresh(&self, node: Option<&TreeNode>) {
        tracing::debug!(
            "Refreshing tree view: {}",
            node.map_or("all", |node| node.label.as_str())
        );
        let event = match node {
            Some(node) => TreeRefresh::Node(node.clone()),
            None => TreeRefresh::All,
        };
        self.refreshes.fire(&event);
    }

    /// Root nodes for `None`, otherwise the listing of `node`
    pub async fn children(
        &self,
        registry: &FolderRegistry,
        node: Option<&TreeNode>,
    ) -> Vec<TreeNode> {
        match node {
            None => self.roots(registry),
            Some(node) if node.kind.is_container() => self.list_children(node.path()).await,
            Some(_) => Vec::new(),
        }
    }

    /// One node per registered folder, in registry order
    pub fn roots(&self, registry: &FolderRegistry) -> Vec<TreeNode> {
        registry.folders().iter().map(TreeNode::root).collect()
    }

    /// Immediate entries of `path`: directories first, then files, by name.
    ///
    /// Symlinks and special files are skipped. Failures yield an empty list.
    pub async fn list_children(&self, path: &Path) -> Vec<TreeNode> {
        let mut entries = match self.fs.read_dir(path).await {
            Ok(entries) => entries,
            Err(e) => {
                self.report_list_error(path, &e).await;
                return Vec::new();
            }
        };
        sort_entries(&mut entries);

        entries
            .into_iter()
            .filter_map(|entry| match entry.entry_type {
                EntryType::Directory => Some(TreeNode::directory(entry.name, entry.path)),
                EntryType::File => Some(TreeNode::file(entry.name, entry.path)),
                EntryType::Symlink | EntryType::Unknown => {
                    tracing::trace!("Skipping {:?} ({:?})", entry.path, entry.entry_type);
                    None
                }
            })
            .collect()
    }

    async fn report_list_error(&self, path: &Path, error: &io::Error) {
        let path_text = path.display().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => {
                tracing::warn!("Directory not found: {}", path_text);
                self.dialogs
                    .warning(t!("tree.folder_not_found", path = path_text))
                    .await;
            }
            io::ErrorKind::PermissionDenied => {
                tracing::warn!("Permission denied: {}", path_text);
                self.dialogs
                    .warning(t!("tree.permission_denied", path = path_text))
                    .await;
            }
            _ => tracing::error!("Failed to read directory {}: {}", path_text, error),
        }
    }

    /// Node for an arbitrary path: a root when registered, otherwise a
    /// directory or file node depending on what is on disk
    pub async fn node_for_path(
        &self,
        registry: &FolderRegistry,
        path: &Path,
    ) -> io::Result<TreeNode> {
        let key = registry.policy().key(path);
        if let Some(folder) = registry.folders().into_iter().find(|folder| folder.key == key) {
            return Ok(TreeNode::root(&folder));
        }

        let stat = self.fs.stat(path).await?;
        let name = label_for_path(path);
        if stat.is_dir() {
            Ok(TreeNode::directory(name, path.to_path_buf()))
        } else if stat.is_file() {
            Ok(TreeNode::file(name, path.to_path_buf()))
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is neither a file nor a directory", path.display()),
            ))
        }
    }

    /// Expand the tree depth-first, `max_depth` levels below the roots.
    ///
    /// Returns each node with its depth (roots are depth 0).
    pub async fn walk(
        &self,
        registry: &FolderRegistry,
        start: Option<&TreeNode>,
        max_depth: usize,
    ) -> Vec<(usize, TreeNode)> {
        let mut stack: Vec<(usize, TreeNode)> = match start {
            Some(node) => vec![(0, node.clone())],
            None => self
                .roots(registry)
                .into_iter()
                .map(|node| (0, node))
                .collect(),
        };
        stack.reverse();

        let mut visited = Vec::new();
        while let Some((depth, node)) = stack.pop() {
            if depth < max_depth && node.kind.is_container() {
                let children = self.list_children(node.path()).await;
                stack.extend(children.into_iter().rev().map(|child| (depth + 1, child)));
            }
            visited.push((depth, node));
        }
        visited
    }
}

impl std::fmt::Debug for FolderTreeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderTreeProvider")
            .field("refreshes", &self.refreshes)
            .finish_non_exhaustive()
    }
}

/// Directories before everything else, then case-insensitive by name
pub fn sort_entries(entries: &mut [DirEntry]) {
    entries.sort_by(|a, b| match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    });
}
