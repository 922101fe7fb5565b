//! User-facing commands and the object that wires everything together

use super::file_ops::{FileOps, FileOpsOptions};
use super::registry::FolderRegistry;
use crate::host::{Host, OpenDialogOptions};
use crate::model::folder::PathPolicy;
use crate::view::file_tree::{FolderTreeProvider, NodeKind, TreeNode};
use rust_i18n::t;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    AddFolder,
    RemoveFolder,
    NewFile,
    NewFolder,
    Rename,
    Delete,
    OpenFile,
    OpenInOs,
    Refresh,
}

impl CommandId {
    pub const ALL: [CommandId; 9] = [
        CommandId::AddFolder,
        CommandId::RemoveFolder,
        CommandId::NewFile,
        CommandId::NewFolder,
        CommandId::Rename,
        CommandId::Delete,
        CommandId::OpenFile,
        CommandId::OpenInOs,
        CommandId::Refresh,
    ];

    /// Stable identifier hosts bind menus and keys to
    pub fn id(self) -> &'static str {
        match self {
            CommandId::AddFolder => "globoNote.addFolder",
            CommandId::RemoveFolder => "globoNote.removeFolder",
            CommandId::NewFile => "globoNote.newFile",
            CommandId::NewFolder => "globoNote.newFolder",
            CommandId::Rename => "globoNote.rename",
            CommandId::Delete => "globoNote.delete",
            CommandId::OpenFile => "globoNote.openFile",
            CommandId::OpenInOs => "globoNote.openInOS",
            CommandId::Refresh => "globoNote.refresh",
        }
    }

    pub fn title(self) -> String {
        match self {
            CommandId::AddFolder => t!("commands.add_folder"),
            CommandId::RemoveFolder => t!("commands.remove_folder"),
            CommandId::NewFile => t!("commands.new_file"),
            CommandId::NewFolder => t!("commands.new_folder"),
            CommandId::Rename => t!("commands.rename"),
            CommandId::Delete => t!("commands.delete"),
            CommandId::OpenFile => t!("commands.open_file"),
            CommandId::OpenInOs => t!("commands.open_in_os"),
            CommandId::Refresh => t!("commands.refresh"),
        }
        .to_string()
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.id() == id)
    }

    /// Whether the command does anything for this node argument
    pub fn accepts(self, node: Option<&TreeNode>) -> bool {
        let kind = node.map(|node| node.kind);
        match self {
            CommandId::AddFolder | CommandId::Refresh => true,
            CommandId::RemoveFolder => kind == Some(NodeKind::Root),
            CommandId::NewFile | CommandId::NewFolder => kind.is_some_and(NodeKind::is_container),
            CommandId::Rename | CommandId::Delete => {
                matches!(kind, Some(NodeKind::Directory | NodeKind::File))
            }
            CommandId::OpenFile => kind == Some(NodeKind::File),
            CommandId::OpenInOs => kind.is_some(),
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The registry, its tree and the file operations behind one set of host services
pub struct GlobalFolders {
    host: Host,
    registry: FolderRegistry,
    tree: FolderTreeProvider,
    file_ops: FileOps,
}

impl GlobalFolders {
    pub fn new(host: Host, policy: PathPolicy, options: FileOpsOptions) -> Self {
        tracing::info!("Starting globo-note");
        let registry = FolderRegistry::load(&host, policy);
        let tree = FolderTreeProvider::new(&host);
        tree.watch(&registry);
        let file_ops = FileOps::new(&host, options);
        Self {
            host,
            registry,
            tree,
            file_ops,
        }
    }

    pub fn registry(&self) -> &FolderRegistry {
        &self.registry
    }

    pub fn tree(&self) -> &FolderTreeProvider {
        &self.tree
    }

    pub fn file_ops(&self) -> &FileOps {
        &self.file_ops
    }

    /// Children of a node, or the roots
    pub async fn children(&self, node: Option<&TreeNode>) -> Vec<TreeNode> {
        self.tree.children(&self.registry, node).await
    }

    /// Run a command against an optional node.
    ///
    /// Returns `true` when the command took effect; nodes of the wrong kind
    /// and cancelled prompts return `false`.
    pub async fn execute(&mut self, command: CommandId, node: Option<&TreeNode>) -> bool {
        if !command.accepts(node) {
            tracing::debug!("Ignoring {} for {:?}", command, node.map(|node| node.kind));
            return false;
        }
        tracing::debug!("Executing {}", command);

        match (command, node) {
            (CommandId::AddFolder, _) => self.add_folder(None).await,
            (CommandId::RemoveFolder, Some(node)) => {
                let removed = self.registry.remove_folder(node.path()).await;
                if removed {
                    self.host.dialogs.info(t!("registry.removed")).await;
                }
                removed
            }
            (CommandId::NewFile, Some(node)) => {
                let created = self.file_ops.create_file(node.path()).await.is_some();
                if created {
                    self.tree.refresh(Some(node));
                }
                created
            }
            (CommandId::NewFolder, Some(node)) => {
                let created = self.file_ops.create_folder(node.path()).await.is_some();
                if created {
                    self.tree.refresh(Some(node));
                }
                created
            }
            (CommandId::Rename, Some(node)) => {
                let renamed = self.file_ops.rename(node.path()).await.is_some();
                if renamed {
                    self.tree.refresh(None);
                }
                renamed
            }
            (CommandId::Delete, Some(node)) => {
                let deleted = self.file_ops.delete_item(node.path()).await;
                if deleted {
                    self.tree.refresh(None);
                }
                deleted
            }
            (CommandId::OpenFile, Some(node)) => {
                self.file_ops.open_file(node.path()).await;
                true
            }
            (CommandId::OpenInOs, Some(node)) => {
                self.file_ops.open_in_os(node.path()).await;
                true
            }
            (CommandId::Refresh, node) => {
                self.tree.refresh(node);
                true
            }
            (_, None) => false,
        }
    }

    /// Register `path`, or a folder picked through the open dialog
    pub async fn add_folder(&mut self, path: Option<PathBuf>) -> bool {
        let path = match path {
            Some(path) => path,
            None => {
                let options = OpenDialogOptions {
                    can_select_files: false,
                    can_select_folders: true,
                    can_select_many: false,
                    open_label: CommandId::AddFolder.title(),
                };
                let picked = self.host.dialogs.show_open_dialog(&options).await;
                match picked.and_then(|paths| paths.into_iter().next()) {
                    Some(path) => path,
                    None => return false,
                }
            }
        };

        let added = self.registry.add_folder(&path).await;
        if added {
            self.host
                .dialogs
                .info(t!("registry.added", path = path.display().to_string()))
                .await;
        }
        added
    }
}

impl std::fmt::Debug for GlobalFolders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalFolders")
            .field("registry", &self.registry)
            .field("file_ops", &self.file_ops)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::scripted::{RecordingWorkbench, ScriptedDialogs};
    use crate::host::MessageLevel;
    use crate::model::filesystem::StdFileSystem;
    use crate::primitives::name_validation::NamePlatform;
    use crate::services::state::MemoryStateStore;
    use crate::view::file_tree::TreeRefresh;
    use std::sync::Arc;

    fn app() -> (GlobalFolders, Arc<ScriptedDialogs>) {
        let dialogs = Arc::new(ScriptedDialogs::new());
        let host = Host::new(
            Arc::new(StdFileSystem),
            Arc::new(MemoryStateStore::new()),
            dialogs.clone(),
            Arc::new(RecordingWorkbench::new()),
        );
        let options = FileOpsOptions {
            platform: NamePlatform::Unix,
            use_trash: false,
            confirm_delete: true,
        };
        (
            GlobalFolders::new(host, PathPolicy::CASE_SENSITIVE, options),
            dialogs,
        )
    }

    #[test]
    fn test_command_ids_round_trip() {
        for command in CommandId::ALL {
            assert_eq!(CommandId::from_id(command.id()), Some(command));
            assert!(!command.title().is_empty());
        }
        assert_eq!(CommandId::OpenInOs.to_string(), "globoNote.openInOS");
        assert_eq!(CommandId::from_id("globoNote.unknown"), None);
    }

    #[test]
    fn test_command_guards() {
        let root = TreeNode::root(&crate::model::folder::FolderEntry::new(
            PathBuf::from("/notes"),
            &PathPolicy::CASE_SENSITIVE,
        ));
        let dir = TreeNode::directory("d", PathBuf::from("/notes/d"));
        let file = TreeNode::file("f.md", PathBuf::from("/notes/f.md"));

        assert!(CommandId::RemoveFolder.accepts(Some(&root)));
        assert!(!CommandId::RemoveFolder.accepts(Some(&dir)));
        assert!(!CommandId::Rename.accepts(Some(&root)));
        assert!(CommandId::Delete.accepts(Some(&file)));
        assert!(CommandId::OpenFile.accepts(Some(&file)));
        assert!(!CommandId::OpenFile.accepts(Some(&dir)));
        assert!(!CommandId::NewFile.accepts(Some(&file)));
        assert!(CommandId::NewFolder.accepts(Some(&root)));
        assert!(!CommandId::OpenInOs.accepts(None));
        assert!(CommandId::Refresh.accepts(None));
    }

    #[tokio::test]
    async fn test_add_then_remove_through_commands() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut app, dialogs) = app();
        let refreshes = app.tree().refreshes().subscribe();

        dialogs.push_folder(Some(temp_dir.path().to_path_buf()));
        assert!(app.execute(CommandId::AddFolder, None).await);
        assert_eq!(refreshes.try_recv(), Ok(TreeRefresh::All));

        let roots = app.children(None).await;
        assert_eq!(roots.len(), 1);
        assert!(app.execute(CommandId::RemoveFolder, Some(&roots[0])).await);
        assert!(app.registry().is_empty());
        assert_eq!(refreshes.try_recv(), Ok(TreeRefresh::All));

        let info = dialogs.messages_at(MessageLevel::Info);
        assert_eq!(info[0], format!("Added folder: {}", temp_dir.path().display()));
        assert_eq!(info[1], "Removed folder from list");
    }

    #[tokio::test]
    async fn test_new_file_refreshes_target_node() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (mut app, dialogs) = app();
        dialogs.push_folder(Some(temp_dir.path().to_path_buf()));
        app.execute(CommandId::AddFolder, None).await;
        let root = app.children(None).await.remove(0);
        let refreshes = app.tree().refreshes().subscribe();

        dialogs.push_input(Some("todo.md"));
        assert!(app.execute(CommandId::NewFile, Some(&root)).await);

        assert_eq!(refreshes.try_recv(), Ok(TreeRefresh::Node(root.clone())));
        let children = app.children(Some(&root)).await;
        assert_eq!(children[0].label, "todo.md");
    }

    #[tokio::test]
    async fn test_wrong_node_kind_is_ignored() {
        let (mut app, dialogs) = app();
        let root = TreeNode::root(&crate::model::folder::FolderEntry::new(
            PathBuf::from("/notes"),
            &PathPolicy::CASE_SENSITIVE,
        ));

        assert!(!app.execute(CommandId::Delete, Some(&root)).await);
        assert!(!app.execute(CommandId::Rename, None).await);
        assert!(dialogs.messages().is_empty());
        assert!(dialogs.input_records().is_empty());
    }
}
