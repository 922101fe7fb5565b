//! Persistent registry of global root folders
//!
//! The registry keeps user-chosen folders in insertion order and writes the
//! whole list back to the state store after every change. Paths are compared
//! through their `FolderKey`, so `/notes` and `/notes/` are the same folder.

use crate::host::{Dialogs, FileSystem, Host, StateStore};
use crate::model::folder::{FolderEntry, PathPolicy};
use crate::primitives::path_utils::normalize_path;
use crate::services::events::Emitter;
use crate::services::state::StateError;
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// State key holding the list of registered folder paths
pub const FOLDERS_KEY: &str = "globoNote.folders";
/// State key holding the schema version of the stored list
pub const SCHEMA_VERSION_KEY: &str = "globoNote.schemaVersion";
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Notification sent after the registry changed and was persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderChange {
    Added(FolderEntry),
    Removed(FolderEntry),
}

pub struct FolderRegistry {
    folders: Vec<FolderEntry>,
    policy: PathPolicy,
    fs: Arc<dyn FileSystem>,
    state: Arc<dyn StateStore>,
    dialogs: Arc<dyn Dialogs>,
    changes: Emitter<FolderChange>,
}

impl FolderRegistry {
    /// Load the registry from the host state store.
    ///
    /// Unreadable state is logged and yields an empty registry.
    pub fn load(host: &Host, policy: PathPolicy) -> Self {
        let mut registry = Self {
            folders: Vec::new(),
            policy,
            fs: Arc::clone(&host.fs),
            state: Arc::clone(&host.state),
            dialogs: Arc::clone(&host.dialogs),
            changes: Emitter::new(),
        };
        registry.folders = registry.read_stored_folders();
        registry
    }

    fn read_stored_folders(&self) -> Vec<FolderEntry> {
        let state: &dyn StateStore = self.state.as_ref();

        let stored = match state.get_as::<Vec<String>>(FOLDERS_KEY) {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                tracing::error!("Failed to load folders: {}", e);
                return Vec::new();
            }
        };
        let schema_version = state
            .get_as::<u32>(SCHEMA_VERSION_KEY)
            .ok()
            .flatten()
            .unwrap_or(CURRENT_SCHEMA_VERSION);
        tracing::info!(
            "Loading folders: {} entries, schema version: {}",
            stored.len(),
            schema_version
        );

        let mut folders: Vec<FolderEntry> = Vec::with_capacity(stored.len());
        for path in stored {
            let entry = FolderEntry::new(PathBuf::from(&path), &self.policy);
            if folders.iter().any(|existing| existing.key == entry.key) {
                tracing::warn!("Skipping duplicate stored folder: {}", path);
                continue;
            }
            folders.push(entry);
        }
        folders
    }

    /// Write the schema version and the folder list
    async fn save(&self) -> Result<(), StateError> {
        let state: &dyn StateStore = self.state.as_ref();
        let paths: Vec<String> = self
            .folders
            .iter()
            .map(|folder| folder.path.to_string_lossy().into_owned())
            .collect();

        // Folder list last: a failed save leaves the stored list untouched
        state
            .update_as(SCHEMA_VERSION_KEY, &CURRENT_SCHEMA_VERSION)
            .await?;
        state.update_as(FOLDERS_KEY, &paths).await?;
        tracing::debug!("Saved {} folders", paths.len());
        Ok(())
    }

    async fn report_save_failure(&self, error: &StateError) {
        tracing::error!("Failed to save folders: {}", error);
        self.dialogs
            .error(t!("registry.save_failed", error = error.to_string()))
            .await;
    }

    /// Snapshot of the registered folders in insertion order
    pub fn folders(&self) -> Vec<FolderEntry> {
        self.folders.clone()
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn policy(&self) -> PathPolicy {
        self.policy
    }

    /// Listeners notified after every persisted change
    pub fn changes(&self) -> &Emitter<FolderChange> {
        &self.changes
    }

    /// Register a directory.
    ///
    /// Returns `false` when the folder is already registered, is not an
    /// accessible directory, or the updated list could not be saved.
    pub async fn add_folder(&mut self, path: &Path) -> bool {
        if self.has_folder(path) {
            tracing::warn!("Folder already registered: {}", path.display());
            self.dialogs.info(t!("registry.already_registered")).await;
            return false;
        }

        match self.fs.stat(path).await {
            Ok(stat) if stat.is_dir() => {}
            Ok(_) => {
                tracing::warn!("Not a directory: {}", path.display());
                self.dialogs.error(t!("registry.not_a_directory")).await;
                return false;
            }
            Err(e) => {
                tracing::error!(
                    "Folder does not exist or cannot be accessed: {}: {}",
                    path.display(),
                    e
                );
                self.dialogs.error(t!("registry.inaccessible")).await;
                return false;
            }
        }

        let entry = FolderEntry::new(normalize_path(path), &self.policy);
        self.folders.push(entry.clone());

        if let Err(e) = self.save().await {
            self.folders.pop();
            self.report_save_failure(&e).await;
            return false;
        }

        tracing::info!("Added folder: {}", entry.path.display());
        self.changes.fire(&FolderChange::Added(entry));
        true
    }

    /// Unregister a folder. Returns `false` when it was not registered or the
    /// updated list could not be saved.
    pub async fn remove_folder(&mut self, path: &Path) -> bool {
        let key = self.policy.key(path);
        let Some(index) = self.folders.iter().position(|folder| folder.key == key) else {
            tracing::warn!("Folder not found for removal: {}", path.display());
            return false;
        };

        let entry = self.folders.remove(index);
        if let Err(e) = self.save().await {
            self.folders.insert(index, entry);
            self.report_save_failure(&e).await;
            return false;
        }

        tracing::info!("Removed folder: {}", entry.path.display());
        self.changes.fire(&FolderChange::Removed(entry));
        true
    }

    pub fn has_folder(&self, path: &Path) -> bool {
        let key = self.policy.key(path);
        self.folders.iter().any(|folder| folder.key == key)
    }

    /// The registered root containing `path`; the deepest one when roots nest
    pub fn find_root_folder(&self, path: &Path) -> Option<&FolderEntry> {
        let key = self.policy.key(path);
        self.folders
            .iter()
            .filter(|folder| folder.key.contains(&key))
            .max_by_key(|folder| folder.key.as_str().len())
    }
}

impl std::fmt::Debug for FolderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderRegistry")
            .field("folders", &self.folders)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
