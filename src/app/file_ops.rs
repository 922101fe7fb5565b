//! Create, rename, delete, open and reveal entries below the registered roots
//!
//! Every operation prompts through the host dialogs, reports problems as
//! messages and returns a plain sentinel (`None` / `false`) instead of an
//! error: nothing here is fatal to the caller.

use super::collision::check_collision;
use crate::host::{Dialogs, FileSystem, Host, InputBoxOptions, Message, MessageLevel, Workbench};
use crate::model::filesystem::DeleteOptions;
use crate::primitives::name_validation::{validate_name, NamePlatform};
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Behaviour switches for file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOpsOptions {
    /// Naming rules applied to new names
    pub platform: NamePlatform,
    /// Move deleted entries to the OS trash
    pub use_trash: bool,
    /// Ask before deleting
    pub confirm_delete: bool,
}

impl Default for FileOpsOptions {
    fn default() -> Self {
        Self {
            platform: NamePlatform::current(),
            use_trash: true,
            confirm_delete: true,
        }
    }
}

/// Last path segment, or an empty string
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Selection covering the stem of `name`: everything before the last dot,
/// unless that dot starts the name
pub fn stem_selection(name: &str) -> (usize, usize) {
    let end = match name.rfind('.') {
        Some(dot) if dot > 0 => name[..dot].chars().count(),
        _ => name.chars().count(),
    };
    (0, end)
}

fn name_validator(platform: NamePlatform) -> impl Fn(&str) -> Option<String> + Send + Sync {
    move |value: &str| validate_name(value, platform).err().map(|e| e.to_string())
}

pub struct FileOps {
    fs: Arc<dyn FileSystem>,
    dialogs: Arc<dyn Dialogs>,
    workbench: Arc<dyn Workbench>,
    options: FileOpsOptions,
}

impl FileOps {
    pub fn new(host: &Host, options: FileOpsOptions) -> Self {
        Self {
            fs: Arc::clone(&host.fs),
            dialogs: Arc::clone(&host.dialogs),
            workbench: Arc::clone(&host.workbench),
            options,
        }
    }

    pub fn options(&self) -> FileOpsOptions {
        self.options
    }

    /// Prompt for a name that passes validation; `None` when cancelled
    async fn prompt_new_name(&self, prompt: String, placeholder: String) -> Option<String> {
        let options = InputBoxOptions::new(prompt)
            .placeholder(placeholder)
            .validate(name_validator(self.options.platform));
        self.dialogs
            .show_input_box(options)
            .await
            .filter(|name| !name.is_empty())
    }

    /// Ask a modal question and report whether `accept` was picked
    async fn confirm(&self, text: String, accept: String) -> bool {
        let message = Message::new(MessageLevel::Warning, text)
            .modal()
            .with_items([accept.clone(), t!("ops.cancel").to_string()]);
        self.dialogs.show_message(message).await.as_deref() == Some(accept.as_str())
    }

    /// Create an empty file in `parent` and open it.
    ///
    /// An existing file is only replaced after the user agrees to overwrite it.
    pub async fn create_file(&self, parent: &Path) -> Option<PathBuf> {
        let name = self
            .prompt_new_name(
                t!("ops.file_prompt").to_string(),
                t!("ops.file_placeholder").to_string(),
            )
            .await?;

        let collision = check_collision(self.fs.as_ref(), parent, &name).await;
        if collision.exists {
            let overwrite = self
                .confirm(
                    t!("ops.file_exists_overwrite", name = &name).to_string(),
                    t!("ops.overwrite").to_string(),
                )
                .await;
            if !overwrite {
                return None;
            }
        }

        let path = collision.path;
        if let Err(e) = self.fs.write_file(&path, &[]).await {
            tracing::error!("Failed to create file {}: {}", path.display(), e);
            self.dialogs
                .error(t!("ops.error_creating_file", error = e.to_string()))
                .await;
            return None;
        }
        tracing::info!("Created file: {}", path.display());

        self.open_file(&path).await;
        Some(path)
    }

    /// Create a directory in `parent`. Existing names are rejected.
    pub async fn create_folder(&self, parent: &Path) -> Option<PathBuf> {
        let name = self
            .prompt_new_name(
                t!("ops.folder_prompt").to_string(),
                t!("ops.folder_placeholder").to_string(),
            )
            .await?;

        let collision = check_collision(self.fs.as_ref(), parent, &name).await;
        if collision.exists {
            self.dialogs.error(t!("ops.folder_exists", name = &name)).await;
            return None;
        }

        let path = collision.path;
        if let Err(e) = self.fs.create_dir(&path).await {
            tracing::error!("Failed to create folder {}: {}", path.display(), e);
            self.dialogs
                .error(t!("ops.error_creating_folder", error = e.to_string()))
                .await;
            return None;
        }
        tracing::info!("Created folder: {}", path.display());
        Some(path)
    }

    /// Rename `path` within its parent directory.
    ///
    /// The prompt starts with the current name, stem selected. An unchanged
    /// name ends the operation without touching the filesystem.
    pub async fn rename(&self, path: &Path) -> Option<PathBuf> {
        let old_name = file_name(path);
        let platform = self.options.platform;
        let validate_old = old_name.clone();

        let options = InputBoxOptions::new(t!("ops.rename_prompt"))
            .value(old_name.clone(), stem_selection(&old_name))
            .validate(move |value| {
                if value == validate_old {
                    return Some(t!("validation.unchanged").to_string());
                }
                validate_name(value, platform).err().map(|e| e.to_string())
            });

        let new_name = self.dialogs.show_input_box(options).await?;
        if new_name.is_empty() || new_name == old_name {
            return None;
        }

        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        let collision = check_collision(self.fs.as_ref(), parent, &new_name).await;
        if collision.exists {
            self.dialogs.error(t!("ops.name_exists", name = &new_name)).await;
            return None;
        }

        let new_path = collision.path;
        if let Err(e) = self.fs.rename(path, &new_path).await {
            tracing::error!(
                "Failed to rename {} -> {}: {}",
                path.display(),
                new_path.display(),
                e
            );
            self.dialogs
                .error(t!("ops.error_renaming", error = e.to_string()))
                .await;
            return None;
        }
        tracing::info!("Renamed: {} -> {}", path.display(), new_path.display());
        Some(new_path)
    }

    /// Delete a file or a directory with everything in it, after confirmation
    pub async fn delete_item(&self, path: &Path) -> bool {
        let name = file_name(path);

        let is_dir = match self.fs.stat(path).await {
            Ok(stat) => stat.is_dir(),
            Err(e) => {
                tracing::warn!("Could not stat item for deletion: {}: {}", path.display(), e);
                false
            }
        };
        let item_type = if is_dir { "folder" } else { "file" };

        if self.options.confirm_delete {
            let question = if is_dir {
                t!("ops.delete_folder_confirm", name = &name)
            } else {
                t!("ops.delete_file_confirm", name = &name)
            };
            if !self
                .confirm(question.to_string(), t!("ops.delete").to_string())
                .await
            {
                return false;
            }
        }

        let options = DeleteOptions {
            recursive: true,
            use_trash: self.options.use_trash,
        };
        if let Err(e) = self.fs.delete(path, options).await {
            tracing::error!("Failed to delete {} {}: {}", item_type, path.display(), e);
            self.dialogs
                .error(t!("ops.error_deleting", error = e.to_string()))
                .await;
            return false;
        }

        tracing::info!("Deleted {}: {}", item_type, path.display());
        self.dialogs.info(t!("ops.deleted", name = &name)).await;
        true
    }

    /// Open a file in the workbench
    pub async fn open_file(&self, path: &Path) {
        match self.workbench.open_document(path).await {
            Ok(()) => tracing::info!("Opened file: {}", path.display()),
            Err(e) => {
                tracing::error!("Failed to open file {}: {}", path.display(), e);
                self.dialogs
                    .error(t!("ops.error_opening", error = e.to_string()))
                    .await;
            }
        }
    }

    /// Show `path` in the OS file browser: files are revealed in their folder,
    /// directories are opened
    pub async fn open_in_os(&self, path: &Path) {
        let result = match self.fs.stat(path).await {
            Ok(stat) if stat.is_file() => self.workbench.reveal_in_os(path).await,
            Ok(_) => self.workbench.open_external(path).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => tracing::info!("Revealed in OS: {}", path.display()),
            Err(e) => {
                tracing::error!("Failed to reveal {} in OS: {}", path.display(), e);
                self.dialogs
                    .error(t!("ops.error_revealing", error = e.to_string()))
                    .await;
            }
        }
    }
}

impl std::fmt::Debug for FileOps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileOps")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
