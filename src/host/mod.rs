//! Host services
//!
//! Everything the folder registry, tree and file operations need from their
//! environment goes through the traits collected here:
//! - [`FileSystem`] for directory listing and mutations
//! - [`StateStore`] for the persisted folder list
//! - [`Dialogs`] for folder pickers, input boxes and messages
//! - [`Workbench`] for opening documents and revealing paths
//!
//! [`desktop`] talks to the real OS, [`terminal`] prompts on stdin/stdout and
//! [`scripted`] answers from a queue for headless runs and tests.

pub mod desktop;
pub mod scripted;
pub mod terminal;

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use crate::model::filesystem::FileSystem;
pub use crate::services::state::StateStore;

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// A message shown to the user, optionally with action buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
    /// Modal messages block until answered
    pub modal: bool,
    pub items: Vec<String>,
}

impl Message {
    pub fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            modal: false,
            items: Vec::new(),
        }
    }

    pub fn modal(mut self) -> Self {
        self.modal = true;
        self
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }
}

/// Options for the folder/file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDialogOptions {
    pub can_select_files: bool,
    pub can_select_folders: bool,
    pub can_select_many: bool,
    pub open_label: String,
}

/// Inline validation for an input box: `Some(message)` rejects the value
pub type InputValidator = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Options for a single-line text prompt
#[derive(Default)]
pub struct InputBoxOptions {
    pub prompt: String,
    pub placeholder: Option<String>,
    /// Pre-filled value
    pub value: Option<String>,
    /// Selected range of the pre-filled value, in characters
    pub value_selection: Option<(usize, usize)>,
    pub validate: Option<InputValidator>,
}

impl InputBoxOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>, selection: (usize, usize)) -> Self {
        self.value = Some(value.into());
        self.value_selection = Some(selection);
        self
    }

    pub fn validate(
        mut self,
        validate: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    /// Run the inline validator, if any
    pub fn check(&self, value: &str) -> Option<String> {
        self.validate.as_ref().and_then(|validate| validate(value))
    }
}

impl std::fmt::Debug for InputBoxOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBoxOptions")
            .field("prompt", &self.prompt)
            .field("placeholder", &self.placeholder)
            .field("value", &self.value)
            .field("value_selection", &self.value_selection)
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

/// Prompts and notifications
#[async_trait]
pub trait Dialogs: Send + Sync {
    /// Pick paths; `None` when cancelled
    async fn show_open_dialog(&self, options: &OpenDialogOptions) -> Option<Vec<PathBuf>>;

    /// Ask for a line of text; `None` when cancelled.
    ///
    /// Implementations must not return a value the validator rejects.
    async fn show_input_box(&self, options: InputBoxOptions) -> Option<String>;

    /// Show a message and return the chosen item, if any
    async fn show_message(&self, message: Message) -> Option<String>;
}

impl dyn Dialogs + '_ {
    pub async fn info(&self, text: impl Into<String>) {
        self.show_message(Message::new(MessageLevel::Info, text)).await;
    }

    pub async fn warning(&self, text: impl Into<String>) {
        self.show_message(Message::new(MessageLevel::Warning, text)).await;
    }

    pub async fn error(&self, text: impl Into<String>) {
        self.show_message(Message::new(MessageLevel::Error, text)).await;
    }
}

/// Opening and revealing paths outside the tree
#[async_trait]
pub trait Workbench: Send + Sync {
    /// Open a file for editing
    async fn open_document(&self, path: &Path) -> io::Result<()>;

    /// Open the containing folder of a file, or a directory itself, in the OS
    /// file browser
    async fn reveal_in_os(&self, path: &Path) -> io::Result<()>;

    /// Hand a path to the OS default handler
    async fn open_external(&self, path: &Path) -> io::Result<()>;
}

/// The full set of host services, shared by every component
#[derive(Clone)]
pub struct Host {
    pub fs: Arc<dyn FileSystem>,
    pub state: Arc<dyn StateStore>,
    pub dialogs: Arc<dyn Dialogs>,
    pub workbench: Arc<dyn Workbench>,
}

impl Host {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        state: Arc<dyn StateStore>,
        dialogs: Arc<dyn Dialogs>,
        workbench: Arc<dyn Workbench>,
    ) -> Self {
        Self {
            fs,
            state,
            dialogs,
            workbench,
        }
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_box_check_uses_validator() {
        let options = InputBoxOptions::new("Enter name")
            .validate(|value| (value == "bad").then(|| "nope".to_string()));

        assert_eq!(options.check("bad"), Some("nope".to_string()));
        assert_eq!(options.check("good"), None);
        assert_eq!(InputBoxOptions::new("x").check("anything"), None);
    }

    #[test]
    fn test_message_builder() {
        let message = Message::new(MessageLevel::Warning, "Delete?")
            .modal()
            .with_items(["Delete", "Cancel"]);

        assert!(message.modal);
        assert_eq!(message.items, vec!["Delete", "Cancel"]);
    }
}
