//! Folder registry, file operations and the commands that drive them

pub mod collision;
pub mod commands;
pub mod file_ops;
pub mod registry;

pub use commands::{CommandId, GlobalFolders};
pub use file_ops::{FileOps, FileOpsOptions};
pub use registry::{FolderChange, FolderRegistry};
