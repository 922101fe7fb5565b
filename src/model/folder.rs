//! Registered root folders and their comparison keys

use crate::primitives::path_utils::normalize_path;
use std::fmt;
use std::path::{Path, PathBuf};

/// How registered paths are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPolicy {
    /// Fold case before comparing (Windows and macOS filesystems are case-insensitive by default)
    pub case_insensitive: bool,
}

impl PathPolicy {
    pub const CASE_SENSITIVE: Self = Self {
        case_insensitive: false,
    };
    pub const CASE_INSENSITIVE: Self = Self {
        case_insensitive: true,
    };

    /// Policy of the platform we are running on
    pub fn native() -> Self {
        Self {
            case_insensitive: cfg!(any(windows, target_os = "macos")),
        }
    }

    /// Native policy unless explicitly overridden
    pub fn with_override(case_insensitive: Option<bool>) -> Self {
        case_insensitive
            .map(|case_insensitive| Self { case_insensitive })
            .unwrap_or_else(Self::native)
    }

    /// Build the comparison key for a path
    pub fn key(&self, path: &Path) -> FolderKey {
        // Rebuilding from components also drops trailing separators
        let mut text = normalize_path(path).to_string_lossy().into_owned();
        if self.case_insensitive {
            text = text.to_lowercase();
        }
        FolderKey(text)
    }
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self::native()
    }
}

/// Normalized identity of a registered folder
///
/// Two paths naming the same folder produce equal keys under the same
/// `PathPolicy`: `.` segments are dropped, `..` is folded, trailing separators
/// are removed and case is folded when the policy says so.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderKey(String);

impl FolderKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `self` names `other` or one of its ancestors (component-wise)
    pub fn contains(&self, other: &FolderKey) -> bool {
        Path::new(&other.0).starts_with(Path::new(&self.0))
    }
}

impl fmt::Display for FolderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered root folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    /// Path as registered by the user
    pub path: PathBuf,
    /// Display label (last path segment)
    pub label: String,
    /// Comparison key
    pub key: FolderKey,
}

impl FolderEntry {
    pub fn new(path: PathBuf, policy: &PathPolicy) -> Self {
        let label = label_for_path(&path);
        let key = policy.key(&path);
        Self { path, label, key }
    }
}

/// Display label for a path: its last segment, or the whole path when there is none
pub fn label_for_path(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
