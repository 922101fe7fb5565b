//! Name collision checks and unique-name generation

use crate::model::filesystem::FileSystem;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Candidates tried by [`generate_unique_name`]: the base name plus `(1)`..`(99)`
pub const MAX_UNIQUE_NAME_ATTEMPTS: usize = 100;

/// Outcome of a collision check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub exists: bool,
    /// `parent/name`
    pub path: PathBuf,
}

/// Check whether `name` is already taken inside `parent`.
///
/// Stat failures other than "not found" are logged and treated as free.
pub async fn check_collision(fs: &dyn FileSystem, parent: &Path, name: &str) -> Collision {
    let path = parent.join(name);
    match fs.stat(&path).await {
        Ok(_) => Collision { exists: true, path },
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::error!("Error checking file existence {:?}: {}", path, e);
            }
            Collision {
                exists: false,
                path,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not generate unique name for {base_name:?} after {attempts} attempts")]
pub struct UniqueNameError {
    pub base_name: String,
    pub attempts: usize,
}

/// Split `name` into stem and extension (the extension keeps its dot).
///
/// A dot in first position does not start an extension, so `.bashrc` has none.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Find a free name in `parent`, starting from `base_name` and then trying
/// `"stem (n).ext"` for increasing `n`.
pub async fn generate_unique_name(
    fs: &dyn FileSystem,
    parent: &Path,
    base_name: &str,
) -> Result<String, UniqueNameError> {
    let (stem, ext) = split_extension(base_name);

    for attempt in 0..MAX_UNIQUE_NAME_ATTEMPTS {
        let candidate = if attempt == 0 {
            base_name.to_string()
        } else {
            format!("{stem} ({attempt}){ext}")
        };
        if !check_collision(fs, parent, &candidate).await.exists {
            return Ok(candidate);
        }
    }

    Err(UniqueNameError {
        base_name: base_name.to_string(),
        attempts: MAX_UNIQUE_NAME_ATTEMPTS,
    })
}
