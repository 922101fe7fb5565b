//! File and folder name validation
//!
//! Names are checked before anything touches the filesystem so that the
//! prompt can report problems inline. Windows naming rules (reserved
//! characters and device names) only apply when [`NamePlatform::Windows`] is
//! active; forward slashes, null bytes and over-long names are rejected
//! everywhere.

use rust_i18n::t;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Maximum name length in characters
pub const MAX_NAME_LEN: usize = 255;

const WINDOWS_RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Which platform's naming rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NamePlatform {
    Windows,
    Unix,
}

impl NamePlatform {
    pub fn current() -> Self {
        if cfg!(windows) {
            NamePlatform::Windows
        } else {
            NamePlatform::Unix
        }
    }

    fn reserves_windows_names(self) -> bool {
        self == NamePlatform::Windows
    }
}

/// Why a name was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("{}", t!("validation.empty"))]
    Empty,
    #[error("{}", t!("validation.single_dot"))]
    SingleDot,
    #[error("{}", t!("validation.trailing"))]
    TrailingSpaceOrDot,
    #[error("{}", t!("validation.reserved_chars"))]
    ReservedCharacter,
    #[error("{}", reserved_name_message(.0))]
    ReservedName(String),
    #[error("{}", t!("validation.slash"))]
    Slash,
    #[error("{}", t!("validation.null"))]
    NullByte,
    #[error("{}", t!("validation.too_long"))]
    TooLong,
}

fn reserved_name_message(name: &str) -> String {
    t!("validation.reserved_name", name = name).to_string()
}

/// Validate a file or folder name for the given platform
pub fn validate_name(name: &str, platform: NamePlatform) -> Result<(), NameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }

    if trimmed == "." {
        return Err(NameError::SingleDot);
    }

    if name.ends_with(' ') || name.ends_with('.') {
        return Err(NameError::TrailingSpaceOrDot);
    }

    if platform.reserves_windows_names() {
        if trimmed.contains(WINDOWS_RESERVED_CHARS) {
            return Err(NameError::ReservedCharacter);
        }

        let base_name = Path::new(trimmed)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| trimmed.to_string());
        if is_reserved_device_name(&base_name) {
            return Err(NameError::ReservedName(base_name));
        }
    }

    if trimmed.contains('/') {
        return Err(NameError::Slash);
    }

    if trimmed.contains('\0') {
        return Err(NameError::NullByte);
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(NameError::TooLong);
    }

    Ok(())
}

/// `con`, `prn`, `aux`, `nul`, `com0`-`com9`, `lpt0`-`lpt9` (any case)
fn is_reserved_device_name(base_name: &str) -> bool {
    let lower = base_name.to_ascii_lowercase();
    match lower.as_str() {
        "con" | "prn" | "aux" | "nul" => true,
        _ => {
            let numbered = lower
                .strip_prefix("com")
                .or_else(|| lower.strip_prefix("lpt"));
            matches!(numbered, Some(digit) if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit())
        }
    }
}
