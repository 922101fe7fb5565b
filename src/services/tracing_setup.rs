//! Tracing subscriber setup
//!
//! This module provides the tracing configuration shared by the binary and tests.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber writing to `log_file_path`.
///
/// Filtering comes from `RUST_LOG` (INFO when unset), plus an optional extra
/// directive such as `globo_note=debug`.
pub fn init_global(log_file_path: &Path, extra_directive: Option<&str>) -> io::Result<()> {
    let log_file = File::create(log_file_path)?;
    build_subscriber(log_file, extra_directive)
        .try_init()
        .map_err(io::Error::other)
}

/// Build a subscriber with file logging.
///
/// This is the core subscriber configuration shared between production and tests.
pub fn build_subscriber(
    log_file: File,
    extra_directive: Option<&str>,
) -> impl tracing::Subscriber + Send + Sync {
    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(directive) = extra_directive {
        match directive.parse() {
            Ok(directive) => env_filter = env_filter.add_directive(directive),
            Err(e) => eprintln!("Ignoring invalid log filter {directive:?}: {e}"),
        }
    }

    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_subscriber_writes_to_log_file() {
        let log_file = NamedTempFile::new().unwrap();
        let subscriber = build_subscriber(log_file.reopen().unwrap(), None);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("Folder not found: /missing");
        });

        let contents = std::fs::read_to_string(log_file.path()).unwrap();
        assert!(contents.contains("WARN"), "Log should contain WARN level");
        assert!(contents.contains("Folder not found: /missing"));
    }

    #[test]
    fn test_extra_directive_enables_debug() {
        let log_file = NamedTempFile::new().unwrap();
        let subscriber = build_subscriber(log_file.reopen().unwrap(), Some("trace"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("Listing children");
        });

        let contents = std::fs::read_to_string(log_file.path()).unwrap();
        assert!(contents.contains("Listing children"));
    }
}
