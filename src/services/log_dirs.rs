//! Log directory management
//!
//! Logs are stored in the platform state directory:
//! - `$XDG_STATE_HOME/globo-note/logs/` (typically `~/.local/state/globo-note/logs/`)
//! - the local data directory on platforms without a state directory
//!
//! Each process writes a PID-named log file. Old log files from earlier runs are
//! cleaned up on startup.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

/// Minimum age for log files to be cleaned up (24 hours)
const CLEANUP_AGE: Duration = Duration::from_secs(24 * 60 * 60);

const APP_DIR: &str = "globo-note";

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get the log directory, creating it if necessary.
///
/// Falls back to the system temp directory when the state directory cannot be
/// determined or created.
pub fn log_dir() -> &'static PathBuf {
    LOG_DIR.get_or_init(|| {
        let fallback = std::env::temp_dir().join("globo-note-logs");
        let dir = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .map(|base| base.join(APP_DIR).join("logs"))
            .unwrap_or_else(|| fallback.clone());

        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Failed to create log directory {:?}: {}", dir, e);
            return fallback;
        }
        dir
    })
}

/// `{log_dir}/globo-note-{PID}.log`
pub fn main_log_path() -> PathBuf {
    log_dir().join(log_file_name(std::process::id()))
}

fn log_file_name(pid: u32) -> String {
    format!("{APP_DIR}-{pid}.log")
}

/// Remove log files of earlier runs that are older than a day.
pub fn cleanup_stale_logs() {
    cleanup_stale_logs_in_dir(log_dir(), std::process::id());
}

fn cleanup_stale_logs_in_dir(dir: &Path, current_pid: u32) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    let own_log = log_file_name(current_pid);
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        if !name.ends_with(".log") || name == own_log {
            continue;
        }

        if entry.file_type().map(|t| t.is_file()).unwrap_or(false)
            && is_file_older_than(&entry.path(), CLEANUP_AGE)
        {
            if let Err(e) = fs::remove_file(entry.path()) {
                tracing::debug!("Failed to clean up stale log {:?}: {}", entry.path(), e);
            } else {
                tracing::debug!("Cleaned up stale log file: {:?}", entry.path());
            }
        }
    }
}

fn is_file_older_than(path: &Path, age: Duration) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .is_some_and(|elapsed| elapsed > age)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_log_path_is_pid_named() {
        let path = main_log_path();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(name, format!("globo-note-{}.log", std::process::id()));
    }

    #[test]
    fn test_cleanup_keeps_fresh_and_own_logs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let own = temp_dir.path().join(log_file_name(42));
        let other = temp_dir.path().join(log_file_name(7));
        let unrelated = temp_dir.path().join("notes.txt");
        for path in [&own, &other, &unrelated] {
            fs::write(path, b"x").unwrap();
        }

        cleanup_stale_logs_in_dir(temp_dir.path(), 42);

        // Nothing is older than a day yet
        assert!(own.exists());
        assert!(other.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_is_file_older_than() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("a.log");
        fs::write(&path, b"x").unwrap();

        assert!(!is_file_older_than(&path, Duration::from_secs(60)));
        assert!(!is_file_older_than(&temp_dir.path().join("missing"), Duration::ZERO));
    }
}
