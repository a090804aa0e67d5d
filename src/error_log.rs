// src/error_log.rs

use std::error::Error as StdError;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

/// Append-only sink for failures. Implementations must never panic or
/// surface their own I/O problems to the caller.
pub trait ErrorSink: Send + Sync {
    fn record(&self, message: &str, error: Option<&(dyn StdError + 'static)>);
}

/// Writes entries to a plain text log file.
pub struct ErrorLog {
    path: PathBuf,
    // serializes concurrent appends from sweep tasks
    lock: Mutex<()>,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ErrorLog {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    fn render(message: &str, error: Option<&(dyn StdError + 'static)>) -> String {
        let mut entry = format!("\n[{}] - {}\n", Self::timestamp(), message);
        if let Some(err) = error {
            entry.push_str(&format!("Error: {}\n", err));
            let mut source = err.source();
            while let Some(cause) = source {
                entry.push_str(&format!("Caused by: {}\n", cause));
                source = cause.source();
            }
        }
        entry
    }

    fn append(&self, entry: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let fresh = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if fresh {
            writeln!(file, "Error log started at: {}", Self::timestamp())?;
        }
        file.write_all(entry.as_bytes())
    }
}

impl ErrorSink for ErrorLog {
    fn record(&self, message: &str, error: Option<&(dyn StdError + 'static)>) {
        match error {
            Some(err) => log::warn!("{} {}", message, err),
            None => log::warn!("{}", message),
        }

        let entry = Self::render(message, error);
        let _guard = match self.lock.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = self.append(&entry) {
            log::warn!("Error writing to {}: {}", self.path.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessError;
    use tempfile::TempDir;

    #[test]
    fn first_entry_writes_header() {
        let dir = TempDir::new().unwrap();
        let log = ErrorLog::new(dir.path().join("logs").join("error.log"));
        log.record("Disk check failed", None);
        log.record("second", None);

        let contents = fs::read_to_string(log.path()).unwrap();
        assert!(contents.starts_with("Error log started at: "));
        assert_eq!(contents.matches("Error log started at").count(), 1);
        assert!(contents.contains("] - Disk check failed"));
        assert!(contents.contains("] - second"));
    }

    #[test]
    fn attached_error_is_rendered() {
        let dir = TempDir::new().unwrap();
        let log = ErrorLog::new(dir.path().join("error.log"));
        let err = ProcessError::TimedOut {
            command: "sfc /scannow".into(),
            secs: 5,
        };
        log.record("Error opening Scan:", Some(&err));

        let contents = fs::read_to_string(log.path()).unwrap();
        assert!(contents.contains("Error: `sfc /scannow` did not finish within 5s"));
    }

    #[test]
    fn unwritable_destination_is_swallowed() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the open fail.
        let target = dir.path().join("error.log");
        fs::create_dir_all(&target).unwrap();
        let log = ErrorLog::new(&target);
        log.record("does not panic", None);
    }
}
