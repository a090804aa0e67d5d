use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::fs;

use super::counters::{FolderStatus, SweepCounters};
use crate::error::{DiscoveryError, SweepError};
use crate::error_log::ErrorSink;
use crate::messages::Messages;

/// Result of removing one directory entry.
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted,
    /// Gone before we got to it, usually removed by another process.
    Missing,
    Failed(SweepError),
}

/// Remove one entry: files and links are unlinked, directories removed
/// recursively. Never retries.
pub async fn remove_entry(path: &Path) -> DeleteOutcome {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return DeleteOutcome::Missing,
        Err(source) => {
            return DeleteOutcome::Failed(SweepError::Delete {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    match result {
        Ok(()) => DeleteOutcome::Deleted,
        Err(e) if e.kind() == ErrorKind::NotFound => DeleteOutcome::Missing,
        Err(source) => DeleteOutcome::Failed(SweepError::Delete {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Deletes one directory entry on behalf of the engine.
#[async_trait]
pub trait EntryRemover: Send + Sync {
    async fn remove(&self, path: &Path) -> DeleteOutcome;
}

/// Deletes through the local filesystem with [`remove_entry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

#[async_trait]
impl EntryRemover for FsRemover {
    async fn remove(&self, path: &Path) -> DeleteOutcome {
        remove_entry(path).await
    }
}

async fn list_entries(folder: &Path) -> Result<Vec<PathBuf>, SweepError> {
    let to_err = |source| SweepError::Enumeration {
        path: folder.to_path_buf(),
        source,
    };
    let mut reader = fs::read_dir(folder).await.map_err(to_err)?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await.map_err(to_err)? {
        entries.push(entry.path());
    }
    Ok(entries)
}

/// Lists and clears target folders. Folders are processed concurrently, and
/// so are the entries within each folder.
pub struct SweepEngine {
    error_log: Arc<dyn ErrorSink>,
    messages: Messages,
    remover: Arc<dyn EntryRemover>,
}

impl SweepEngine {
    pub fn new(error_log: Arc<dyn ErrorSink>, messages: Messages) -> Self {
        Self::with_remover(error_log, messages, Arc::new(FsRemover))
    }

    pub fn with_remover(
        error_log: Arc<dyn ErrorSink>,
        messages: Messages,
        remover: Arc<dyn EntryRemover>,
    ) -> Self {
        SweepEngine {
            error_log,
            messages,
            remover,
        }
    }

    /// Sweep every folder and return the counters once all units have finished.
    pub async fn sweep(&self, targets: &[PathBuf]) -> SweepCounters {
        let counters = SweepCounters::new();
        for folder in targets {
            counters.register(folder);
        }

        join_all(targets.iter().map(|folder| self.sweep_folder(folder, &counters))).await;

        let totals = counters.totals();
        log::debug!(
            "Sweep finished: {} folders, {} detected, {} deleted, {} failed",
            totals.folders_visited,
            totals.files_detected,
            totals.files_deleted_ok,
            totals.files_deleted_fail
        );
        counters
    }

    async fn sweep_folder(&self, folder: &Path, counters: &SweepCounters) {
        let folder_str = folder.display().to_string();

        match fs::metadata(folder).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!(
                    "{}",
                    self.messages.format("folder.missing", &[("folder", folder_str.as_str())])
                );
                counters.set_status(folder, FolderStatus::Missing);
                return;
            }
            Err(source) => {
                let err = DiscoveryError::Existence {
                    path: folder.to_path_buf(),
                    source,
                };
                self.fail_folder(folder, counters, &err);
                return;
            }
        }

        let entries = match list_entries(folder).await {
            Ok(entries) => entries,
            Err(err) => {
                self.fail_folder(folder, counters, &err);
                return;
            }
        };

        counters.record_listing(folder, entries.len() as u64);
        if entries.is_empty() {
            log::info!(
                "{}",
                self.messages.format("folder.empty", &[("folder", folder_str.as_str())])
            );
            counters.set_status(folder, FolderStatus::Empty);
            return;
        }

        let count = entries.len().to_string();
        log::info!(
            "{}",
            self.messages.format(
                "folder.listing",
                &[("folder", folder_str.as_str()), ("count", count.as_str())]
            )
        );

        join_all(
            entries
                .iter()
                .map(|entry| self.delete_one(folder, entry, counters)),
        )
        .await;

        counters.set_status(folder, FolderStatus::Swept);
    }

    async fn delete_one(&self, folder: &Path, entry: &Path, counters: &SweepCounters) {
        let entry_str = entry.display().to_string();
        match self.remover.remove(entry).await {
            DeleteOutcome::Deleted => {
                counters.record_deleted(folder);
                log::debug!(
                    "{}",
                    self.messages.format("file.deleted", &[("file", entry_str.as_str())])
                );
            }
            DeleteOutcome::Missing => {
                counters.record_failed(folder);
                log::info!(
                    "{}",
                    self.messages.format("file.missing", &[("file", entry_str.as_str())])
                );
            }
            DeleteOutcome::Failed(err) => {
                counters.record_failed(folder);
                let reason = err.to_string();
                let message = self.messages.format(
                    "file.delete_failed",
                    &[("file", entry_str.as_str()), ("error", reason.as_str())],
                );
                self.error_log.record(&message, Some(&err));
            }
        }
    }

    fn fail_folder(
        &self,
        folder: &Path,
        counters: &SweepCounters,
        err: &(dyn std::error::Error + 'static),
    ) {
        let folder_str = folder.display().to_string();
        let reason = err.to_string();
        let message = self.messages.format(
            "folder.unreadable",
            &[("folder", folder_str.as_str()), ("error", reason.as_str())],
        );
        self.error_log.record(&message, Some(err));
        counters.set_status(folder, FolderStatus::Unreadable { error: reason });
    }
}
