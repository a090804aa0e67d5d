use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Per-folder counts. For a folder that was listed successfully
/// `detected == deleted_ok + deleted_fail` once the sweep has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderTally {
    pub detected: u64,
    pub deleted_ok: u64,
    pub deleted_fail: u64,
}

impl FolderTally {
    pub fn is_balanced(&self) -> bool {
        self.detected == self.deleted_ok + self.deleted_fail
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FolderStatus {
    Pending,
    Missing,
    Unreadable { error: String },
    Empty,
    Swept,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FolderStatus,
    #[serde(flatten)]
    pub tally: FolderTally,
}

/// Run-wide totals, copied out of [`SweepCounters`] after all units joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepTotals {
    pub folders_visited: u64,
    pub files_detected: u64,
    pub files_deleted_ok: u64,
    pub files_deleted_fail: u64,
}

/// Counters shared by every concurrent sweep unit of one run.
#[derive(Debug, Default)]
pub struct SweepCounters {
    folders_visited: AtomicU64,
    files_detected: AtomicU64,
    files_deleted_ok: AtomicU64,
    files_deleted_fail: AtomicU64,
    folders: DashMap<PathBuf, (FolderStatus, FolderTally)>,
}

impl SweepCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, folder: &Path) {
        self.folders
            .entry(folder.to_path_buf())
            .or_insert((FolderStatus::Pending, FolderTally::default()));
    }

    pub(crate) fn set_status(&self, folder: &Path, status: FolderStatus) {
        if let Some(mut entry) = self.folders.get_mut(folder) {
            entry.0 = status;
        }
    }

    /// A folder was listed with `entries` items.
    pub(crate) fn record_listing(&self, folder: &Path, entries: u64) {
        self.folders_visited.fetch_add(1, Ordering::SeqCst);
        self.files_detected.fetch_add(entries, Ordering::SeqCst);
        if let Some(mut entry) = self.folders.get_mut(folder) {
            entry.1.detected += entries;
        }
    }

    pub(crate) fn record_deleted(&self, folder: &Path) {
        self.files_deleted_ok.fetch_add(1, Ordering::SeqCst);
        if let Some(mut entry) = self.folders.get_mut(folder) {
            entry.1.deleted_ok += 1;
        }
    }

    pub(crate) fn record_failed(&self, folder: &Path) {
        self.files_deleted_fail.fetch_add(1, Ordering::SeqCst);
        if let Some(mut entry) = self.folders.get_mut(folder) {
            entry.1.deleted_fail += 1;
        }
    }

    pub fn totals(&self) -> SweepTotals {
        SweepTotals {
            folders_visited: self.folders_visited.load(Ordering::SeqCst),
            files_detected: self.files_detected.load(Ordering::SeqCst),
            files_deleted_ok: self.files_deleted_ok.load(Ordering::SeqCst),
            files_deleted_fail: self.files_deleted_fail.load(Ordering::SeqCst),
        }
    }

    pub fn folder(&self, folder: &Path) -> Option<FolderReport> {
        self.folders.get(folder).map(|entry| FolderReport {
            path: folder.to_path_buf(),
            status: entry.0.clone(),
            tally: entry.1,
        })
    }
}
