// src/report.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RunTimings;
use crate::messages::Messages;
use crate::sweep::{FolderReport, SweepCounters, SweepTotals};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryReport {
    pub run_id: Option<Uuid>,
    pub target_count: usize,
    pub totals: SweepTotals,
    pub folders: Vec<FolderReport>,
    pub timings: Option<RunTimings>,
    /// Human-readable one-liner in the configured locale.
    pub line: String,
}

/// Builds the final report. Call only after every sweep unit has been joined.
pub fn summarize(
    counters: &SweepCounters,
    targets: &[std::path::PathBuf],
    messages: &Messages,
) -> SummaryReport {
    let totals = counters.totals();
    let folders: Vec<FolderReport> = targets.iter().filter_map(|t| counters.folder(t)).collect();

    let detected = totals.files_detected.to_string();
    let deleted = totals.files_deleted_ok.to_string();
    let failed = totals.files_deleted_fail.to_string();
    let visited = totals.folders_visited.to_string();
    let target_count = targets.len().to_string();
    let line = messages.format(
        "summary",
        &[
            ("detected", detected.as_str()),
            ("deleted", deleted.as_str()),
            ("failed", failed.as_str()),
            ("folders", visited.as_str()),
            ("targets", target_count.as_str()),
        ],
    );

    SummaryReport {
        run_id: None,
        target_count: targets.len(),
        totals,
        folders,
        timings: None,
        line,
    }
}

impl SummaryReport {
    pub fn with_run(mut self, run_id: Uuid, timings: RunTimings) -> Self {
        self.run_id = Some(run_id);
        self.timings = Some(timings);
        self
    }
}
