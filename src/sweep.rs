mod counters;
mod engine;


pub use counters::{FolderReport, FolderStatus, FolderTally, SweepCounters, SweepTotals};
pub use engine::{remove_entry, DeleteOutcome, EntryRemover, FsRemover, SweepEngine};
