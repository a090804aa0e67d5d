mod catalog;
mod config;
mod dispatch;
mod error;
mod error_log;
mod identity;
mod messages;
mod options;
mod orchestrator;
mod report;
mod runner;
mod sweep;
mod targets;
mod version;

pub use catalog::{tool_for, Elevation, Invocation, ToolSpec, TOOL_CATALOG};
pub use config::{
    default_config_path, RunMetrics, RunTimings, Settings, CONFIG_ENV_VAR, DEFAULT_RELEASE_API_URL,
};
pub use dispatch::ToolDispatcher;
pub use error::{ConfigError, DiscoveryError, ProcessError, SweepError};
pub use error_log::{ErrorLog, ErrorSink};
pub use identity::{normalize_user_name, FixedIdentity, IdentityProvider, SystemIdentity};
pub use messages::{Locale, Messages};
pub use options::{read_option_pairs, OptionKey, OptionSet, MAX_OPTIONS, RECOGNIZED_OPTIONS};
pub use orchestrator::{Orchestrator, SPOTIFY_NOTICE_FILE};
pub use report::{summarize, SummaryReport};
pub use runner::{CommandOutput, CommandRunner, ShellRunner};
pub use sweep::{
    remove_entry, DeleteOutcome, EntryRemover, FolderReport, FolderStatus, FolderTally,
    FsRemover, SweepCounters, SweepEngine, SweepTotals,
};
pub use targets::{
    prefetch_dir, previous_install_dir, system_temp_dir, upgrade_staging_dir, user_temp_dir,
    TargetList, TargetResolver,
};
pub use version::{compare_versions, VersionNotifier, VersionStatus, CURRENT_VERSION};
