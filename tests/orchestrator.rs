use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use pc_sweeper_lib::{
    user_temp_dir, CommandOutput, CommandRunner, ConfigError, ErrorSink, FixedIdentity,
    FolderStatus, OptionKey, OptionSet, Orchestrator, ProcessError, Settings, SweepTotals,
    SPOTIFY_NOTICE_FILE, TOOL_CATALOG,
};

/// Records every command line; fails the ones containing `fail_on`.
#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput, ProcessError> {
        self.calls.lock().unwrap().push(command.to_string());
        match self.fail_on {
            Some(needle) if command.contains(needle) => Err(ProcessError::ExitStatus {
                command: command.to_string(),
                status: "exit code: 1".to_string(),
                stderr: "access denied".to_string(),
            }),
            _ => Ok(CommandOutput::default()),
        }
    }
}

#[derive(Default)]
struct MemorySink(Mutex<Vec<String>>);

impl ErrorSink for MemorySink {
    fn record(&self, message: &str, _error: Option<&(dyn StdError + 'static)>) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

struct Harness {
    drive: TempDir,
    runner: Arc<RecordingRunner>,
    sink: Arc<MemorySink>,
    orchestrator: Orchestrator,
}

fn harness(runner: RecordingRunner, concurrent: bool) -> Harness {
    let drive = TempDir::new().unwrap();
    let settings = Settings {
        system_drive: drive.path().to_path_buf(),
        notice_dir: drive.path().to_path_buf(),
        error_log_path: drive.path().join("error.log"),
        concurrent_dispatch: concurrent,
        release_api_url: None,
        ..Settings::default()
    };
    let runner = Arc::new(runner);
    let sink = Arc::new(MemorySink::default());
    let orchestrator = Orchestrator::new(
        settings,
        runner.clone(),
        Arc::new(FixedIdentity(Some("alice".to_string()))),
        sink.clone(),
    );
    Harness {
        drive,
        runner,
        sink,
        orchestrator,
    }
}

fn populate(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(name), b"scratch").unwrap();
    }
}

fn catalogue_invocations() -> usize {
    TOOL_CATALOG.iter().map(|spec| spec.invocations.len()).sum()
}

#[tokio::test]
async fn too_many_options_fail_before_any_work() {
    let h = harness(RecordingRunner::default(), false);
    let temp = user_temp_dir(h.drive.path(), "alice");
    populate(&temp, &["keep.tmp"]);

    let mut pairs: Vec<(String, bool)> = OptionKey::ALL
        .iter()
        .map(|key| (key.as_str().to_string(), true))
        .collect();
    pairs.push(("extraOne".to_string(), true));
    pairs.push(("extraTwo".to_string(), false));

    let result = h.orchestrator.run(pairs).await;

    assert!(matches!(
        result,
        Err(ConfigError::TooManyOptions { count: 22, max: 21 })
    ));
    assert!(h.runner.calls.lock().unwrap().is_empty());
    assert!(temp.join("keep.tmp").exists());
}

#[tokio::test]
async fn twenty_one_keys_are_accepted() {
    let h = harness(RecordingRunner::default(), false);
    let mut pairs: Vec<(String, bool)> = OptionKey::ALL
        .iter()
        .map(|key| (key.as_str().to_string(), false))
        .collect();
    pairs.push(("somethingElse".to_string(), true));

    let report = h.orchestrator.run(pairs).await.unwrap();
    assert!(h.runner.calls.lock().unwrap().is_empty());
    assert_eq!(report.target_count, 3);
}

#[tokio::test]
async fn every_declared_invocation_is_launched_once() {
    let h = harness(RecordingRunner::default(), false);
    h.orchestrator.run_options(&OptionSet::all_enabled()).await;

    let calls = h.runner.calls.lock().unwrap();
    assert_eq!(calls.len(), catalogue_invocations());
    assert!(h.sink.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_repair_step_does_not_stop_the_second() {
    let runner = RecordingRunner {
        fail_on: Some("/limitaccess"),
        ..RecordingRunner::default()
    };
    let h = harness(runner, false);
    let report = h
        .orchestrator
        .run([("openDismRepair", true)])
        .await
        .unwrap();

    let calls = h.runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].contains("/limitaccess"));
    assert!(calls[1].contains("install.wim"));

    let recorded = h.sink.0.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].contains("DISM Repair"));

    // Base folders do not exist under the scratch drive.
    assert_eq!(report.totals, SweepTotals::default());
}

#[tokio::test]
async fn user_temp_folder_is_emptied() {
    let h = harness(RecordingRunner::default(), false);
    let temp = user_temp_dir(h.drive.path(), "alice");
    populate(&temp, &["a.tmp", "b.tmp", "c.log"]);

    let report = h.orchestrator.run_options(&OptionSet::default()).await;

    assert_eq!(
        report.totals,
        SweepTotals {
            folders_visited: 1,
            files_detected: 3,
            files_deleted_ok: 3,
            files_deleted_fail: 0,
        }
    );
    assert_eq!(report.target_count, 3);
    assert_eq!(fs::read_dir(&temp).unwrap().count(), 0);

    let swept = report.folders.iter().find(|f| f.path == temp).unwrap();
    assert_eq!(swept.status, FolderStatus::Swept);
    assert!(swept.tally.is_balanced());
    assert!(report.run_id.is_some());
    assert!(report.line.starts_with("3 files detected, 3 files deleted, 0 failed"));
}

#[tokio::test]
async fn unknown_user_still_sweeps_optional_folders() {
    let drive = TempDir::new().unwrap();
    let settings = Settings {
        system_drive: drive.path().to_path_buf(),
        notice_dir: drive.path().to_path_buf(),
        release_api_url: None,
        ..Settings::default()
    };
    let sink = Arc::new(MemorySink::default());
    let orchestrator = Orchestrator::new(
        settings,
        Arc::new(RecordingRunner::default()),
        Arc::new(FixedIdentity(None)),
        sink.clone(),
    );
    let old = drive.path().join("Windows.old");
    populate(&old, &["leftover.dll"]);

    let mut options = OptionSet::default();
    options.set(OptionKey::ClearWindowsOld, true);
    let report = orchestrator.run_options(&options).await;

    assert_eq!(report.target_count, 1);
    assert_eq!(report.totals.files_deleted_ok, 1);
    assert_eq!(sink.0.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_target_list_reports_zero_folders() {
    let drive = TempDir::new().unwrap();
    let settings = Settings {
        system_drive: drive.path().to_path_buf(),
        notice_dir: drive.path().to_path_buf(),
        release_api_url: None,
        ..Settings::default()
    };
    let orchestrator = Orchestrator::new(
        settings,
        Arc::new(RecordingRunner::default()),
        Arc::new(FixedIdentity(None)),
        Arc::new(MemorySink::default()),
    );

    let report = orchestrator.run_options(&OptionSet::default()).await;

    assert_eq!(report.target_count, 0);
    assert!(report.folders.is_empty());
    assert_eq!(report.totals, SweepTotals::default());
}

#[tokio::test]
async fn spotify_option_writes_the_notice() {
    let h = harness(RecordingRunner::default(), false);
    h.orchestrator
        .run([("clearSpotifyData", true)])
        .await
        .unwrap();

    let notice = fs::read_to_string(h.drive.path().join(SPOTIFY_NOTICE_FILE)).unwrap();
    assert!(notice.contains("Clear Cache"));
    assert!(h.runner.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_dispatch_gives_the_same_counts() {
    let h = harness(RecordingRunner::default(), true);
    let temp = user_temp_dir(h.drive.path(), "alice");
    populate(&temp, &["a.tmp", "b.tmp"]);

    let report = h.orchestrator.run_options(&OptionSet::all_enabled()).await;

    assert_eq!(h.runner.calls.lock().unwrap().len(), catalogue_invocations());
    assert_eq!(report.totals.files_detected, 2);
    assert_eq!(report.totals.files_deleted_ok, 2);
    assert_eq!(report.totals.files_deleted_fail, 0);
}
