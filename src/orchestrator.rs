// src/orchestrator.rs

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::{RunMetrics, Settings};
use crate::dispatch::ToolDispatcher;
use crate::error::ConfigError;
use crate::error_log::{ErrorLog, ErrorSink};
use crate::identity::{IdentityProvider, SystemIdentity};
use crate::messages::Messages;
use crate::options::OptionSet;
use crate::report::{summarize, SummaryReport};
use crate::runner::{CommandRunner, ShellRunner};
use crate::sweep::SweepEngine;
use crate::targets::{TargetList, TargetResolver};
use crate::version::VersionNotifier;

pub const SPOTIFY_NOTICE_FILE: &str = "SpotifyInfo.txt";

const SPOTIFY_NOTICE: &str = "You can enter the Spotify application, go to the \"Settings\" \
section and clear it from the \"Clear Cache\" option, you can also delete \"Downloads\" from \
the same section.";

/// Entry point for one maintenance run: resolve targets, launch tools, sweep,
/// summarize.
pub struct Orchestrator {
    settings: Settings,
    runner: Arc<dyn CommandRunner>,
    identity: Arc<dyn IdentityProvider>,
    error_log: Arc<dyn ErrorSink>,
    messages: Messages,
    background: CancellationToken,
}

impl Orchestrator {
    pub fn new(
        settings: Settings,
        runner: Arc<dyn CommandRunner>,
        identity: Arc<dyn IdentityProvider>,
        error_log: Arc<dyn ErrorSink>,
    ) -> Self {
        let messages = Messages::new(settings.locale);
        Orchestrator {
            settings,
            runner,
            identity,
            error_log,
            messages,
            background: CancellationToken::new(),
        }
    }

    /// Wire up the real shell runner, `whoami` identity and file error log.
    pub fn from_settings(settings: Settings) -> Self {
        let deadline = settings.tool_timeout_secs.map(Duration::from_secs);
        let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner::with_deadline(deadline));
        let identity = Arc::new(SystemIdentity::new(Arc::new(ShellRunner::new())));
        let error_log = Arc::new(ErrorLog::new(settings.error_log_path.clone()));
        Self::new(settings, runner, identity, error_log)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate raw option pairs, then run. Too many keys fails before any
    /// command is launched or any folder touched.
    pub async fn run<I, K>(&self, pairs: I) -> Result<SummaryReport, ConfigError>
    where
        I: IntoIterator<Item = (K, bool)>,
        K: AsRef<str>,
    {
        let options = OptionSet::from_pairs(pairs)?;
        Ok(self.run_options(&options).await)
    }

    pub async fn run_options(&self, options: &OptionSet) -> SummaryReport {
        let run_id = Uuid::new_v4();
        let mut metrics = RunMetrics::new(format!("run {}", run_id));
        log::debug!("Starting run {} with {:?}", run_id, options.enabled());

        self.start_version_check();

        let targets = self.resolve_targets(options).await;
        metrics.checkpoint("resolve");

        if options.clear_spotify_data {
            self.write_spotify_notice().await;
        }

        let dispatcher = ToolDispatcher::new(
            Arc::clone(&self.runner),
            Arc::clone(&self.error_log),
            self.messages,
        );
        let engine = SweepEngine::new(Arc::clone(&self.error_log), self.messages);

        let counters = if self.settings.concurrent_dispatch {
            let (attempted, counters) =
                tokio::join!(dispatcher.dispatch(options), engine.sweep(&targets));
            log::debug!("Attempted {} tool invocations", attempted);
            metrics.checkpoint("dispatch+sweep");
            counters
        } else {
            let attempted = dispatcher.dispatch(options).await;
            log::debug!("Attempted {} tool invocations", attempted);
            metrics.checkpoint("dispatch");
            let counters = engine.sweep(&targets).await;
            metrics.checkpoint("sweep");
            counters
        };

        let report =
            summarize(&counters, &targets, &self.messages).with_run(run_id, metrics.complete());
        log::info!("{}", report.line);
        report
    }

    pub async fn resolve_targets(&self, options: &OptionSet) -> TargetList {
        TargetResolver::new(
            self.settings.system_drive.clone(),
            Arc::clone(&self.identity),
            Arc::clone(&self.error_log),
            self.messages,
        )
        .resolve(options)
        .await
    }

    fn start_version_check(&self) {
        match &self.settings.release_api_url {
            Some(url) => {
                let notifier =
                    VersionNotifier::new(url.clone(), Arc::clone(&self.error_log), self.messages);
                // detached
                let _ = notifier.spawn(self.background.child_token());
            }
            None => log::debug!("No release endpoint configured; skipping version check"),
        }
    }

    async fn write_spotify_notice(&self) {
        let path = self.settings.notice_dir.join(SPOTIFY_NOTICE_FILE);
        let file = path.display().to_string();
        match tokio::fs::write(&path, SPOTIFY_NOTICE).await {
            Ok(()) => log::info!(
                "{}",
                self.messages.format("notice.written", &[("file", file.as_str())])
            ),
            Err(err) => {
                let message = self.messages.format("notice.failed", &[("file", file.as_str())]);
                self.error_log.record(&message, Some(&err));
            }
        }
    }
}

// A release check still in flight is abandoned with the orchestrator.
impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.background.cancel();
    }
}
