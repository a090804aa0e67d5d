//! Background "is there a newer release?" check.
//!
//! Purely informational: the task is detached, its outcome is only logged,
//! and the run never waits for it.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error_log::ErrorSink;
use crate::messages::Messages;

pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStatus {
    UpToDate,
    Outdated,
}

/// Release tags may or may not carry a leading `v`.
pub fn compare_versions(current: &str, latest: &str) -> VersionStatus {
    let normalize = |s: &str| s.trim().trim_start_matches(['v', 'V']).to_string();
    if normalize(current) == normalize(latest) {
        VersionStatus::UpToDate
    } else {
        VersionStatus::Outdated
    }
}

#[cfg(feature = "version-check")]
#[derive(Debug, thiserror::Error)]
pub enum VersionCheckError {
    #[error("HTTP GET error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response. Status code: {0}")]
    Status(u16),
}

#[cfg(feature = "version-check")]
#[derive(Debug, serde::Deserialize)]
struct LatestRelease {
    tag_name: String,
}

#[cfg_attr(not(feature = "version-check"), allow(dead_code))]
pub struct VersionNotifier {
    url: String,
    error_log: Arc<dyn ErrorSink>,
    messages: Messages,
}

impl VersionNotifier {
    pub fn new(url: impl Into<String>, error_log: Arc<dyn ErrorSink>, messages: Messages) -> Self {
        VersionNotifier {
            url: url.into(),
            error_log,
            messages,
        }
    }

    /// Start the check on the current runtime. Dropping the returned handle
    /// detaches it; cancelling `cancel` abandons it.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => log::debug!("Version check abandoned"),
                _ = self.run() => {}
            }
        })
    }

    #[cfg(feature = "version-check")]
    async fn fetch_latest(&self) -> Result<String, VersionCheckError> {
        let client = reqwest::Client::new();
        let response = client
            .get(&self.url)
            .header(
                reqwest::header::USER_AGENT,
                format!("pc-sweeper/{}", CURRENT_VERSION),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VersionCheckError::Status(response.status().as_u16()));
        }
        let release: LatestRelease = response.json().await?;
        Ok(release.tag_name)
    }

    #[cfg(feature = "version-check")]
    async fn run(&self) {
        match self.fetch_latest().await {
            Ok(latest) => {
                log::info!(
                    "{}",
                    self.messages.format("version.latest", &[("latest", latest.as_str())])
                );
                match compare_versions(CURRENT_VERSION, &latest) {
                    VersionStatus::UpToDate => {
                        log::info!("{}", self.messages.format("version.current", &[]))
                    }
                    VersionStatus::Outdated => log::warn!(
                        "{}",
                        self.messages.format(
                            "version.outdated",
                            &[("current", CURRENT_VERSION), ("latest", latest.as_str())]
                        )
                    ),
                }
            }
            Err(err) => {
                let message = self.messages.format("version.failed", &[]);
                self.error_log.record(&message, Some(&err));
            }
        }
    }

    #[cfg(not(feature = "version-check"))]
    async fn run(&self) {
        log::debug!("Built without version-check; skipping {}", self.url);
    }
}
