// src/targets.rs

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::DiscoveryError;
use crate::error_log::ErrorSink;
use crate::identity::IdentityProvider;
use crate::messages::Messages;
use crate::options::OptionSet;

/// Ordered, duplicate-free list of directories to sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetList(Vec<PathBuf>);

impl TargetList {
    /// Appends `path` unless it is already present.
    fn push(&mut self, path: PathBuf) {
        if !self.0.contains(&path) {
            self.0.push(path);
        }
    }

    pub fn into_inner(self) -> Vec<PathBuf> {
        self.0
    }
}

impl Deref for TargetList {
    type Target = [PathBuf];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<PathBuf> for TargetList {
    fn from_iter<T: IntoIterator<Item = PathBuf>>(iter: T) -> Self {
        let mut list = TargetList::default();
        for path in iter {
            list.push(path);
        }
        list
    }
}

/// Well-known transient folders below the system drive.
pub fn prefetch_dir(drive: &Path) -> PathBuf {
    drive.join("Windows").join("Prefetch")
}

pub fn system_temp_dir(drive: &Path) -> PathBuf {
    drive.join("Windows").join("Temp")
}

pub fn user_temp_dir(drive: &Path, user: &str) -> PathBuf {
    drive
        .join("Users")
        .join(user)
        .join("AppData")
        .join("Local")
        .join("Temp")
}

pub fn upgrade_staging_dir(drive: &Path) -> PathBuf {
    drive.join("Windows10Upgrade")
}

pub fn previous_install_dir(drive: &Path) -> PathBuf {
    drive.join("Windows.old")
}

pub struct TargetResolver {
    system_drive: PathBuf,
    identity: Arc<dyn IdentityProvider>,
    error_log: Arc<dyn ErrorSink>,
    messages: Messages,
}

impl TargetResolver {
    pub fn new(
        system_drive: impl Into<PathBuf>,
        identity: Arc<dyn IdentityProvider>,
        error_log: Arc<dyn ErrorSink>,
        messages: Messages,
    ) -> Self {
        TargetResolver {
            system_drive: system_drive.into(),
            identity,
            error_log,
            messages,
        }
    }

    /// Base folders (when the user is known), then upgrade staging, then the
    /// previous installation. An empty list is a valid result.
    pub async fn resolve(&self, options: &OptionSet) -> TargetList {
        let drive = self.system_drive.as_path();
        let mut targets = TargetList::default();

        match self.identity.identity().await {
            Some(user) => {
                targets.push(prefetch_dir(drive));
                targets.push(system_temp_dir(drive));
                targets.push(user_temp_dir(drive, &user));
            }
            None => {
                let err = DiscoveryError::MissingIdentity;
                self.error_log
                    .record(&self.messages.format("identity.missing", &[]), Some(&err));
            }
        }

        if options.clear_windows10_upgrade {
            targets.push(upgrade_staging_dir(drive));
        }
        if options.clear_windows_old {
            targets.push(previous_install_dir(drive));
        }

        log::debug!("Resolved {} target folders", targets.len());
        targets
    }
}
