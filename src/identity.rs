//! Current-user discovery.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DiscoveryError;
use crate::runner::CommandRunner;

/// Resolves the name used for the per-user temp folder. Returns `None`
/// instead of failing.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn identity(&self) -> Option<String>;
}

/// Asks `whoami`, then falls back to `USERNAME` / `USER`.
pub struct SystemIdentity {
    runner: Arc<dyn CommandRunner>,
}

impl SystemIdentity {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        SystemIdentity { runner }
    }

    async fn discover(&self) -> Result<String, DiscoveryError> {
        match self.runner.run("whoami").await {
            Ok(output) => {
                if let Some(name) = normalize_user_name(&output.stdout) {
                    return Ok(name);
                }
            }
            Err(err) => log::debug!("whoami failed: {}", err),
        }

        ["USERNAME", "USER"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| normalize_user_name(&value))
            .ok_or(DiscoveryError::MissingIdentity)
    }
}

#[async_trait]
impl IdentityProvider for SystemIdentity {
    async fn identity(&self) -> Option<String> {
        match self.discover().await {
            Ok(name) => Some(name),
            Err(err) => {
                log::debug!("Identity discovery failed: {}", err);
                None
            }
        }
    }
}

/// A preset identity, e.g. from `--user`.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub Option<String>);

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn identity(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Trim and strip a `DOMAIN\` prefix. Empty input yields `None`.
pub fn normalize_user_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let name = trimmed.rsplit('\\').next().unwrap_or(trimmed).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
