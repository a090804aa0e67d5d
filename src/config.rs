// src/config.rs

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::messages::Locale;

/// Environment variable naming a settings file, used when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "PC_SWEEPER_CONFIG";

/// GitHub "latest release" endpoint checked by default.
pub const DEFAULT_RELEASE_API_URL: &str =
    "https://api.github.com/repos/sasprosko590/SASPClean/releases/latest";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    // Target layout
    pub system_drive: PathBuf, // Default: C:\

    // Collaborators
    pub error_log_path: PathBuf,         // Default: error.log
    pub locale: Locale,                  // Default: en
    pub release_api_url: Option<String>, // Default: GitHub latest release; null disables

    // Tool dispatch
    pub tool_timeout_secs: Option<u64>, // Default: wait for the tool to exit
    pub concurrent_dispatch: bool,      // Default: false, dispatch finishes before sweeping

    // Where the Spotify notice is written
    pub notice_dir: PathBuf, // Default: current directory
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            system_drive: PathBuf::from("C:\\"),
            error_log_path: PathBuf::from("error.log"),
            locale: Locale::En,
            release_api_url: Some(DEFAULT_RELEASE_API_URL.to_string()),
            tool_timeout_secs: None,
            concurrent_dispatch: false,
            notice_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Load settings from `path`, else from `$PC_SWEEPER_CONFIG`, else from
    /// [`default_config_path`] when that file exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
            .or_else(|| default_config_path().filter(|p| p.is_file()));

        match resolved {
            Some(p) => Self::from_file(&p),
            None => Ok(Settings::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `<config dir>/pc-sweeper/settings.json`, e.g. `%APPDATA%\pc-sweeper\settings.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pc-sweeper").join("settings.json"))
}

// Run timing
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RunMetrics {
    pub operation: String,
    pub start_time: Instant,
    pub checkpoints: Vec<(String, Duration)>,
}

impl RunMetrics {
    pub fn new(operation: impl Into<String>) -> Self {
        RunMetrics {
            operation: operation.into(),
            start_time: Instant::now(),
            checkpoints: Vec::new(),
        }
    }

    /// Record the time elapsed since the run started under `name`.
    pub fn checkpoint(&mut self, name: &str) {
        self.checkpoints
            .push((name.to_string(), self.start_time.elapsed()));
    }

    pub fn complete(self) -> RunTimings {
        RunTimings {
            operation: self.operation,
            total_ms: self.start_time.elapsed().as_millis() as u64,
            checkpoints_ms: self
                .checkpoints
                .into_iter()
                .map(|(name, d)| (name, d.as_millis() as u64))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunTimings {
    pub operation: String,
    pub total_ms: u64,
    pub checkpoints_ms: Vec<(String, u64)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use std::sync::Mutex;
    use tempfile::TempDir;

    lazy_static! {
        static ref ENV_GUARD: Mutex<()> = Mutex::new(());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"system_drive": "D:\\", "locale": "tr"}"#).unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.system_drive, PathBuf::from("D:\\"));
        assert_eq!(settings.locale, Locale::Tr);
        assert_eq!(settings.error_log_path, PathBuf::from("error.log"));
        assert!(!settings.concurrent_dispatch);
    }

    #[test]
    fn env_var_names_the_settings_file() {
        let _guard = ENV_GUARD.lock().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"tool_timeout_secs": 30}"#).unwrap();

        let prev = std::env::var_os(CONFIG_ENV_VAR);
        std::env::set_var(CONFIG_ENV_VAR, &path);
        let settings = Settings::load(None);
        match prev {
            Some(v) => std::env::set_var(CONFIG_ENV_VAR, v),
            None => std::env::remove_var(CONFIG_ENV_VAR),
        }

        assert_eq!(settings.unwrap().tool_timeout_secs, Some(30));
    }

    #[test]
    fn release_check_is_on_unless_disabled() {
        assert_eq!(
            Settings::default().release_api_url.as_deref(),
            Some(DEFAULT_RELEASE_API_URL)
        );

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"release_api_url": null}"#).unwrap();
        assert_eq!(Settings::from_file(&path).unwrap().release_api_url, None);

        fs::write(&path, r#"{"locale": "en"}"#).unwrap();
        assert_eq!(
            Settings::from_file(&path).unwrap().release_api_url.as_deref(),
            Some(DEFAULT_RELEASE_API_URL)
        );
    }

    #[test]
    fn malformed_settings_are_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn run_metrics_keep_checkpoint_order() {
        let mut metrics = RunMetrics::new("run");
        metrics.checkpoint("dispatch");
        metrics.checkpoint("sweep");
        let timings = metrics.complete();
        let names: Vec<_> = timings.checkpoints_ms.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["dispatch", "sweep"]);
    }
}
