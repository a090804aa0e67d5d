//! Error types shared across the sweeper.

use std::path::PathBuf;

use thiserror::Error;

/// Problems with the caller-supplied configuration. The only error class
/// allowed to stop a run before it starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("There are too many options ({count}). Maximum {max} options can be added.")]
    TooManyOptions { count: usize, max: usize },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown option: {0}")]
    UnknownOption(String),
}

/// A single external command failed.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    ExitStatus {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("`{command}` did not finish within {secs}s")]
    TimedOut { command: String, secs: u64 },
}

/// Failures while inspecting or clearing one target directory.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Error listing files in {path}: {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error deleting {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Identity or directory discovery failed; callers degrade instead of aborting.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("current user name could not be determined")]
    MissingIdentity,

    #[error("could not check {path}: {source}")]
    Existence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
