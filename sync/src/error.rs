//! Error types for the sync workflow.

use std::path::PathBuf;

/// All errors that can occur while running a sync.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read accounts file {path}: {source}")]
    AccountsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse accounts JSON (expected an array of accounts): {0}")]
    AccountsParse(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode output: {0}")]
    Encode(String),

    #[error("review aborted: {0}")]
    Aborted(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
