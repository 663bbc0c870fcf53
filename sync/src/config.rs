//! TOML configuration loading and validation.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "acctsync.toml";

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Plan to disable known accounts the provider stopped reporting.
    #[serde(default = "default_true")]
    pub disable_known_orphans: bool,
    /// Merge every duplicate candidate without prompting.
    #[serde(default)]
    pub auto_merge: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            disable_known_orphans: default_true(),
            auto_merge: false,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "sync-audit.jsonl".into()
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Load an explicitly given config, or fall back to [`DEFAULT_CONFIG`].
    ///
    /// A missing default file yields built-in defaults; a missing explicit
    /// file is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG).exists() => Self::load(Path::new(DEFAULT_CONFIG)),
            None => Ok(Self::default()),
        }
    }

    /// Parse from a TOML string (useful for testing).
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if self.logging.dir.is_empty() {
            return Err(Error::Config("logging dir must not be empty".into()));
        }
        if self.logging.audit_file.is_empty() {
            return Err(Error::Config("audit_file must not be empty".into()));
        }
        if Path::new(&self.logging.audit_file).components().count() != 1 {
            return Err(Error::Config(format!(
                "audit_file '{}' must be a file name, not a path",
                self.logging.audit_file
            )));
        }
        Ok(())
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}
