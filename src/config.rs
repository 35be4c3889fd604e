// src/config.rs

//! Manages engine configuration: loading from TOML and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use tracing::warn;

/// Defines the frequency of the `fsync` system call for the command log.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppendFsync {
    /// Sync after every committed transaction.
    Always,
    /// Sync on commit once `fsync_interval` has elapsed since the last sync.
    EverySec,
    /// Leave syncing to the operating system.
    No,
}

/// Configuration of the append-only command log.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PersistenceConfig {
    /// If false, the engine runs purely in memory and nothing is logged.
    #[serde(default = "default_persistence_enabled")]
    pub enabled: bool,
    #[serde(default = "default_log_path")]
    pub log_path: String,
    #[serde(default = "default_appendfsync")]
    pub appendfsync: AppendFsync,
    #[serde(with = "humantime_serde", default = "default_fsync_interval")]
    pub fsync_interval: Duration,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: default_persistence_enabled(),
            log_path: default_log_path(),
            appendfsync: default_appendfsync(),
            fsync_interval: default_fsync_interval(),
        }
    }
}

fn default_persistence_enabled() -> bool {
    true
}
fn default_log_path() -> String {
    "spinelkv_data/commands.log".to_string()
}
fn default_appendfsync() -> AppendFsync {
    AppendFsync::EverySec
}
fn default_fsync_interval() -> Duration {
    Duration::from_secs(1)
}
fn default_log_level() -> String {
    "info".to_string()
}

/// The top-level engine configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            persistence: PersistenceConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to load configuration from '{path}'"))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the resolved configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            return Err(anyhow!("log_level cannot be empty"));
        }
        if self.persistence.enabled {
            if self.persistence.log_path.trim().is_empty() {
                return Err(anyhow!(
                    "persistence.log_path cannot be empty when persistence is enabled"
                ));
            }
            if self.persistence.appendfsync == AppendFsync::EverySec
                && self.persistence.fsync_interval.is_zero()
            {
                return Err(anyhow!(
                    "persistence.fsync_interval must be greater than 0 when appendfsync is 'everysec'"
                ));
            }
            if self.persistence.appendfsync == AppendFsync::No {
                warn!(
                    "appendfsync is 'no': committed transactions may be lost if the host crashes."
                );
            }
        }
        Ok(())
    }
}
