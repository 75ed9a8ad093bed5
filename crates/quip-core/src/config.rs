//! Configuration model.
//!
//! Every field has a default, so an empty or missing `config.toml` is valid.
//!
//! ```toml
//! [storage]
//! backend = "file"
//! dir = "/var/lib/quip"
//!
//! [timing]
//! sign_in_delay_ms = 1000
//! generation_delay_ms = 800
//!
//! [topics]
//! fallback = "strict"
//!
//! [logging]
//! level = "debug"
//! file = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::joke::FallbackPolicy;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct QuipConfig {
    pub storage: StorageConfig,
    pub timing: TimingConfig,
    pub topics: TopicConfig,
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process memory only; nothing survives a restart
    Memory,
    /// One JSON file per key
    #[default]
    File,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Overrides the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Simulated latency of the mocked remote calls.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub sign_in_delay_ms: u64,
    pub generation_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            sign_in_delay_ms: 1000,
            generation_delay_ms: 800,
        }
    }
}

impl TimingConfig {
    /// No simulated latency at all.
    pub fn instant() -> Self {
        Self {
            sign_in_delay_ms: 0,
            generation_delay_ms: 0,
        }
    }

    pub fn sign_in_delay(&self) -> Duration {
        Duration::from_millis(self.sign_in_delay_ms)
    }

    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TopicConfig {
    pub fallback: FallbackPolicy,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `QUIP_LOG` is unset
    pub level: String,
    /// Also write a daily rolling log file
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: false,
        }
    }
}
