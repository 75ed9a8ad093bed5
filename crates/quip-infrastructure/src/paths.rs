//! Unified path management for quip files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/quip/              # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/quip/         # Data directory
//! ├── storage/                 # Key-value store (one <key>.json per key)
//! │   ├── user.json
//! │   └── savedJokes.json
//! └── logs/                    # Application logs
//!     └── quip.log.YYYY-MM-DD
//! ```
//!
//! When a base directory is given, both the config and data trees live
//! directly under it.

use std::path::PathBuf;

use quip_core::QuipError;

const APP_DIR_NAME: &str = "quip";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for QuipError {
    fn from(err: PathError) -> Self {
        QuipError::config(err.to_string())
    }
}

/// Resolves quip's config, storage and log locations.
#[derive(Debug, Clone, Default)]
pub struct QuipPaths {
    base_dir: Option<PathBuf>,
}

impl QuipPaths {
    /// Creates a resolver. `None` uses the platform directories.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Directory backing the file key-value store.
    pub fn storage_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("storage"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }
}
