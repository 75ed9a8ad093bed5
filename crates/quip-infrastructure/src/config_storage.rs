//! Config file storage.
//!
//! Loads and saves [`QuipConfig`] as TOML. A missing or blank file is not an
//! error: it yields the default configuration.

use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use quip_core::config::QuipConfig;
use quip_core::error::{QuipError, Result};

use crate::paths::QuipPaths;

/// Handle to a `config.toml` file.
///
/// Responsibilities:
/// - Parse TOML into [`QuipConfig`], filling unspecified fields with defaults
/// - Write the config back atomically (tmp file + rename)
///
/// Does NOT:
/// - Watch the file for changes
/// - Apply environment overrides (`QUIP_LOG` is read by the logging setup)
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a handle for the given file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Creates a handle for `config.toml` resolved through `paths`.
    pub fn from_paths(paths: &QuipPaths) -> Result<Self> {
        Ok(Self::new(paths.config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(QuipConfig::default())`: File doesn't exist or is empty
    /// - `Ok(config)`: Parsed config
    /// - `Err(QuipError::Serialization)`: File is not valid TOML for this schema
    pub fn load(&self) -> Result<QuipConfig> {
        if !self.path.exists() {
            return Ok(QuipConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(QuipConfig::default());
        }

        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration atomically.
    pub fn save(&self, config: &QuipConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(config)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| QuipError::config("config path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| QuipError::config("config path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quip_core::config::StorageBackend;
    use quip_core::joke::FallbackPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_default() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("config.toml"));

        assert_eq!(storage.load().unwrap(), QuipConfig::default());
    }

    #[test]
    fn test_blank_file_gives_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "   \n").unwrap();

        assert_eq!(ConfigStorage::new(path).load().unwrap(), QuipConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuipPaths::new(Some(temp_dir.path().join("nested")));
        let storage = ConfigStorage::from_paths(&paths).unwrap();

        let mut config = QuipConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.topics.fallback = FallbackPolicy::Strict;
        config.timing.generation_delay_ms = 10;

        storage.save(&config).unwrap();
        assert_eq!(storage.load().unwrap(), config);
        assert!(!temp_dir.path().join("nested/.config.toml.tmp").exists());
    }

    #[test]
    fn test_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[timing]\nsign_in_delay_ms = \"soon\"\n").unwrap();

        let err = ConfigStorage::new(path).load().unwrap_err();
        assert!(err.is_serialization());
    }
}
