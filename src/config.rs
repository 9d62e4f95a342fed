//! Persisted user configuration: the screenshot folder

use crate::error::{Result, ShotkeepError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserConfig {
    /// Folder watched for new screenshots
    pub screenshot_folder: Option<String>,
}

/// Reads and writes [`UserConfig`] at a fixed location
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location (~/.config/shotkeep/config.json)
    pub fn at_default_location() -> Result<Self> {
        Self::default_path().map(Self::new).ok_or_else(|| {
            ShotkeepError::ConfigError("Could not determine config directory".to_string())
        })
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shotkeep").join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the saved folder, or `None` if the file is missing, unreadable
    /// or malformed.
    pub fn load(&self) -> Option<PathBuf> {
        if !self.path.exists() {
            return None;
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to read config file: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<UserConfig>(&contents) {
            Ok(config) => config
                .screenshot_folder
                .filter(|folder| !folder.is_empty())
                .map(PathBuf::from),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to parse config file: {}", e);
                None
            }
        }
    }

    /// Overwrites the config file with `folder`
    pub fn save(&self, folder: &Path) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ShotkeepError::ConfigError(format!(
                        "Failed to create config directory: {}",
                        e
                    ))
                })?;
            }
        }

        let config = UserConfig {
            screenshot_folder: Some(folder.to_string_lossy().into_owned()),
        };
        let contents = serde_json::to_string_pretty(&config).map_err(|e| {
            ShotkeepError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&self.path, contents).map_err(|e| {
            ShotkeepError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        tracing::debug!(path = %self.path.display(), folder = %folder.display(), "saved config");
        Ok(())
    }
}
