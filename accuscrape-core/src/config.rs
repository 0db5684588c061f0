use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::LocationRef;

/// Default poll interval in seconds (10 minutes).
pub const DEFAULT_UPDATE_INTERVAL: u64 = 600;
/// Lower bound for the poll interval (5 minutes).
pub const MIN_UPDATE_INTERVAL: u64 = 300;
/// Upper bound for the poll interval (60 minutes).
pub const MAX_UPDATE_INTERVAL: u64 = 3600;

/// Top-level configuration stored on disk: the configured location and the
/// poll interval. The parsing core itself keeps no other state across
/// cycles.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Opaque site-assigned location key, e.g. "353412".
    pub location_key: Option<String>,

    /// Display name for the configured location.
    pub location_name: Option<String>,

    /// Poll interval in seconds; clamped into the allowed range on use.
    pub update_interval: Option<u64>,
}

impl Config {
    /// Return the configured location, or an error with a setup hint.
    pub fn location(&self) -> Result<LocationRef> {
        let key = self.location_key.as_ref().ok_or_else(|| {
            anyhow!(
                "No location configured.\n\
                 Hint: run `accuscrape setup <place name>` to pick one."
            )
        })?;

        let name = self
            .location_name
            .clone()
            .unwrap_or_else(|| key.clone());

        Ok(LocationRef {
            key: key.clone(),
            name,
        })
    }

    pub fn set_location(&mut self, location: &LocationRef) {
        self.location_key = Some(location.key.clone());
        self.location_name = Some(location.name.clone());
    }

    /// Poll interval bounded to the allowed range; out-of-range values are
    /// clamped rather than rejected.
    pub fn clamped_interval(&self) -> u64 {
        self.update_interval
            .unwrap_or(DEFAULT_UPDATE_INTERVAL)
            .clamp(MIN_UPDATE_INTERVAL, MAX_UPDATE_INTERVAL)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "accuscrape", "accuscrape")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
