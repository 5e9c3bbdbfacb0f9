//! Settings for the stardate tools.
//!
//! Supports a YAML file and environment variable overrides.

use crate::domain::{StardateConfig, StardateStyle};
use crate::error::Error;
use crate::ports::Result;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_PATH_ENV: &str = "STARDATE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "stardate.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix and style applied to every stardate
    pub stardate: StardateConfig,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Path to the SQLite content database
    pub path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: "./stardate.db".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from file and environment.
    ///
    /// An explicit `path` must exist. Otherwise `STARDATE_CONFIG`, then
    /// `stardate.yaml`, are used when present, falling back to defaults.
    /// Environment variables override whatever the file says.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = std::env::var(CONFIG_PATH_ENV)
                    .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
                if Path::new(&path).exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read '{path}': {e}")))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup("STARDATE_PREFIX") {
            self.stardate.prefix = prefix;
        }

        if let Some(style) = lookup("STARDATE_STYLE") {
            self.stardate.style = StardateStyle::from_setting(&style);
        }

        if let Some(path) = lookup("STARDATE_DB") {
            self.storage.path = path;
        }
    }
}
