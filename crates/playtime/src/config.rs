//! Configuration file support for playtime.
//!
//! Loads `playtime.toml` from an explicit path, the working directory, or the
//! user's config directory, in that order.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use playtime_activity::{ActivityConfig, EventMarkers};

/// Settings loaded from `playtime.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Root directory of the server logs
    pub db_path: Option<PathBuf>,
    /// Players with fewer hours than this are flagged in the report
    pub threshold_hours: Option<f64>,
    /// Log line markers
    #[serde(default)]
    pub markers: EventMarkers,
}

/// The config file name
pub const CONFIG_FILE_NAME: &str = "playtime.toml";

impl AppConfig {
    /// Load configuration from a specific file. A missing file is an error.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        Ok(config)
    }

    /// An empty marker would match every line.
    fn validate(&self) -> Result<()> {
        let markers = [
            ("markers.join", &self.markers.join),
            ("markers.disconnect", &self.markers.disconnect),
            ("markers.unknown_player", &self.markers.unknown_player),
            ("markers.log_extension", &self.markers.log_extension),
        ];

        for (key, value) in markers {
            if value.trim().is_empty() {
                anyhow::bail!("{} must not be empty", key);
            }
        }

        Ok(())
    }

    /// Load configuration from a directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        Self::load_file(&config_path).map(Some)
    }

    /// Resolve the effective configuration.
    /// Priority: explicit path > working dir > user config dir > defaults
    pub fn resolve(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        if let Some(config) = Self::load(working_dir)? {
            tracing::debug!(dir = %working_dir.display(), "Using project config");
            return Ok(config);
        }

        if let Some(dir) = user_config_dir() {
            if let Some(config) = Self::load(&dir)? {
                tracing::debug!(dir = %dir.display(), "Using user config");
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    pub fn activity_config(&self) -> ActivityConfig {
        ActivityConfig {
            markers: self.markers.clone(),
        }
    }
}

fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("playtime"))
}
