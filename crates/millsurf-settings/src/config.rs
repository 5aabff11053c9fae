//! Configuration file
//!
//! One file holds both the simulation parameters and the output appearance.
//! It is read as JSON or TOML depending on the extension; missing keys take
//! their defaults.

use std::path::{Path, PathBuf};

use millsurf_core::SimulationConfig;
use millsurf_visualizer::RenderError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SettingsError};

/// Output appearance section
pub use millsurf_visualizer::RenderOptions as OutputSettings;

/// Directory name under the platform config directory
const APP_DIR: &str = "millsurf";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(Self::Json)
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            Ok(Self::Toml)
        } else {
            Err(SettingsError::UnsupportedFormat(path.display().to_string()))
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub output: OutputSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config_dir>/millsurf/config.toml`, or `None` when the platform has
    /// no config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = FileFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match FileFormat::from_path(path)? {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load an explicit file, or the default file if it exists, or defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Some(default) if default.is_file() => Self::load_from_file(&default),
            _ => {
                debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;

        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(SettingsError::InvalidSetting {
                key: "output.jpeg_quality".to_string(),
                reason: format!("must be between 1 and 100, got {}", self.output.jpeg_quality),
            });
        }

        self.output
            .intensity
            .validate()
            .map_err(|e| invalid("output.intensity", e))?;

        if let Some(grid) = &self.output.grid {
            grid.validate().map_err(|e| invalid("output.grid", e))?;
        }

        Ok(())
    }
}

fn invalid(key: &str, err: RenderError) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        reason: err.to_string(),
    }
}
