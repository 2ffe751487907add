pub mod types;

pub use types::*;

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Filename prefix rules, first match wins
    #[serde(default = "default_drone_models")]
    pub drone_models: Vec<DroneModelRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            probe: ProbeConfig::default(),
            telemetry: TelemetryConfig::default(),
            extraction: ExtractionConfig::default(),
            drone_models: default_drone_models(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file, or create default if not found
    pub fn load() -> Self {
        let config_path = Self::config_path();

        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config: {}. Using defaults.", e);
                }
            }
        }

        let config = Self::default();
        // Save default config for future editing
        if let Err(e) = config.save_to(&config_path) {
            warn!("Failed to save default config: {}", e);
        }
        config
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)
            .map_err(|e| AppError::Config(format!("Failed to write config file: {}", e)))?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flightmeta")
            .join("config.toml")
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.probe.timeout_secs == 0 {
            return Err(AppError::Config(
                "Probe timeout must be at least 1 second".to_string(),
            ));
        }
        if self.telemetry.log_extension.trim_start_matches('.').is_empty() {
            return Err(AppError::Config(
                "Telemetry log extension must not be empty".to_string(),
            ));
        }
        if self.telemetry.skip_log_interval == 0 {
            return Err(AppError::Config(
                "Skip log interval must be greater than 0".to_string(),
            ));
        }
        if self.extraction.max_parallel == 0 {
            return Err(AppError::Config(
                "max_parallel must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Drone model for a video file name, "Unknown" when no rule matches
    pub fn drone_model_for(&self, file_name: &str) -> String {
        let upper = file_name.to_uppercase();
        self.drone_models
            .iter()
            .find(|rule| upper.starts_with(&rule.prefix.to_uppercase()))
            .map(|rule| rule.model.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}
