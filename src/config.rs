//! Configuration management for the weather dashboard
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{DashboardError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Saved-location storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default application settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeather API key
    pub api_key: Option<String>,
    /// Base URL for the OpenWeather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Tile template for the precipitation overlay
    #[serde(default = "default_precipitation_tile_url")]
    pub tile_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// Saved-location storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the local key-value store
    #[serde(default = "default_storage_location")]
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Number of days in the historical chart, today included
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    /// Zoom level used when centering the map
    #[serde(default = "default_map_zoom")]
    pub map_zoom: u8,
    /// Latitude reported as the device position
    pub home_latitude: Option<f64>,
    /// Longitude reported as the device position
    pub home_longitude: Option<f64>,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_precipitation_tile_url() -> String {
    "https://tile.openweathermap.org/map/precipitation_new/{z}/{x}/{y}.png".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_storage_location() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("weatherdash").to_string_lossy().into_owned())
        .unwrap_or_else(|| ".weatherdash".to_string())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_history_days() -> u32 {
    crate::history::DEFAULT_HISTORY_DAYS
}

fn default_map_zoom() -> u8 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            tile_url: default_precipitation_tile_url(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            location: default_storage_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            history_days: default_history_days(),
            map_zoom: default_map_zoom(),
            home_latitude: None,
            home_longitude: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHERDASH_WEATHER__API_KEY -> weather.api_key
        builder = builder.add_source(
            Environment::with_prefix("WEATHERDASH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build().map_err(|e| {
            DashboardError::config(format!("Failed to build configuration: {e}"))
        })?;

        let mut config: DashboardConfig = settings.try_deserialize().map_err(|e| {
            DashboardError::config(format!("Failed to deserialize configuration: {e}"))
        })?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherdash").join("config.toml"))
    }

    /// Storage directory with a leading `~/` expanded
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        match self.storage.location.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.storage.location)),
            None => PathBuf::from(&self.storage.location),
        }
    }

    /// Device position configured for this host, if any
    #[must_use]
    pub fn home_position(&self) -> Option<(f64, f64)> {
        self.defaults.home_latitude.zip(self.defaults.home_longitude)
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.tile_url.is_empty() {
            self.weather.tile_url = default_precipitation_tile_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.storage.location.is_empty() {
            self.storage.location = default_storage_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.history_days == 0 {
            self.defaults.history_days = default_history_days();
        }
        if self.defaults.map_zoom == 0 {
            self.defaults.map_zoom = default_map_zoom();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the API key when one is configured
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.weather.api_key {
            if api_key.is_empty() {
                return Err(DashboardError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                ));
            }

            if api_key.len() < 8 {
                return Err(DashboardError::config(
                    "Weather API key appears to be invalid (too short). Please check your API key.",
                ));
            }

            if api_key.len() > 100 {
                return Err(DashboardError::config(
                    "Weather API key appears to be invalid (too long). Please check your API key.",
                ));
            }
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(DashboardError::config(
                "Weather API timeout cannot exceed 300 seconds",
            ));
        }

        if self.defaults.history_days > 30 {
            return Err(DashboardError::config("History cannot exceed 30 days"));
        }

        if self.defaults.map_zoom > 18 {
            return Err(DashboardError::config("Map zoom cannot exceed 18"));
        }

        if let Some(lat) = self.defaults.home_latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(DashboardError::config(format!(
                    "Home latitude must be between -90 and 90, got: {lat}"
                )));
            }
        }

        if let Some(lon) = self.defaults.home_longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(DashboardError::config(format!(
                    "Home longitude must be between -180 and 180, got: {lon}"
                )));
            }
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(DashboardError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            ));
        }

        Ok(())
    }
}
