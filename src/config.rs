//! Configuration management for the Routecast application
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings. All tunable
//! state lives here and is injected into the forecast service at
//! construction; there are no module-level singletons.

use crate::RoutecastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the Routecast application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoutecastConfig {
    /// Routing provider configuration
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Geocoding configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Checkpoint sampling configuration
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Routing provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// GraphHopper API key; provider is skipped when absent
    pub graphhopper_api_key: Option<String>,
    /// OpenRouteService API key; provider is skipped when absent
    pub openrouteservice_api_key: Option<String>,
    /// Base URL for the public OSRM instance
    #[serde(default = "default_osrm_base_url")]
    pub osrm_base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the Open-Meteo forecast API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
}

/// Geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL for the Open-Meteo geocoding API (forward lookups)
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Base URL for the Nominatim instance (reverse lookups)
    #[serde(default = "default_nominatim_base_url")]
    pub nominatim_base_url: String,
    /// Delay before each reverse-geocode call, to stay under the
    /// shared public instance's rate limit
    #[serde(default = "default_reverse_delay_ms")]
    pub reverse_delay_ms: u64,
    /// Per-request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
}

/// Checkpoint sampling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// Seconds of travel time between checkpoints
    #[serde(default = "default_checkpoint_interval")]
    pub interval_seconds: u64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_osrm_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_nominatim_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_reverse_delay_ms() -> u64 {
    1000
}

fn default_http_timeout() -> u32 {
    8
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_location() -> String {
    "~/.cache/routecast".to_string()
}

fn default_checkpoint_interval() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            graphhopper_api_key: None,
            openrouteservice_api_key: None,
            osrm_base_url: default_osrm_base_url(),
            timeout_seconds: default_http_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_http_timeout(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            nominatim_base_url: default_nominatim_base_url(),
            reverse_delay_ms: default_reverse_delay_ms(),
            timeout_seconds: default_http_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
            location: default_cache_location(),
        }
    }
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_checkpoint_interval(),
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

impl RoutecastConfig {
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

        // Environment overrides with ROUTECAST_ prefix, e.g.
        // ROUTECAST_ROUTING__GRAPHHOPPER_API_KEY
        builder = builder.add_source(
            Environment::with_prefix("ROUTECAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: RoutecastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("routecast").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.routing.timeout_seconds == 0 || self.routing.timeout_seconds > 60 {
            return Err(RoutecastError::config(
                "Routing timeout must be between 1 and 60 seconds",
            )
            .into());
        }

        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 60 {
            return Err(RoutecastError::config(
                "Weather timeout must be between 1 and 60 seconds",
            )
            .into());
        }

        if self.checkpoint.interval_seconds == 0 {
            return Err(
                RoutecastError::config("Checkpoint interval must be positive").into(),
            );
        }

        if self.cache.ttl_seconds == 0 {
            return Err(RoutecastError::config("Cache TTL must be positive").into());
        }

        for url in [
            &self.routing.osrm_base_url,
            &self.weather.base_url,
            &self.geocoding.base_url,
            &self.geocoding.nominatim_base_url,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(RoutecastError::config(format!(
                    "Base URL '{url}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(RoutecastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(RoutecastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    /// Expand `~` in the cache location to the user's home directory
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        if let Some(rest) = self.cache.location.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(&self.cache.location)
    }
}
