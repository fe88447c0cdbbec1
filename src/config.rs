//! Configuration management
//!
//! Settings come from an optional TOML file and `PARADE_*` environment
//! variables, on top of built-in defaults. Everything is validated once at
//! startup.

use crate::ParadeWeatherError;
use crate::weather::AcquisitionDefaults;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "PARADE_WEATHER_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParadeWeatherConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream data sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// NASA POWER API root
    #[serde(default = "default_power_base_url")]
    pub power_base_url: String,
    /// Query NASA POWER at all; when off only the stub serves observations
    #[serde(default = "default_true")]
    pub enable_power: bool,
    /// IMERG point endpoint; IMERG is skipped unless this and the token are set
    pub imerg_endpoint: Option<String>,
    /// Earthdata bearer token
    pub earthdata_token: Option<String>,
    /// Per-provider timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Retries on transient HTTP failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed seed for the stub generator
    pub stub_seed: Option<u64>,
}

/// Forecast metadata and presentation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_lead_hours")]
    pub lead_hours: u32,
    #[serde(default = "default_forecast_spread")]
    pub forecast_spread: f64,
    /// IANA timezone reported with each answer
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8088
}

fn default_power_base_url() -> String {
    "https://power.larc.nasa.gov/api".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    20
}

fn default_max_retries() -> u32 {
    2
}

fn default_lead_hours() -> u32 {
    72
}

fn default_forecast_spread() -> f64 {
    0.25
}

fn default_timezone() -> String {
    "America/Montevideo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            power_base_url: default_power_base_url(),
            enable_power: true,
            imerg_endpoint: None,
            earthdata_token: None,
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            stub_seed: None,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            lead_hours: default_lead_hours(),
            forecast_spread: default_forecast_spread(),
            timezone: default_timezone(),
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

impl DefaultsConfig {
    #[must_use]
    pub fn acquisition(&self) -> AcquisitionDefaults {
        AcquisitionDefaults {
            lead_time_hours: self.lead_hours,
            forecast_spread: self.forecast_spread,
        }
    }
}

impl ParadeWeatherConfig {
    /// Load configuration from the default file location and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from a specific file (if it exists) and environment
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.or_else(Self::get_config_path);
        if let Some(path) = config_file.filter(|p| p.exists()) {
            builder = builder.add_source(
                File::from(path)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // PARADE_SOURCES__TIMEOUT_SECONDS=5 -> sources.timeout_seconds
        builder = builder.add_source(
            Environment::with_prefix("PARADE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: ParadeWeatherConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// `$PARADE_WEATHER_CONFIG`, else `<config dir>/parade-weather/config.toml`
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("parade-weather").join("config.toml")))
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.sources.timeout_seconds == 0 || self.sources.timeout_seconds > 120 {
            return Err(ParadeWeatherError::config(
                "Source timeout must be between 1 and 120 seconds",
            )
            .into());
        }

        if self.sources.max_retries > 10 {
            return Err(ParadeWeatherError::config("Source max retries cannot exceed 10").into());
        }

        if !self.defaults.forecast_spread.is_finite() || self.defaults.forecast_spread < 0.0 {
            return Err(ParadeWeatherError::config(
                "Default forecast spread must be a non-negative number",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ParadeWeatherError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ParadeWeatherError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = std::iter::once(&self.sources.power_base_url)
            .chain(self.sources.imerg_endpoint.as_ref());
        for url in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ParadeWeatherError::config(format!(
                    "Source URL '{url}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.defaults.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ParadeWeatherError::config(format!(
                "Unknown timezone '{}'",
                self.defaults.timezone
            ))
            .into());
        }

        Ok(())
    }
}
