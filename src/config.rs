use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::DistanceMetric;
use crate::models::InputFormat;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub matching: MatchingSettings,
    pub loader: LoaderSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub metric: DistanceMetric,
    #[serde(default)]
    pub input_format: InputFormat,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::default(),
            input_format: InputFormat::default(),
            workers: default_workers(),
        }
    }
}

fn default_workers() -> usize { 4 }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderSettings {
    #[serde(default = "default_lat_column")]
    pub lat_column: String,
    #[serde(default = "default_lon_column")]
    pub lon_column: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            lat_column: default_lat_column(),
            lon_column: default_lon_column(),
            delimiter: default_delimiter(),
        }
    }
}

impl LoaderSettings {
    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| ConfigError::Message(format!("delimiter '{}' is not ASCII", self.delimiter)))
    }
}

fn default_lat_column() -> String { "latitude".to_string() }
fn default_lon_column() -> String { "longitude".to_string() }
fn default_delimiter() -> char { ',' }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "text".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CLOSEST_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CLOSEST__MATCHING__METRIC -> matching.metric
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

fn environment() -> Environment {
    Environment::with_prefix("CLOSEST")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
