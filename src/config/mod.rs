//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths, then applies
//! environment overrides (including a `.env` file in the working directory).
//! Config location: ~/.config/weather-lookup/config.toml

pub mod defaults;

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::weather::Units;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider credentials and endpoints
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Proxy server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Forecast presentation settings
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Autocomplete settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Device location settings
    #[serde(default)]
    pub location: LocationConfig,
}

/// Provider credentials and endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// OpenWeather API key
    #[serde(default)]
    pub weather_api_key: String,

    /// Geoapify API key
    #[serde(default)]
    pub geocoding_api_key: String,

    /// When set, the CLI talks to this proxy instead of the providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    /// Override for the OpenWeather API root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_base_url: Option<String>,

    /// Override for the Geoapify API root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocoding_base_url: Option<String>,

    /// Units requested from OpenWeather
    #[serde(default)]
    pub weather_units: Units,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Forecast settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Hourly strip length; 0 keeps every forecast sample
    #[serde(default = "default_hourly_limit")]
    pub hourly_limit: usize,

    /// Days in the weekly summary
    #[serde(default = "default_days")]
    pub days: usize,
}

/// Autocomplete settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a suggestion request is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Suggestions per request
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

/// Location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Grants the network position lookup used for "here"
    #[serde(default = "default_allow_network_lookup")]
    pub allow_network_lookup: bool,

    /// Fixed home position as "lat,lon"; used instead of a network lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
}

/// What a command needs from the configuration before it may start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Client commands: provider keys, unless a proxy is configured
    Client,
    /// The proxy server: always both provider keys
    Server,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_hourly_limit() -> usize {
    DEFAULT_HOURLY_LIMIT
}
fn default_days() -> usize {
    DEFAULT_DAYS
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}
fn default_allow_network_lookup() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            hourly_limit: default_hourly_limit(),
            days: default_days(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            limit: default_search_limit(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            allow_network_lookup: default_allow_network_lookup(),
            home: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;

        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::Config(format!("Failed to read .env file: {}", e))),
        }

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file, without environment overrides
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = present(ENV_WEATHER_KEY) {
            self.providers.weather_api_key = key;
        }
        if let Some(key) = present(ENV_GEOCODING_KEY) {
            self.providers.geocoding_api_key = key;
        }
        if let Some(url) = present(ENV_PROXY_URL) {
            self.providers.proxy_url = Some(url);
        }
        if let Some(port) = present(ENV_PORT) {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid {} value: {}", ENV_PORT, port)))?;
        }

        Ok(())
    }

    /// Check that everything `requirement` needs is present
    ///
    /// Called once at startup, before any client is built.
    pub fn require(&self, requirement: Requirement) -> Result<()> {
        if requirement == Requirement::Client && self.providers.proxy_url.is_some() {
            return Ok(());
        }

        let mut missing = Vec::new();
        if self.providers.weather_api_key.trim().is_empty() {
            missing.push(format!("providers.weather_api_key (or {})", ENV_WEATHER_KEY));
        }
        if self.providers.geocoding_api_key.trim().is_empty() {
            missing.push(format!("providers.geocoding_api_key (or {})", ENV_GEOCODING_KEY));
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "Missing required settings: {}",
                missing.join(", ")
            )))
        }
    }

    /// Parsed home coordinates, if configured
    pub fn home(&self) -> Result<Option<Coordinates>> {
        self.location
            .home
            .as_deref()
            .map(|s| s.parse::<Coordinates>())
            .transpose()
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["providers", "weather_api_key"] => Some(self.providers.weather_api_key.clone()),
            ["providers", "geocoding_api_key"] => Some(self.providers.geocoding_api_key.clone()),
            ["providers", "proxy_url"] => Some(self.providers.proxy_url.clone().unwrap_or_default()),
            ["providers", "weather_base_url"] => {
                Some(self.providers.weather_base_url.clone().unwrap_or_default())
            }
            ["providers", "geocoding_base_url"] => {
                Some(self.providers.geocoding_base_url.clone().unwrap_or_default())
            }
            ["providers", "weather_units"] => Some(self.providers.weather_units.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["forecast", "hourly_limit"] => Some(self.forecast.hourly_limit.to_string()),
            ["forecast", "days"] => Some(self.forecast.days.to_string()),

            ["search", "debounce_ms"] => Some(self.search.debounce_ms.to_string()),
            ["search", "limit"] => Some(self.search.limit.to_string()),

            ["location", "allow_network_lookup"] => {
                Some(self.location.allow_network_lookup.to_string())
            }
            ["location", "home"] => Some(self.location.home.clone().unwrap_or_default()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// An empty value clears optional settings.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());

        match parts.as_slice() {
            ["providers", "weather_api_key"] => {
                self.providers.weather_api_key = value.to_string();
            }
            ["providers", "geocoding_api_key"] => {
                self.providers.geocoding_api_key = value.to_string();
            }
            ["providers", "proxy_url"] => {
                self.providers.proxy_url = optional(value);
            }
            ["providers", "weather_base_url"] => {
                self.providers.weather_base_url = optional(value);
            }
            ["providers", "geocoding_base_url"] => {
                self.providers.geocoding_base_url = optional(value);
            }
            ["providers", "weather_units"] => {
                self.providers.weather_units = value.parse()?;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid port value: {}", value)))?;
            }

            ["forecast", "hourly_limit"] => {
                self.forecast.hourly_limit = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid hourly limit value: {}", value))
                })?;
            }
            ["forecast", "days"] => {
                self.forecast.days = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid days value: {}", value)))?;
            }

            ["search", "debounce_ms"] => {
                self.search.debounce_ms = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid debounce value: {}", value)))?;
            }
            ["search", "limit"] => {
                self.search.limit = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid limit value: {}", value)))?;
            }

            ["location", "allow_network_lookup"] => {
                self.location.allow_network_lookup = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid boolean value: {}", value)))?;
            }
            ["location", "home"] => {
                if !value.is_empty() {
                    value.parse::<Coordinates>()?;
                }
                self.location.home = optional(value);
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "providers.weather_api_key",
            "providers.geocoding_api_key",
            "providers.proxy_url",
            "providers.weather_base_url",
            "providers.geocoding_base_url",
            "providers.weather_units",
            "server.host",
            "server.port",
            "forecast.hourly_limit",
            "forecast.days",
            "search.debounce_ms",
            "search.limit",
            "location.allow_network_lookup",
            "location.home",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
