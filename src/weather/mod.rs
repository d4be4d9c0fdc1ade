//! Weather lookup
//!
//! Fetches current conditions and the 5-day/3-hour forecast for a position
//! and normalizes both payloads into one [`WeatherSnapshot`].

pub mod condition;
pub mod openweather;
pub mod proxy;

pub use condition::ConditionKind;

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;

/// Icon and text of a weather condition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub icon: String,
    pub description: String,
}

impl Condition {
    pub fn kind(&self) -> ConditionKind {
        ConditionKind::classify(&self.description)
    }
}

/// One forecast sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub time: DateTime<Utc>,
    pub temp: f64,
    pub icon: String,
    pub description: String,
    /// Provider's own "YYYY-MM-DD HH:MM:SS" label, when sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Normalized weather for one location at one point in time
///
/// Temperatures are Celsius. `min_temp`/`max_temp` come from the provider
/// as-is and need not bracket `temp_celsius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temp_celsius: f64,
    pub temp_fahrenheit: f64,
    pub feels_like: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub location_name: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub condition: Condition,
    /// Ascending by `time`
    pub hourly_forecast: Vec<HourlyEntry>,
}

/// Temperature units requested from the provider
///
/// The choice fixes both the request parameter and the conversion; values
/// are never inspected to guess their unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// `units=metric`: provider sends Celsius, passed through
    #[default]
    Metric,
    /// No units parameter: provider sends Kelvin, converted
    Standard,
}

impl Units {
    /// Value of the `units` query parameter, if any
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            Units::Metric => Some("metric"),
            Units::Standard => None,
        }
    }

    /// Convert a provider temperature in these units to Celsius
    pub fn to_celsius(&self, value: f64) -> f64 {
        match self {
            Units::Metric => value,
            Units::Standard => kelvin_to_celsius(value),
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Metric => f.write_str("metric"),
            Units::Standard => f.write_str("standard"),
        }
    }
}

impl FromStr for Units {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "standard" | "kelvin" => Ok(Units::Standard),
            _ => Err(Error::Config(format!(
                "Unknown units '{}'. Expected 'metric' or 'standard'",
                s
            ))),
        }
    }
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - 273.15
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// How much of the forecast a snapshot keeps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ForecastWindow {
    /// Every sample; needed by the daily summary
    #[default]
    Full,
    /// The first `n` samples; an hourly strip
    Truncate(usize),
}

impl ForecastWindow {
    /// 0 means the full forecast
    pub fn from_limit(limit: usize) -> Self {
        if limit == 0 {
            ForecastWindow::Full
        } else {
            ForecastWindow::Truncate(limit)
        }
    }

    pub fn apply<'a>(&self, entries: &'a [HourlyEntry]) -> &'a [HourlyEntry] {
        match self {
            ForecastWindow::Full => entries,
            ForecastWindow::Truncate(n) => &entries[..(*n).min(entries.len())],
        }
    }
}

/// Trait for weather backends
pub trait WeatherBackend: Send + Sync {
    /// Fetch current conditions and forecast for `coords`
    ///
    /// Either both parts succeed or the call fails; there is no partial
    /// snapshot.
    fn fetch(&self, coords: Coordinates) -> impl Future<Output = Result<WeatherSnapshot>> + Send;
}

/// The weather client selected by configuration
#[derive(Debug, Clone)]
pub enum WeatherClient {
    OpenWeather(openweather::OpenWeatherClient),
    Proxy(proxy::ProxyWeatherClient),
}

impl WeatherClient {
    /// Use the proxy when one is configured, the provider directly otherwise
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.providers.proxy_url {
            Some(url) => Ok(WeatherClient::Proxy(proxy::ProxyWeatherClient::new(url)?)),
            None => Ok(WeatherClient::OpenWeather(
                openweather::OpenWeatherClient::from_config(config)?,
            )),
        }
    }
}

impl WeatherBackend for WeatherClient {
    async fn fetch(&self, coords: Coordinates) -> Result<WeatherSnapshot> {
        match self {
            WeatherClient::OpenWeather(client) => client.fetch(coords).await,
            WeatherClient::Proxy(client) => client.fetch(coords).await,
        }
    }
}
