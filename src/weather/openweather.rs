//! OpenWeather backend
//!
//! Calls `/data/2.5/weather` and `/data/2.5/forecast` concurrently and
//! normalizes the pair into a [`WeatherSnapshot`].

use crate::config::Config;
use crate::constants::api::OPENWEATHER_URL;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::http;
use crate::weather::{
    celsius_to_fahrenheit, Condition, ForecastWindow, HourlyEntry, Units, WeatherBackend,
    WeatherSnapshot,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

const PROVIDER: &str = "OpenWeather";

/// OpenWeather client
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    units: Units,
    window: ForecastWindow,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    main: OwCurrentMain,
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: OwSys,
    #[serde(default)]
    wind: OwWind,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: Option<f64>,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    temp_min: f64,
    #[serde(default)]
    temp_max: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct OwWeather {
    #[serde(default)]
    icon: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwForecast {
    list: Vec<OwForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwForecastItem {
    dt: i64,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    dt_txt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

impl OpenWeatherClient {
    /// Create a client against the public OpenWeather endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(OPENWEATHER_URL, api_key)
    }

    /// Create a client against a specific API root
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Config("OpenWeather API key is empty".to_string()));
        }

        Ok(Self {
            client: http::client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            units: Units::default(),
            window: ForecastWindow::Full,
        })
    }

    /// Create a client from the provider settings
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config
            .providers
            .weather_base_url
            .as_deref()
            .unwrap_or(OPENWEATHER_URL);
        Ok(Self::with_base_url(base_url, config.providers.weather_api_key.clone())?
            .with_units(config.providers.weather_units))
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_window(mut self, window: ForecastWindow) -> Self {
        self.window = window;
        self
    }

    fn endpoint_url(&self, endpoint: &str, coords: Coordinates) -> String {
        let mut url = format!(
            "{}/data/2.5/{}?lat={}&lon={}&appid={}",
            self.base_url,
            endpoint,
            coords.latitude,
            coords.longitude,
            urlencoding::encode(&self.api_key)
        );
        if let Some(units) = self.units.query_value() {
            url.push_str("&units=");
            url.push_str(units);
        }
        url
    }

    async fn fetch_endpoint(&self, endpoint: &str, coords: Coordinates) -> Result<serde_json::Value> {
        debug!("OpenWeather {} for {}", endpoint, coords);
        http::get_json(&self.client, &self.endpoint_url(endpoint, coords), PROVIDER).await
    }
}

impl WeatherBackend for OpenWeatherClient {
    async fn fetch(&self, coords: Coordinates) -> Result<WeatherSnapshot> {
        coords.validate()?;

        let (current, forecast) = tokio::try_join!(
            self.fetch_endpoint("weather", coords),
            self.fetch_endpoint("forecast", coords),
        )?;

        normalize(current, forecast, self.units, self.window)
    }
}

/// Build a snapshot from raw current-conditions and forecast payloads
///
/// `main.temp` of the current payload must be a number; most other fields
/// default to zero or empty when absent. Forecast samples end up sorted by
/// time whatever order the provider sent them in.
pub fn normalize(
    current: serde_json::Value,
    forecast: serde_json::Value,
    units: Units,
    window: ForecastWindow,
) -> Result<WeatherSnapshot> {
    let current: OwCurrent = serde_json::from_value(current)
        .map_err(|e| Error::InvalidPayload(format!("current conditions: {}", e)))?;
    let forecast: OwForecast = serde_json::from_value(forecast)
        .map_err(|e| Error::InvalidPayload(format!("forecast: {}", e)))?;

    let temp = current.main.temp.ok_or_else(|| {
        Error::InvalidPayload("current conditions have no numeric main.temp".to_string())
    })?;
    let temp_celsius = units.to_celsius(temp);

    let condition = current
        .weather
        .first()
        .map(|w| Condition {
            icon: w.icon.clone(),
            description: w.description.clone(),
        })
        .unwrap_or_default();

    let mut hourly_forecast = forecast
        .list
        .into_iter()
        .map(|item| -> Result<HourlyEntry> {
            let weather = item.weather.into_iter().next();
            Ok(HourlyEntry {
                time: epoch_to_utc(item.dt)?,
                temp: units.to_celsius(item.main.temp),
                icon: weather.as_ref().map(|w| w.icon.clone()).unwrap_or_default(),
                description: weather.map(|w| w.description).unwrap_or_default(),
                timestamp: item.dt_txt,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    hourly_forecast.sort_by_key(|entry| entry.time);

    if let ForecastWindow::Truncate(n) = window {
        hourly_forecast.truncate(n);
    }

    Ok(WeatherSnapshot {
        temp_celsius,
        temp_fahrenheit: celsius_to_fahrenheit(temp_celsius),
        feels_like: units.to_celsius(current.main.feels_like),
        min_temp: units.to_celsius(current.main.temp_min),
        max_temp: units.to_celsius(current.main.temp_max),
        humidity: current.main.humidity,
        wind_speed: current.wind.speed,
        location_name: current.name,
        sunrise: epoch_to_utc(current.sys.sunrise)?,
        sunset: epoch_to_utc(current.sys.sunset)?,
        condition,
        hourly_forecast,
    })
}

fn epoch_to_utc(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| Error::InvalidPayload(format!("timestamp out of range: {}", secs)))
}
