//! weather-lookup: current weather and forecasts by position or place name
//!
//! A library and CLI tool that resolves a location, fetches current
//! conditions and the 5-day forecast from OpenWeather, and summarizes the
//! forecast per day. A small HTTP proxy keeps provider API keys off clients.
//!
//! ## Features
//!
//! - Device position from a configured home or a permitted IP lookup
//! - Place search through Geoapify, with a debounced autocomplete session
//! - Concurrent current + forecast fetch, normalized into one snapshot
//! - Daily min/max summaries bucketed by local date
//! - HTTP proxy + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use weather_lookup::forecast::summarize_by_day_at;
//! use weather_lookup::weather::openweather::normalize;
//! use weather_lookup::weather::{ForecastWindow, Units};
//! use chrono::{NaiveDate, Utc};
//!
//! let current = serde_json::json!({
//!     "main": {"temp": 298.15},
//!     "name": "Tokyo",
//!     "weather": [{"icon": "01d", "description": "clear sky"}]
//! });
//! let forecast = serde_json::json!({
//!     "list": [{"dt": 1714564800, "main": {"temp": 300.15}, "weather": []}]
//! });
//!
//! let snapshot = normalize(current, forecast, Units::Standard, ForecastWindow::Full).unwrap();
//! assert!((snapshot.temp_celsius - 25.0).abs() < 1e-9);
//!
//! let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let days = summarize_by_day_at(&snapshot.hourly_forecast, 5, today, &Utc);
//! assert_eq!(days.len(), 5);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod forecast;
pub mod format;
pub mod geo;
mod http;
pub mod location;
pub mod places;
pub mod search;
pub mod server;
pub mod weather;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use forecast::DailySummary;
pub use geo::{GeocodingFeature, GeocodingResult};
pub use search::SearchSession;
pub use weather::{Units, WeatherSnapshot};
