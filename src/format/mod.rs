//! Output formatters
//!
//! Provides trait-based output formatting for weather reports.

pub mod json;
pub mod text;

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::forecast::DailySummary;
use crate::weather::{ForecastWindow, WeatherSnapshot};
use serde::{Deserialize, Serialize};

/// Everything the `current` command shows for one location
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub coordinates: Coordinates,
    pub snapshot: WeatherSnapshot,
    pub daily: Vec<DailySummary>,
    /// How much of the forecast the hourly strip shows
    #[serde(skip)]
    pub strip: ForecastWindow,
}

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a weather report
    fn format(&self, report: &WeatherReport) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// Get a formatter by name, or an error listing the known formats
pub fn require_formatter(name: &str) -> Result<Box<dyn OutputFormatter>> {
    get_formatter(name).ok_or_else(|| {
        let known: Vec<String> = available_formats()
            .into_iter()
            .map(|f| format!("{} ({})", f.name, f.description))
            .collect();
        Error::Config(format!(
            "Unknown format '{}'. Available: {}",
            name,
            known.join(", ")
        ))
    })
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [get_formatter("text"), get_formatter("json")]
        .into_iter()
        .flatten()
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
        })
        .collect()
}
