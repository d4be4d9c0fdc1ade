//! Server shared state
//!
//! Holds the provider clients; the keys never leave this process.

use crate::config::{Config, Requirement};
use crate::error::Result;
use crate::geo::geoapify::GeoapifyBackend;
use crate::weather::openweather::OpenWeatherClient;
use crate::weather::ForecastWindow;

/// Shared state for the HTTP server
#[derive(Debug)]
pub struct AppState {
    /// Weather provider client; always returns the full forecast
    pub weather: OpenWeatherClient,

    /// Geocoding provider client
    pub geocoder: GeoapifyBackend,
}

impl AppState {
    /// Create state from configuration
    ///
    /// Fails when either provider key is missing.
    pub fn new(config: &Config) -> Result<Self> {
        config.require(Requirement::Server)?;

        Ok(Self {
            weather: OpenWeatherClient::from_config(config)?.with_window(ForecastWindow::Full),
            geocoder: GeoapifyBackend::from_config(config)?,
        })
    }
}
