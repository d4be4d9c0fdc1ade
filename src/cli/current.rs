//! Current command handler
//!
//! Resolves a position, fetches weather for it and prints the report.

use crate::config::{Config, Requirement};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::forecast::summarize_by_day;
use crate::format::{require_formatter, WeatherReport};
use crate::geo::{GeoBackend, Geocoder};
use crate::location::{device_location_provider, LocationProvider};
use crate::places::Places;
use crate::weather::{ForecastWindow, WeatherBackend, WeatherClient};
use clap::Args;
use tracing::debug;

/// Current command arguments
#[derive(Args)]
pub struct CurrentArgs {
    /// Latitude of the position
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude of the position
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Place name or address to look up
    #[arg(long, short = 'l', conflicts_with_all = ["lat", "lon", "place", "here"])]
    pub location: Option<String>,

    /// Name of a saved place
    #[arg(long, conflicts_with_all = ["lat", "lon", "here"])]
    pub place: Option<String>,

    /// Use the device position (the default when nothing else is given)
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub here: bool,

    /// Output format (text, json)
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Days in the daily summary
    #[arg(long)]
    pub days: Option<usize>,

    /// Hours in the hourly strip (0 for all)
    #[arg(long)]
    pub hours: Option<usize>,
}

/// Where the position comes from
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Coordinates(Coordinates),
    Location(String),
    Place(String),
    Here,
}

impl CurrentArgs {
    pub fn target(&self) -> Target {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            Target::Coordinates(Coordinates::new(lat, lon))
        } else if let Some(location) = &self.location {
            Target::Location(location.clone())
        } else if let Some(place) = &self.place {
            Target::Place(place.clone())
        } else {
            Target::Here
        }
    }
}

/// Run the current command
pub async fn run(args: CurrentArgs) -> Result<()> {
    let config = Config::load()?;
    config.require(Requirement::Client)?;

    let formatter = require_formatter(&args.format)?;

    let coordinates = resolve(&args.target(), &config).await?;
    debug!("Fetching weather for {}", coordinates);

    let client = WeatherClient::from_config(&config)?;
    let snapshot = client.fetch(coordinates).await?;

    let days = args.days.unwrap_or(config.forecast.days);
    let daily = summarize_by_day(&snapshot.hourly_forecast, days);

    let report = WeatherReport {
        coordinates,
        snapshot,
        daily,
        strip: ForecastWindow::from_limit(args.hours.unwrap_or(config.forecast.hourly_limit)),
    };

    println!("{}", formatter.format(&report)?);
    Ok(())
}

/// Turn a target into coordinates
pub async fn resolve(target: &Target, config: &Config) -> Result<Coordinates> {
    match target {
        Target::Coordinates(coords) => {
            coords.validate()?;
            Ok(*coords)
        }
        Target::Location(text) => {
            let geocoder = Geocoder::from_config(config)?;
            let result = geocoder.get_coordinates(text).await?;
            debug!("'{}' resolved to {}", text, result.formatted_name);
            Ok(result.coordinates())
        }
        Target::Place(name) => {
            let places = Places::load()?;
            places
                .get(name)
                .map(|p| p.coordinates)
                .ok_or_else(|| Error::Config(format!("No saved place named '{}'", name)))
        }
        Target::Here => {
            device_location_provider(config)?
                .resolve_device_location()
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse(args: &[&str]) -> CurrentArgs {
        let mut argv = vec!["weather-lookup", "current"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Current(args) => args,
            _ => panic!("expected current"),
        }
    }

    #[test]
    fn test_targets() {
        assert_eq!(
            parse(&["--lat", "35.6895", "--lon", "139.6917"]).target(),
            Target::Coordinates(Coordinates::new(35.6895, 139.6917))
        );
        assert_eq!(
            parse(&["--lat", "-33.86", "--lon", "151.2"]).target(),
            Target::Coordinates(Coordinates::new(-33.86, 151.2))
        );
        assert_eq!(
            parse(&["--location", "Kyoto"]).target(),
            Target::Location("Kyoto".to_string())
        );
        assert_eq!(parse(&["--place", "home"]).target(), Target::Place("home".to_string()));
        assert_eq!(parse(&[]).target(), Target::Here);
    }

    #[test]
    fn test_conflicting_targets_rejected() {
        assert!(Cli::try_parse_from(["weather-lookup", "current", "--lat", "1"]).is_err());
        assert!(Cli::try_parse_from([
            "weather-lookup",
            "current",
            "--location",
            "Kyoto",
            "--here"
        ])
        .is_err());
    }

    #[tokio::test]
    async fn test_resolve_rejects_invalid_coordinates() {
        let err = resolve(&Target::Coordinates(Coordinates::new(0.0, 200.0)), &Config::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinates(_)));
    }

    #[tokio::test]
    async fn test_resolve_here_uses_home() {
        let mut config = Config::default();
        config.location.home = Some("51.5074,-0.1278".to_string());

        let coords = resolve(&Target::Here, &config).await.unwrap();
        assert_eq!(coords, Coordinates::new(51.5074, -0.1278));
    }
}
