//! Places command handler
//!
//! List, add and remove saved places.

use crate::config::{Config, Requirement};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, Geocoder};
use crate::places::Places;
use clap::{Args, Subcommand};

/// Places command arguments
#[derive(Args)]
pub struct PlacesArgs {
    #[command(subcommand)]
    pub command: Option<PlacesCommand>,
}

/// Places subcommands
#[derive(Subcommand)]
pub enum PlacesCommand {
    /// List saved places
    List,
    /// Save a place
    Add {
        /// Name to save the place under
        name: String,

        /// Latitude
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        /// Longitude
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,

        /// Address to look up instead of giving coordinates
        #[arg(long, short = 'l', conflicts_with_all = ["lat", "lon"])]
        location: Option<String>,
    },
    /// Remove a saved place
    Remove {
        /// Place name or ID prefix
        name: String,
    },
}

/// Run the places command
pub async fn run(args: PlacesArgs) -> Result<()> {
    match args.command.unwrap_or(PlacesCommand::List) {
        PlacesCommand::List => list_places(),
        PlacesCommand::Add {
            name,
            lat,
            lon,
            location,
        } => add_place(&name, lat.zip(lon), location.as_deref()).await,
        PlacesCommand::Remove { name } => remove_place(&name),
    }
}

fn list_places() -> Result<()> {
    let places = Places::load()?;

    if places.is_empty() {
        println!("No saved places.");
        return Ok(());
    }

    for place in places.list() {
        println!(
            "  {}  {}  ({})  added {}",
            place.short_id(),
            place.name,
            place.coordinates,
            place.added_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

async fn add_place(
    name: &str,
    coordinates: Option<(f64, f64)>,
    location: Option<&str>,
) -> Result<()> {
    let coordinates = match (coordinates, location) {
        (Some((lat, lon)), _) => Coordinates::new(lat, lon),
        (None, Some(location)) => {
            let config = Config::load()?;
            config.require(Requirement::Client)?;
            Geocoder::from_config(&config)?
                .get_coordinates(location)
                .await?
                .coordinates()
        }
        (None, None) => {
            return Err(Error::Config(
                "Give either --lat and --lon or --location".to_string(),
            ))
        }
    };

    let mut places = Places::load()?;
    let place = places.add(name, coordinates)?.clone();
    places.save()?;

    println!("Saved {} ({})", place.name, place.coordinates);
    Ok(())
}

fn remove_place(name: &str) -> Result<()> {
    let mut places = Places::load()?;

    match places.remove(name) {
        Some(place) => {
            places.save()?;
            println!("Removed {}", place.name);
            Ok(())
        }
        None => Err(Error::Config(format!("No saved place matches '{}'", name))),
    }
}
