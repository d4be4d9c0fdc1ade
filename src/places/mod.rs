//! Saved places
//!
//! A user-managed list of named locations, stored as JSON in the XDG data
//! directory (~/.local/share/weather-lookup/places.json).

use crate::config::defaults::APP_DIR_NAME;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const PLACES_FILE_NAME: &str = "places.json";

/// A named location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlace {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub added_at: DateTime<Utc>,
}

impl SavedPlace {
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            coordinates,
            added_at: Utc::now(),
        }
    }

    /// First eight characters of the id, or all of it when shorter
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// Saved places store
#[derive(Debug)]
pub struct Places {
    entries: Vec<SavedPlace>,
    path: PathBuf,
}

impl Places {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }

    pub fn places_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(PLACES_FILE_NAME))
    }

    /// Load places from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::places_path()?)
    }

    /// Load places from a specific path; a missing file is an empty list
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read places file: {}", e)))?;

            serde_json::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse places file: {}", e)))?
        } else {
            Vec::new()
        };

        Ok(Self { entries, path })
    }

    /// Save places to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create places directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)
            .map_err(|e| Error::Config(format!("Failed to write places file: {}", e)))?;

        Ok(())
    }

    /// Add a place
    ///
    /// Names are unique ignoring case; coordinates must be valid.
    pub fn add(&mut self, name: &str, coordinates: Coordinates) -> Result<&SavedPlace> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Config("Place name cannot be empty".to_string()));
        }
        coordinates.validate()?;
        if self.get(name).is_some() {
            return Err(Error::Config(format!("A place named '{}' already exists", name)));
        }

        self.entries.push(SavedPlace::new(name, coordinates));
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Find a place by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&SavedPlace> {
        let name = name.trim();
        self.entries.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Remove a place by name or by a unique id prefix
    pub fn remove(&mut self, name_or_id: &str) -> Option<SavedPlace> {
        let key = name_or_id.trim();
        let idx = self
            .entries
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(key))
            .or_else(|| {
                let mut matches = self
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| !key.is_empty() && p.id.starts_with(key));
                match (matches.next(), matches.next()) {
                    (Some((idx, _)), None) => Some(idx),
                    _ => None,
                }
            })?;

        Some(self.entries.remove(idx))
    }

    pub fn list(&self) -> &[SavedPlace] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
