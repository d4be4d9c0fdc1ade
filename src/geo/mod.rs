//! Geocoding module
//!
//! Turns free-text place names into coordinates, and powers the
//! incremental autocomplete used by [`crate::search`].

pub mod geoapify;
pub mod proxy;

use crate::config::Config;
use crate::constants::search::MIN_QUERY_LEN;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// One geocoding search candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingFeature {
    pub properties: FeatureProperties,
}

/// Properties of a candidate; fields the provider adds beyond these are ignored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub formatted: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// A selected candidate, flattened for display and lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResult {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_name: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl GeocodingResult {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

impl From<GeocodingFeature> for GeocodingResult {
    fn from(feature: GeocodingFeature) -> Self {
        let p = feature.properties;
        Self {
            latitude: p.lat,
            longitude: p.lon,
            formatted_name: p.formatted,
            country: p.country.unwrap_or_default(),
            city: p.city,
            state: p.state,
        }
    }
}

/// Provider response envelope; a body without `features` means no matches
#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<GeocodingFeature>,
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Search for places matching `query`, best match first
    ///
    /// Queries shorter than two characters after trimming return an empty
    /// list without a network call.
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<GeocodingFeature>>> + Send;

    /// Resolve an address to its best match
    fn get_coordinates(&self, address: &str) -> impl Future<Output = Result<GeocodingResult>> + Send {
        async move {
            let features = self.search(address, 1).await?;
            features
                .into_iter()
                .next()
                .map(GeocodingResult::from)
                .ok_or_else(|| Error::NoLocationFound(address.trim().to_string()))
        }
    }
}

/// Whether a query is long enough to be worth sending
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_LEN
}

/// Suggestion label: name, then city (when different), state and country
pub fn format_location_name(properties: &FeatureProperties) -> String {
    let name = properties
        .name
        .clone()
        .unwrap_or_else(|| properties.formatted.clone());
    let mut parts = vec![name.clone()];

    if let Some(city) = properties.city.as_ref().filter(|c| **c != name) {
        parts.push(city.clone());
    }
    parts.extend(properties.state.iter().cloned());
    parts.extend(properties.country.iter().cloned());

    parts.join(", ")
}

/// The geocoder selected by configuration
#[derive(Debug, Clone)]
pub enum Geocoder {
    Geoapify(geoapify::GeoapifyBackend),
    Proxy(proxy::ProxyGeocoder),
}

impl Geocoder {
    /// Use the proxy when one is configured, the provider directly otherwise
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.providers.proxy_url {
            Some(url) => Ok(Geocoder::Proxy(proxy::ProxyGeocoder::new(url)?)),
            None => Ok(Geocoder::Geoapify(geoapify::GeoapifyBackend::from_config(config)?)),
        }
    }
}

impl GeoBackend for Geocoder {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodingFeature>> {
        match self {
            Geocoder::Geoapify(backend) => backend.search(query, limit).await,
            Geocoder::Proxy(backend) => backend.search(query, limit).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn feature(name: &str, lat: f64, lon: f64) -> GeocodingFeature {
        GeocodingFeature {
            properties: FeatureProperties {
                lat,
                lon,
                formatted: format!("{}, Somewhere", name),
                name: Some(name.to_string()),
                country: Some("Japan".to_string()),
                city: None,
                state: None,
            },
        }
    }

    #[test]
    fn test_is_searchable() {
        assert!(!is_searchable(""));
        assert!(!is_searchable("   a  "));
        assert!(!is_searchable("é"));
        assert!(is_searchable("ab"));
        assert!(is_searchable(" to "));
    }

    #[test]
    fn test_feature_deserialization_ignores_extra_fields() {
        let json = serde_json::json!({
            "features": [{
                "type": "Feature",
                "properties": {
                    "lat": 35.6895,
                    "lon": 139.6917,
                    "formatted": "Tokyo, Japan",
                    "name": "Tokyo",
                    "country": "Japan",
                    "result_type": "city",
                    "rank": {"confidence": 1}
                },
                "geometry": {"type": "Point", "coordinates": [139.6917, 35.6895]}
            }]
        });

        let collection: FeatureCollection = serde_json::from_value(json).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.features[0].properties.name.as_deref(), Some("Tokyo"));
        assert!(collection.features[0].properties.city.is_none());
    }

    #[test]
    fn test_missing_features_is_empty() {
        let collection: FeatureCollection = serde_json::from_str("{}").unwrap();
        assert!(collection.features.is_empty());
    }

    #[test]
    fn test_result_from_feature() {
        let mut f = feature("Shinjuku", 35.69, 139.70);
        f.properties.city = Some("Tokyo".to_string());
        let result = GeocodingResult::from(f);

        assert_eq!(result.formatted_name, "Shinjuku, Somewhere");
        assert_eq!(result.country, "Japan");
        assert_eq!(result.city.as_deref(), Some("Tokyo"));
        assert_eq!(result.coordinates(), Coordinates::new(35.69, 139.70));
    }

    #[test]
    fn test_format_location_name() {
        let mut props = feature("Springfield", 39.8, -89.6).properties;
        props.city = Some("Springfield".to_string());
        props.state = Some("Illinois".to_string());
        props.country = Some("United States".to_string());
        assert_eq!(
            format_location_name(&props),
            "Springfield, Illinois, United States"
        );

        props.name = Some("Lincoln Home".to_string());
        assert_eq!(
            format_location_name(&props),
            "Lincoln Home, Springfield, Illinois, United States"
        );
    }

    #[test]
    fn test_format_location_name_falls_back_to_formatted() {
        let mut props = feature("x", 0.0, 0.0).properties;
        props.name = None;
        props.country = None;
        props.formatted = "Somewhere Street 1".to_string();
        assert_eq!(format_location_name(&props), "Somewhere Street 1");
    }
}
