//! Geoapify geocoding backend
//!
//! Forward geocoding with autocomplete-friendly ranking. Requires an API key.

use crate::config::Config;
use crate::constants::api::GEOAPIFY_URL;
use crate::error::{Error, Result};
use crate::geo::{is_searchable, FeatureCollection, GeoBackend, GeocodingFeature};
use crate::http;
use tracing::debug;

const PROVIDER: &str = "Geoapify";

/// Geoapify geocoding backend
#[derive(Debug, Clone)]
pub struct GeoapifyBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeoapifyBackend {
    /// Create a backend against the public Geoapify endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(GEOAPIFY_URL, api_key)
    }

    /// Create a backend against a specific API root
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Config("Geoapify API key is empty".to_string()));
        }

        Ok(Self {
            client: http::client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Create a backend from the provider settings
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config
            .providers
            .geocoding_base_url
            .as_deref()
            .unwrap_or(GEOAPIFY_URL);
        Self::with_base_url(base_url, config.providers.geocoding_api_key.clone())
    }

    fn search_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}/v1/geocode/search?text={}&apiKey={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key),
            limit
        )
    }

    /// Run a search and return the provider's response untouched
    ///
    /// Used by the proxy, which passes the body straight through. Short
    /// queries are not guarded here; callers validate them first.
    pub async fn search_raw(&self, query: &str, limit: usize) -> Result<serde_json::Value> {
        debug!("Geoapify search: {:?} (limit {})", query, limit);
        http::get_json(&self.client, &self.search_url(query, limit), PROVIDER).await
    }
}

impl GeoBackend for GeoapifyBackend {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodingFeature>> {
        if !is_searchable(query) {
            return Ok(Vec::new());
        }

        debug!("Geoapify search: {:?} (limit {})", query, limit);
        let collection: FeatureCollection =
            http::get_json(&self.client, &self.search_url(query, limit), PROVIDER).await?;

        Ok(collection.features)
    }
}
