//! Geocoding through the weather-lookup proxy
//!
//! The proxy forwards `/api/search` to the provider, so the client needs no key.

use crate::error::Result;
use crate::geo::{is_searchable, FeatureCollection, GeoBackend, GeocodingFeature};
use crate::http;
use tracing::debug;

const PROVIDER: &str = "Search proxy";

/// Geocoder that talks to a weather-lookup proxy
#[derive(Debug, Clone)]
pub struct ProxyGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyGeocoder {
    /// Create a geocoder for the proxy at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http::client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl GeoBackend for ProxyGeocoder {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodingFeature>> {
        if !is_searchable(query) {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/api/search?query={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );
        debug!("Proxy search: {}", url);

        let collection: FeatureCollection = http::get_json(&self.client, &url, PROVIDER).await?;
        Ok(collection.features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_through_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("query", "new york"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "features": [
                    {"properties": {"lat": 40.71, "lon": -74.0, "formatted": "New York, NY, United States"}},
                    {"properties": {"lat": 53.08, "lon": -0.14, "formatted": "New York, England"}}
                ]
            })))
            .mount(&server)
            .await;

        let geocoder = ProxyGeocoder::new(format!("{}/", server.uri())).unwrap();
        let features = geocoder.search("new york", 3).await.unwrap();

        assert_eq!(features.len(), 2);
        assert_eq!(features[1].properties.formatted, "New York, England");
    }

    #[tokio::test]
    async fn test_proxy_failure_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": "Failed to search locations",
                "message": "upstream down"
            })))
            .mount(&server)
            .await;

        let geocoder = ProxyGeocoder::new(server.uri()).unwrap();
        let err = geocoder.search("paris", 5).await.unwrap_err();

        assert!(matches!(err, Error::Provider { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_short_query_skips_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let geocoder = ProxyGeocoder::new(server.uri()).unwrap();
        assert!(geocoder.search("p", 5).await.unwrap().is_empty());
    }
}
