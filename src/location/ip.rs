//! IP-based geolocation
//!
//! Uses ip-api.com for a single network position read. No cache and no
//! retry: a failed read is reported as-is.

use crate::constants::api::IP_API_URL;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::http;
use crate::location::LocationProvider;
use serde::Deserialize;
use tracing::{debug, info};

/// Network position lookup, gated by a user permission flag
#[derive(Debug)]
pub struct IpLocator {
    client: reqwest::Client,
    url: String,
    allowed: bool,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    message: Option<String>,
}

impl IpLocator {
    /// Create a locator against ip-api.com
    pub fn new(allowed: bool) -> Result<Self> {
        Self::with_url(IP_API_URL, allowed)
    }

    /// Create a locator against a specific endpoint
    pub fn with_url(url: impl Into<String>, allowed: bool) -> Result<Self> {
        Ok(Self {
            client: http::client()?,
            url: url.into(),
            allowed,
        })
    }

    async fn read_position(&self) -> Result<Coordinates> {
        let body: IpApiResponse = http::get_json(&self.client, &self.url, "IP location")
            .await
            .map_err(|e| Error::PositionUnavailable(e.to_string()))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| body.status.clone());
            return Err(Error::PositionUnavailable(format!("IP lookup failed: {}", reason)));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => {
                let coords = Coordinates::new(lat, lon);
                coords
                    .validate()
                    .map_err(|e| Error::PositionUnavailable(e.to_string()))?;
                Ok(coords)
            }
            _ => Err(Error::PositionUnavailable(
                "IP lookup returned no coordinates".to_string(),
            )),
        }
    }
}

impl LocationProvider for IpLocator {
    async fn resolve_device_location(&self) -> Result<Coordinates> {
        if !self.allowed {
            info!("Network location lookup not permitted");
            return Err(Error::PermissionDenied(
                "network location lookup is disabled (location.allow_network_lookup)".to_string(),
            ));
        }

        let coords = self.read_position().await?;
        debug!("Network position: {}", coords);
        Ok(coords)
    }
}
