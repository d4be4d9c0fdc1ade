//! Weather through the weather-lookup proxy
//!
//! The proxy answers `/api/weather` with an already normalized snapshot.

use crate::coord::Coordinates;
use crate::error::Result;
use crate::http;
use crate::weather::{ForecastWindow, WeatherBackend, WeatherSnapshot};
use tracing::debug;

const PROVIDER: &str = "Weather proxy";

/// Weather client that talks to a weather-lookup proxy
#[derive(Debug, Clone)]
pub struct ProxyWeatherClient {
    client: reqwest::Client,
    base_url: String,
    window: ForecastWindow,
}

impl ProxyWeatherClient {
    /// Create a client for the proxy at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http::client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            window: ForecastWindow::Full,
        })
    }

    pub fn with_window(mut self, window: ForecastWindow) -> Self {
        self.window = window;
        self
    }
}

impl WeatherBackend for ProxyWeatherClient {
    async fn fetch(&self, coords: Coordinates) -> Result<WeatherSnapshot> {
        coords.validate()?;

        let url = format!(
            "{}/api/weather?lat={}&lon={}",
            self.base_url, coords.latitude, coords.longitude
        );
        debug!("Proxy weather: {}", url);

        let mut snapshot: WeatherSnapshot = http::get_json(&self.client, &url, PROVIDER).await?;
        snapshot.hourly_forecast.sort_by_key(|entry| entry.time);
        if let ForecastWindow::Truncate(n) = self.window {
            snapshot.hourly_forecast.truncate(n);
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn snapshot_body() -> serde_json::Value {
        serde_json::json!({
            "tempCelsius": 12.0,
            "tempFahrenheit": 53.6,
            "feelsLike": 11.0,
            "minTemp": 10.0,
            "maxTemp": 14.0,
            "humidity": 80.0,
            "windSpeed": 6.2,
            "locationName": "London",
            "sunrise": "2024-05-01T04:30:00Z",
            "sunset": "2024-05-01T19:10:00Z",
            "condition": {"icon": "09d", "description": "shower rain"},
            "hourlyForecast": [
                {"time": "2024-05-01T15:00:00Z", "temp": 13.0, "icon": "09d", "description": "shower rain"},
                {"time": "2024-05-01T12:00:00Z", "temp": 12.5, "icon": "04d", "description": "broken clouds"},
                {"time": "2024-05-01T18:00:00Z", "temp": 11.0, "icon": "04n", "description": "broken clouds"}
            ]
        })
    }

    #[tokio::test]
    async fn test_fetch_through_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .and(query_param("lat", "51.5074"))
            .and(query_param("lon", "-0.1278"))
            .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_body()))
            .mount(&server)
            .await;

        let client = ProxyWeatherClient::new(server.uri())
            .unwrap()
            .with_window(ForecastWindow::Truncate(2));
        let snapshot = client.fetch(Coordinates::new(51.5074, -0.1278)).await.unwrap();

        assert_eq!(snapshot.location_name, "London");
        assert_eq!(snapshot.hourly_forecast.len(), 2);
        assert_eq!(snapshot.hourly_forecast[0].icon, "04d");
        assert_eq!(snapshot.hourly_forecast[1].icon, "09d");
    }

    #[tokio::test]
    async fn test_proxy_failure_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": "Failed to fetch weather data",
                "message": "OpenWeather is unavailable"
            })))
            .mount(&server)
            .await;

        let client = ProxyWeatherClient::new(server.uri()).unwrap();
        let err = client.fetch(Coordinates::new(0.0, 0.0)).await.unwrap_err();

        assert!(matches!(err, Error::Provider { status: 500, .. }));
    }
}
