//! HTTP API routes
//!
//! Defines the proxy's REST endpoints.

use crate::constants::search::MIN_QUERY_LEN;
use crate::coord::Coordinates;
use crate::error::Error;
use crate::geo::is_searchable;
use crate::server::state::AppState;
use crate::weather::{WeatherBackend, WeatherSnapshot};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/weather", get(weather_handler))
        .route("/api/search", get(search_handler))
        .route("/api/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub message: String,
}

impl ApiError {
    fn bad_request(error: &str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.to_string(),
            message: message.into(),
        }
    }

    /// Upstream failure; details stay in the log, clients get the short message
    fn upstream(error: &str, err: Error) -> Self {
        error!("{}: {}", error, err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.to_string(),
            message: err.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// Weather query parameters
///
/// Kept as strings so missing and malformed values both get a JSON 400.
#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl WeatherParams {
    fn coordinates(&self) -> Result<Coordinates, ApiError> {
        let (Some(lat), Some(lon)) = (self.lat.as_deref(), self.lon.as_deref()) else {
            return Err(ApiError::bad_request(
                "Missing parameters",
                "Latitude and longitude are required",
            ));
        };

        let parse = |name: &str, value: &str| {
            value.trim().parse::<f64>().map_err(|_| {
                ApiError::bad_request(
                    "Invalid parameters",
                    format!("{} is not a number: {}", name, value),
                )
            })
        };
        let coords = Coordinates::new(parse("lat", lat)?, parse("lon", lon)?);
        coords
            .validate()
            .map_err(|e| ApiError::bad_request("Invalid parameters", e.to_string()))?;

        Ok(coords)
    }
}

/// Current weather and full forecast for a position
///
/// GET /api/weather?lat=&lon=
async fn weather_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherSnapshot>, ApiError> {
    let coords = params.coordinates()?;

    let snapshot = state
        .weather
        .fetch(coords)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch weather data", e))?;

    Ok(Json(snapshot))
}

/// Search query parameters
///
/// `limit` is a string for the same reason as in [`WeatherParams`].
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub limit: Option<String>,
}

fn default_search_limit() -> usize {
    1
}

impl SearchParams {
    fn limit(&self) -> Result<usize, ApiError> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(default_search_limit()),
            Some(value) => value.parse::<usize>().map_err(|_| {
                ApiError::bad_request(
                    "Invalid parameters",
                    format!("limit is not a positive integer: {}", value),
                )
            }),
        }
    }
}

/// Geocoding search, passed through from the provider
///
/// GET /api/search?query=&limit=
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let query = params.query.as_deref().unwrap_or_default();
    if !is_searchable(query) {
        return Err(ApiError::bad_request(
            "Invalid query",
            format!("Query must be at least {} characters", MIN_QUERY_LEN),
        ));
    }
    let limit = params.limit()?;

    let body = state
        .geocoder
        .search_raw(query.trim(), limit)
        .await
        .map_err(|e| ApiError::upstream("Failed to search locations", e))?;

    Ok(Json(body))
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_state(upstream: &str) -> Arc<AppState> {
        let mut config = Config::default();
        config.providers.weather_api_key = "OW_KEY".to_string();
        config.providers.geocoding_api_key = "GEO_KEY".to_string();
        config.providers.weather_base_url = Some(upstream.to_string());
        config.providers.geocoding_base_url = Some(upstream.to_string());
        Arc::new(AppState::new(&config).unwrap())
    }

    async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn mount_weather(server: &MockServer, forecast_status: u16) {
        let list: Vec<serde_json::Value> = (0..12i64)
            .map(|i| {
                serde_json::json!({
                    "dt": 1714564800 + i * 10800,
                    "main": {"temp": 20.0 + i as f64},
                    "weather": [{"icon": "02d", "description": "few clouds"}]
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 25.0, "feels_like": 26.0, "temp_min": 24.0, "temp_max": 27.0, "humidity": 55},
                "name": "Tokyo",
                "sys": {"sunrise": 1714507200, "sunset": 1714557600},
                "wind": {"speed": 2.0},
                "weather": [{"icon": "01d", "description": "clear sky"}]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(
                ResponseTemplate::new(forecast_status)
                    .set_body_json(serde_json::json!({ "list": list })),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let server = MockServer::start().await;
        let (status, body) = get(create_test_state(&server.uri()), "/api/status").await;

        assert_eq!(status, StatusCode::OK);
        let status: StatusResponse = serde_json::from_value(body).unwrap();
        assert!(status.running);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_weather_endpoint() {
        let server = MockServer::start().await;
        mount_weather(&server, 200).await;

        let (status, body) = get(
            create_test_state(&server.uri()),
            "/api/weather?lat=35.6895&lon=139.6917",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["locationName"], "Tokyo");
        assert_eq!(body["tempCelsius"], 25.0);
        assert_eq!(body["tempFahrenheit"], 77.0);
        assert_eq!(body["hourlyForecast"].as_array().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_weather_missing_params() {
        let server = MockServer::start().await;
        let (status, body) = get(create_test_state(&server.uri()), "/api/weather?lat=10").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing parameters");
    }

    #[tokio::test]
    async fn test_weather_invalid_params() {
        let server = MockServer::start().await;
        let state = create_test_state(&server.uri());

        let (status, _) = get(Arc::clone(&state), "/api/weather?lat=abc&lon=10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get(state, "/api/weather?lat=95&lon=10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("Latitude"));
    }

    #[tokio::test]
    async fn test_weather_upstream_failure() {
        let server = MockServer::start().await;
        mount_weather(&server, 500).await;

        let (status, body) = get(
            create_test_state(&server.uri()),
            "/api/weather?lat=35.6895&lon=139.6917",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch weather data");
        assert!(body["message"].as_str().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_hides_api_keys() {
        let state = create_test_state("http://127.0.0.1:1");

        let (status, body) = get(Arc::clone(&state), "/api/weather?lat=35.6&lon=139.6").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["message"],
            Error::Network(String::new()).user_message()
        );
        assert!(!body.to_string().contains("OW_KEY"));
        assert!(!body.to_string().contains("127.0.0.1"));

        let (status, body) = get(state, "/api/search?query=berlin").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("GEO_KEY"));
    }

    #[tokio::test]
    async fn test_search_passthrough() {
        let server = MockServer::start().await;
        let provider_body = serde_json::json!({
            "type": "FeatureCollection",
            "features": [{"properties": {"lat": 48.85, "lon": 2.35, "formatted": "Paris, France", "result_type": "city"}}],
            "query": {"text": "paris"}
        });
        Mock::given(method("GET"))
            .and(path("/v1/geocode/search"))
            .and(query_param("text", "paris"))
            .and(query_param("apiKey", "GEO_KEY"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(provider_body.clone()))
            .mount(&server)
            .await;

        let (status, body) = get(create_test_state(&server.uri()), "/api/search?query=paris").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, provider_body);
    }

    #[tokio::test]
    async fn test_search_rejects_short_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let state = create_test_state(&server.uri());

        let (status, _) = get(Arc::clone(&state), "/api/search?query=p").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get(state, "/api/search").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid query");
    }

    #[tokio::test]
    async fn test_search_rejects_bad_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let state = create_test_state(&server.uri());

        let (status, body) = get(Arc::clone(&state), "/api/search?query=paris&limit=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid parameters");
        assert!(body["message"].as_str().unwrap().contains("abc"));

        let (status, _) = get(state, "/api/search?query=paris&limit=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/geocode/search"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid apiKey"))
            .mount(&server)
            .await;

        let (status, body) = get(
            create_test_state(&server.uri()),
            "/api/search?query=berlin&limit=5",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to search locations");
    }

    #[test]
    fn test_state_requires_keys() {
        let err = AppState::new(&Config::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
