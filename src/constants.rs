//! Centralized constants for the weather-lookup crate
//!
//! Values shared by several modules live here so the clients, the proxy
//! and the CLI agree on them.

/// External API endpoints
pub mod api {
    /// OpenWeather API root (current conditions and 5-day/3-hour forecast)
    pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org";

    /// Geoapify geocoding API root
    pub const GEOAPIFY_URL: &str = "https://api.geoapify.com";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// User agent sent with every outgoing request
    pub const USER_AGENT: &str = concat!("weather-lookup/", env!("CARGO_PKG_VERSION"));
}

/// Geocoding search settings
pub mod search {
    /// Shortest trimmed query that is sent to the geocoding provider
    pub const MIN_QUERY_LEN: usize = 2;

    /// Quiet period before an autocomplete request is issued
    pub const DEBOUNCE_MS: u64 = 500;

    /// Number of autocomplete suggestions requested
    pub const SUGGESTION_LIMIT: usize = 5;
}

/// Forecast presentation settings
pub mod forecast {
    /// Days covered by the weekly summary
    pub const DAY_COUNT: usize = 5;

    /// Samples shown in the hourly strip (3-hour steps, so one day)
    pub const HOURLY_STRIP_LEN: usize = 8;

    /// Icon used when a day has no forecast samples
    pub const DEFAULT_ICON: &str = "01d";
}
