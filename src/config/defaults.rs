//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5000;

/// Default hourly strip length (0 keeps the full forecast)
pub const DEFAULT_HOURLY_LIMIT: usize = constants::forecast::HOURLY_STRIP_LEN;

/// Default number of days in the weekly summary
pub const DEFAULT_DAYS: usize = constants::forecast::DAY_COUNT;

/// Default autocomplete debounce delay in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = constants::search::DEBOUNCE_MS;

/// Default autocomplete result count
pub const DEFAULT_SEARCH_LIMIT: usize = constants::search::SUGGESTION_LIMIT;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "weather-lookup";

/// Environment variable holding the OpenWeather API key
pub const ENV_WEATHER_KEY: &str = "WEATHER_API_KEY";

/// Environment variable holding the Geoapify API key
pub const ENV_GEOCODING_KEY: &str = "GEOAPIFY_KEY";

/// Environment variable holding the proxy base URL
pub const ENV_PROXY_URL: &str = "WEATHER_PROXY_URL";

/// Environment variable overriding the server port
pub const ENV_PORT: &str = "PORT";
