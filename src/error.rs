//! Error types for weather-lookup

use thiserror::Error;

/// Main error type for weather-lookup operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Location permission denied: {0}")]
    PermissionDenied(String),

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{provider} returned status {status}: {message}")]
    Provider {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("No location found for '{0}'")]
    NoLocationFound(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error only records that a newer request superseded this one
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Single sentence shown in place of content when an operation fails
    pub fn user_message(&self) -> String {
        match self {
            Error::PermissionDenied(_) => {
                "Location permission was denied. Enable it or search for a place instead.".to_string()
            }
            Error::PositionUnavailable(_) => "Could not determine your current position.".to_string(),
            Error::Network(_) => "Could not reach the weather service. Check your connection.".to_string(),
            Error::Provider { provider, status, .. } => {
                format!("{} is unavailable right now (status {}).", provider, status)
            }
            Error::InvalidPayload(_) | Error::Json(_) => {
                "Received unexpected data from the weather service.".to_string()
            }
            Error::NoLocationFound(query) => format!("No location found for '{}'.", query),
            Error::Cancelled => String::new(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for weather-lookup operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_is_identified() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::Network("down".to_string()).is_cancelled());
    }

    #[test]
    fn test_user_message_names_provider() {
        let err = Error::Provider {
            provider: "OpenWeather".to_string(),
            status: 401,
            message: "Invalid API key".to_string(),
        };
        assert_eq!(err.user_message(), "OpenWeather is unavailable right now (status 401).");
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[test]
    fn test_user_message_for_missing_location() {
        let err = Error::NoLocationFound("Atlantis".to_string());
        assert_eq!(err.user_message(), "No location found for 'Atlantis'.");
    }

    #[test]
    fn test_config_error_passes_through() {
        let err = Error::Config("missing key".to_string());
        assert_eq!(err.user_message(), "Configuration error: missing key");
    }
}
