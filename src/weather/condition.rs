//! Condition categories
//!
//! Groups OpenWeather's condition descriptions into a handful of kinds,
//! coarse enough to pick an illustration or a one-word label.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad weather category derived from a condition description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Storm,
    LightRain,
    Snow,
    Fog,
    Clear,
    PartlyCloudy,
    Cloudy,
}

impl ConditionKind {
    /// Classify a provider description (case-insensitive)
    ///
    /// Unrecognized descriptions count as clear.
    pub fn classify(description: &str) -> Self {
        match description.trim().to_lowercase().as_str() {
            // 2xx thunderstorm
            "thunderstorm with light rain"
            | "thunderstorm with rain"
            | "thunderstorm with heavy rain"
            | "light thunderstorm"
            | "thunderstorm"
            | "heavy thunderstorm"
            | "ragged thunderstorm"
            | "thunderstorm with light drizzle"
            | "thunderstorm with drizzle"
            | "thunderstorm with heavy drizzle" => ConditionKind::Storm,

            // 3xx drizzle, plus the lightest rain
            "light intensity drizzle"
            | "drizzle"
            | "heavy intensity drizzle"
            | "light intensity drizzle rain"
            | "drizzle rain"
            | "heavy intensity drizzle rain"
            | "shower rain and drizzle"
            | "heavy shower rain and drizzle"
            | "shower drizzle"
            | "light rain" => ConditionKind::LightRain,

            // 5xx rain
            "moderate rain"
            | "heavy intensity rain"
            | "very heavy rain"
            | "extreme rain"
            | "freezing rain"
            | "light intensity shower rain"
            | "shower rain"
            | "heavy intensity shower rain"
            | "ragged shower rain" => ConditionKind::Storm,

            // 6xx snow
            "light snow"
            | "snow"
            | "heavy snow"
            | "sleet"
            | "light shower sleet"
            | "shower sleet"
            | "light rain and snow"
            | "rain and snow"
            | "light shower snow"
            | "shower snow"
            | "heavy shower snow" => ConditionKind::Snow,

            // 7xx atmosphere
            "mist" | "smoke" | "haze" | "sand/dust whirls" | "fog" | "sand" | "dust"
            | "volcanic ash" | "squalls" | "tornado" => ConditionKind::Fog,

            "few clouds" | "scattered clouds" => ConditionKind::PartlyCloudy,
            "broken clouds" | "overcast clouds" => ConditionKind::Cloudy,

            _ => ConditionKind::Clear,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConditionKind::Storm => "storm",
            ConditionKind::LightRain => "light rain",
            ConditionKind::Snow => "snow",
            ConditionKind::Fog => "fog",
            ConditionKind::Clear => "clear",
            ConditionKind::PartlyCloudy => "partly cloudy",
            ConditionKind::Cloudy => "cloudy",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_groups() {
        assert_eq!(ConditionKind::classify("heavy thunderstorm"), ConditionKind::Storm);
        assert_eq!(ConditionKind::classify("shower rain"), ConditionKind::Storm);
        assert_eq!(ConditionKind::classify("light rain"), ConditionKind::LightRain);
        assert_eq!(ConditionKind::classify("drizzle"), ConditionKind::LightRain);
        assert_eq!(ConditionKind::classify("sleet"), ConditionKind::Snow);
        assert_eq!(ConditionKind::classify("haze"), ConditionKind::Fog);
        assert_eq!(ConditionKind::classify("clear sky"), ConditionKind::Clear);
        assert_eq!(ConditionKind::classify("scattered clouds"), ConditionKind::PartlyCloudy);
        assert_eq!(ConditionKind::classify("overcast clouds"), ConditionKind::Cloudy);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(ConditionKind::classify("  Broken Clouds "), ConditionKind::Cloudy);
    }

    #[test]
    fn test_unknown_is_clear() {
        assert_eq!(ConditionKind::classify("raining frogs"), ConditionKind::Clear);
        assert_eq!(ConditionKind::classify(""), ConditionKind::Clear);
    }
}
