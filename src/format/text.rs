//! Human-readable text output formatter

use crate::error::Result;
use crate::forecast::format_hour;
use crate::format::{OutputFormatter, WeatherReport};
use chrono::Local;

/// Text formatter - outputs a human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &WeatherReport) -> Result<String> {
        let snapshot = &report.snapshot;
        let mut output = String::new();

        output.push_str(&format!(
            "{} ({})\n",
            snapshot.location_name, report.coordinates
        ));
        output.push_str(&format!(
            "{} ({})\n",
            snapshot.condition.description,
            snapshot.condition.kind()
        ));
        output.push_str(&format!(
            "  {} / {}, feels like {}\n",
            celsius(snapshot.temp_celsius),
            fahrenheit(snapshot.temp_fahrenheit),
            celsius(snapshot.feels_like)
        ));
        output.push_str(&format!(
            "  Low {}, high {}\n",
            celsius(snapshot.min_temp),
            celsius(snapshot.max_temp)
        ));
        output.push_str(&format!(
            "  Humidity {}%, wind {:.1} m/s\n",
            snapshot.humidity.round() as i64,
            snapshot.wind_speed
        ));
        output.push_str(&format!(
            "  Sunrise {}, sunset {}\n",
            format_hour(snapshot.sunrise, &Local),
            format_hour(snapshot.sunset, &Local)
        ));

        let strip = report.strip.apply(&snapshot.hourly_forecast);
        if !strip.is_empty() {
            output.push_str("\nNext hours:\n");
            for entry in strip {
                output.push_str(&format!(
                    "  {}  {:>5}  {}\n",
                    format_hour(entry.time, &Local),
                    celsius(entry.temp),
                    entry.description
                ));
            }
        }

        if !report.daily.is_empty() {
            output.push_str("\nDaily:\n");
            for day in &report.daily {
                output.push_str(&format!(
                    "  {}  {:>5} .. {:<5}\n",
                    day.day,
                    celsius(day.temp_min),
                    celsius(day.temp_max)
                ));
            }
        }

        Ok(output)
    }
}

fn celsius(value: f64) -> String {
    format!("{}°C", value.round() as i64)
}

fn fahrenheit(value: f64) -> String {
    format!("{}°F", value.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::create_test_report;
    use crate::weather::ForecastWindow;

    #[test]
    fn test_text_format() {
        let output = TextFormatter.format(&create_test_report()).unwrap();

        assert!(output.starts_with("Tokyo (35.6895, 139.6917)\n"));
        assert!(output.contains("clear sky (clear)"));
        assert!(output.contains("25°C / 76°F, feels like 25°C"));
        assert!(output.contains("Low 22°C, high 27°C"));
        assert!(output.contains("Humidity 55%, wind 3.2 m/s"));
        assert!(output.contains("Daily:"));
        assert!(output.contains("Wed"));
    }

    #[test]
    fn test_hourly_strip_is_truncated() {
        let output = TextFormatter.format(&create_test_report()).unwrap();

        let strip_lines = output
            .lines()
            .skip_while(|l| *l != "Next hours:")
            .skip(1)
            .take_while(|l| !l.is_empty())
            .count();
        assert_eq!(strip_lines, 8);
    }

    #[test]
    fn test_full_strip() {
        let mut report = create_test_report();
        report.strip = ForecastWindow::Full;
        report.daily.clear();

        let output = TextFormatter.format(&report).unwrap();
        let strip_lines = output
            .lines()
            .skip_while(|l| *l != "Next hours:")
            .skip(1)
            .take_while(|l| !l.is_empty())
            .count();
        assert_eq!(strip_lines, 16);
        assert!(!output.contains("Daily:"));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(celsius(21.5), "22°C");
        assert_eq!(celsius(-0.4), "0°C");
        assert_eq!(fahrenheit(76.28), "76°F");
    }
}
