//! Forecast aggregation
//!
//! Buckets 3-hour forecast samples into calendar days in a given time zone.
//! Everything here is pure: the reference date and zone are parameters, and
//! only the `Local` wrappers read the clock.

use crate::constants::forecast::DEFAULT_ICON;
use crate::weather::HourlyEntry;
use chrono::{DateTime, Days, Local, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Min/max of one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon"
    pub day: String,
    pub temp_max: f64,
    pub temp_min: f64,
    pub icon_max: String,
    pub icon_min: String,
}

impl DailySummary {
    fn fallback(date: NaiveDate) -> Self {
        Self {
            date,
            day: weekday_label(date),
            temp_max: 0.0,
            temp_min: 0.0,
            icon_max: DEFAULT_ICON.to_string(),
            icon_min: DEFAULT_ICON.to_string(),
        }
    }
}

/// The noon and midnight samples of one day, when the forecast has them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoonMidnight {
    pub noon: Option<HourlyEntry>,
    pub midnight: Option<HourlyEntry>,
}

/// Summarize `hourly` into `day_count` days starting today, in local time
pub fn summarize_by_day(hourly: &[HourlyEntry], day_count: usize) -> Vec<DailySummary> {
    summarize_by_day_at(hourly, day_count, Local::now().date_naive(), &Local)
}

/// Summarize `hourly` into `day_count` consecutive days starting at `today`
///
/// An entry belongs to the day its `time` falls on in `tz`. Each day takes
/// the highest and lowest sample; on equal temperatures the earlier sample
/// wins. Days without samples get a zeroed fallback entry.
pub fn summarize_by_day_at<Tz: TimeZone>(
    hourly: &[HourlyEntry],
    day_count: usize,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<DailySummary> {
    (0..day_count)
        .map_while(|offset| today.checked_add_days(Days::new(offset as u64)))
        .map(|date| {
            let bucket: Vec<&HourlyEntry> = hourly
                .iter()
                .filter(|entry| local_date(entry.time, tz) == date)
                .collect();
            summarize_bucket(date, &bucket)
        })
        .collect()
}

fn summarize_bucket(date: NaiveDate, bucket: &[&HourlyEntry]) -> DailySummary {
    let Some((&first, rest)) = bucket.split_first() else {
        debug!("No forecast data for {}", date);
        return DailySummary::fallback(date);
    };

    let mut max = first;
    let mut min = first;
    for &entry in rest {
        if entry.temp > max.temp {
            max = entry;
        }
        if entry.temp < min.temp {
            min = entry;
        }
    }

    DailySummary {
        date,
        day: weekday_label(date),
        temp_max: max.temp,
        temp_min: min.temp,
        icon_max: icon_or_default(&max.icon),
        icon_min: icon_or_default(&min.icon),
    }
}

/// Group samples by local date, keeping the first noon and midnight sample
pub fn group_by_noon_and_midnight(hourly: &[HourlyEntry]) -> BTreeMap<NaiveDate, NoonMidnight> {
    group_by_noon_and_midnight_in(hourly, &Local)
}

pub fn group_by_noon_and_midnight_in<Tz: TimeZone>(
    hourly: &[HourlyEntry],
    tz: &Tz,
) -> BTreeMap<NaiveDate, NoonMidnight> {
    let mut days: BTreeMap<NaiveDate, NoonMidnight> = BTreeMap::new();

    for entry in hourly {
        let local = entry.time.with_timezone(tz);
        let slot = days.entry(local.date_naive()).or_default();
        match local.hour() {
            12 if slot.noon.is_none() => slot.noon = Some(entry.clone()),
            0 if slot.midnight.is_none() => slot.midnight = Some(entry.clone()),
            _ => {}
        }
    }

    days
}

/// Render the hour of `time` in `tz` as "HH:00"
pub fn format_hour<Tz: TimeZone>(time: DateTime<Utc>, tz: &Tz) -> String {
    format!("{:02}:00", time.with_timezone(tz).hour())
}

fn local_date<Tz: TimeZone>(time: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    time.with_timezone(tz).date_naive()
}

fn weekday_label(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

fn icon_or_default(icon: &str) -> String {
    if icon.is_empty() {
        DEFAULT_ICON.to_string()
    } else {
        icon.to_string()
    }
}
