//! Weekly aggregation of enriched tracks.

use super::models::TimelineBucket;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Parses an `added_at` timestamp into the calendar date it falls on.
///
/// Accepts RFC 3339 timestamps (the date is taken in the timestamp's own
/// offset), naive date-times and plain dates.
pub fn parse_added_at(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// ISO week label (`YYYY-Www`) of `date`.
pub fn week_label(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

#[derive(Default)]
struct WeekAccumulator {
    valence_sum: f64,
    energy_sum: f64,
    count: usize,
}

/// Groups `(date, valence, energy)` points by ISO week and averages them.
///
/// Buckets come out in chronological order, one per distinct week.
pub fn build_timeline<I>(points: I) -> Vec<TimelineBucket>
where
    I: IntoIterator<Item = (NaiveDate, f64, f64)>,
{
    let mut weeks: BTreeMap<(i32, u32), WeekAccumulator> = BTreeMap::new();
    for (date, valence, energy) in points {
        let week = date.iso_week();
        let acc = weeks.entry((week.year(), week.week())).or_default();
        acc.valence_sum += valence;
        acc.energy_sum += energy;
        acc.count += 1;
    }

    weeks
        .into_iter()
        .map(|((year, week), acc)| TimelineBucket {
            week: format!("{}-W{:02}", year, week),
            valence: acc.valence_sum / acc.count as f64,
            energy: acc.energy_sum / acc.count as f64,
            tracks: acc.count,
        })
        .collect()
}
