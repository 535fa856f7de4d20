//! The four summary aggregators.
//!
//! Each aggregator takes a trip collection and returns `None` when it is
//! empty, so a filter that matches nothing yields "no data" instead of an
//! error. Modes break ties towards the smallest value (see [`mode`]).
use crate::models::{DayOfWeek, TripCollection};
use serde::Serialize;
use std::collections::BTreeMap;

/// Label used for trips whose user type cell was blank.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Most frequent value and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mode<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Mode<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mode<U> {
        Mode {
            value: f(self.value),
            count: self.count,
        }
    }
}

/// Statistical mode with a deterministic tie-break: among values sharing
/// the highest count, the smallest by `Ord` wins. `None` for no input.
pub fn mode<T, I>(values: I) -> Option<Mode<T>>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut best: Option<Mode<T>> = None;
    // Ascending key order, so only a strictly higher count replaces the best.
    for (value, count) in counts {
        if best.as_ref().is_none_or(|b| count > b.count) {
            best = Some(Mode { value, count });
        }
    }
    best
}

/// A value that only some datasets carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Availability<T> {
    Available(T),
    /// The column exists but no record in the view has a value.
    NoData,
    /// The dataset's schema has no such column.
    NotAvailable,
}

impl<T> Availability<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Availability::Available(v) => Some(v),
            _ => None,
        }
    }
}

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    /// Calendar month number, 1–12.
    pub month: Mode<u32>,
    pub day_of_week: Mode<DayOfWeek>,
    pub hour: Mode<u32>,
}

pub fn time_stats(trips: &TripCollection) -> Option<TimeStats> {
    Some(TimeStats {
        month: mode(trips.iter().map(|t| t.month()))?,
        day_of_week: mode(trips.iter().map(|t| t.day_of_week()))?,
        hour: mode(trips.iter().map(|t| t.hour()))?,
    })
}

/// A start/end station combination. Orders by start, then end.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub start_station: Mode<String>,
    pub end_station: Mode<String>,
    pub trip: Mode<StationPair>,
}

pub fn station_stats(trips: &TripCollection) -> Option<StationStats> {
    let start_station = mode(trips.iter().map(|t| t.start_station.as_str()))?;
    let end_station = mode(trips.iter().map(|t| t.end_station.as_str()))?;
    let trip = mode(
        trips
            .iter()
            .map(|t| (t.start_station.as_str(), t.end_station.as_str())),
    )?;
    Some(StationStats {
        start_station: start_station.map(str::to_string),
        end_station: end_station.map(str::to_string),
        trip: trip.map(|(start, end)| StationPair {
            start: start.to_string(),
            end: end.to_string(),
        }),
    })
}

/// Total and average travel time, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    /// Trips with a usable duration.
    pub count: usize,
    /// Trips without one; excluded from every figure below.
    pub missing: usize,
    pub total: f64,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub fn duration_stats(trips: &TripCollection) -> Option<DurationStats> {
    if trips.is_empty() {
        return None;
    }
    let durations: Vec<f64> = trips.iter().filter_map(|t| t.trip_duration).collect();
    let count = durations.len();
    let total: f64 = durations.iter().sum();
    let mean = if count > 0 {
        Some(total / count as f64)
    } else {
        None
    };
    Some(DurationStats {
        count,
        missing: trips.len() - count,
        total,
        mean,
        min: durations.iter().copied().reduce(f64::min),
        max: durations.iter().copied().reduce(f64::max),
    })
}

/// Number of records in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Birth-year extremes. The earliest year is the oldest rider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: Mode<i32>,
}

/// Rider demographics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    /// Counts per user type, largest first. Always sums to the record count.
    pub user_types: Vec<CategoryCount>,
    pub gender: Availability<Vec<CategoryCount>>,
    pub birth_year: Availability<BirthYearStats>,
}

pub fn user_stats(trips: &TripCollection) -> Option<UserStats> {
    if trips.is_empty() {
        return None;
    }
    let user_types = count_categories(
        trips
            .iter()
            .map(|t| t.user_type.as_deref().unwrap_or(UNKNOWN_CATEGORY)),
    );

    if !trips.schema().has_rider_details() {
        return Some(UserStats {
            user_types,
            gender: Availability::NotAvailable,
            birth_year: Availability::NotAvailable,
        });
    }

    let genders = count_categories(trips.iter().filter_map(|t| t.gender.as_deref()));
    let gender = if genders.is_empty() {
        Availability::NoData
    } else {
        Availability::Available(genders)
    };

    let years: Vec<i32> = trips.iter().filter_map(|t| t.birth_year).collect();
    let birth_year = match (
        years.iter().min(),
        years.iter().max(),
        mode(years.iter().copied()),
    ) {
        (Some(&earliest), Some(&most_recent), Some(most_common)) => {
            Availability::Available(BirthYearStats {
                earliest,
                most_recent,
                most_common,
            })
        }
        _ => Availability::NoData,
    };

    Some(UserStats {
        user_types,
        gender,
        birth_year,
    })
}

/// Count labels, largest count first, ties alphabetical.
fn count_categories<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut out: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps the alphabetical order of the map for equal counts.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}
