//! One full pipeline pass: load, filter, summarize.
use crate::error::Result;
use crate::filter::TripFilter;
use crate::loader;
use crate::models::{City, DayFilter, FilterSpec, MonthFilter, TripCollection};
use crate::registry::Registry;
use crate::stats::{self, DurationStats, StationStats, TimeStats, UserStats};
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// Every summary for one filtered view. A `None` section means the view
/// was empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
    /// Rows in the source before filtering.
    pub loaded: usize,
    /// Rows left after filtering.
    pub matched: usize,
    pub time: Option<TimeStats>,
    pub stations: Option<StationStats>,
    pub durations: Option<DurationStats>,
    pub users: Option<UserStats>,
}

impl Report {
    /// Run the four aggregators over an already filtered view.
    pub fn compute(spec: &FilterSpec, loaded: usize, trips: &TripCollection) -> Self {
        Self {
            city: spec.city,
            month: spec.month,
            day: spec.day,
            loaded,
            matched: trips.len(),
            time: timed("time stats", || stats::time_stats(trips)),
            stations: timed("station stats", || stats::station_stats(trips)),
            durations: timed("trip duration stats", || stats::duration_stats(trips)),
            users: timed("user stats", || stats::user_stats(trips)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }
}

/// Result of [`analyze`]: the filtered view (for paging) and its report.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub spec: FilterSpec,
    pub trips: TripCollection,
    pub report: Report,
}

/// Load the selected city, apply the month/day filters, and summarize.
///
/// ### Errors
/// Only loading can fail (`Error::Load`); an empty view is a valid result.
pub fn analyze(registry: &Registry, spec: &FilterSpec) -> Result<Analysis> {
    let all = loader::load_city(registry, spec.city)?;
    let loaded = all.len();
    let trips = TripFilter::from(spec).apply_owned(all);
    debug!(
        "{} month={} day={}: {} of {} rows match",
        spec.city,
        spec.month,
        spec.day,
        trips.len(),
        loaded
    );
    let report = Report::compute(spec, loaded, &trips);
    Ok(Analysis {
        spec: *spec,
        trips,
        report,
    })
}

fn timed<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    debug!("{} took {:?}", label, start.elapsed());
    out
}
