//! Month and day-of-week filtering.
//!
//! # Examples
//!
//! ```
//! use bikeshare_rs::filter::TripFilter;
//! use bikeshare_rs::models::{DayFilter, DayOfWeek, Month, MonthFilter};
//!
//! let filter = TripFilter::new(
//!     MonthFilter::Only(Month::March),
//!     DayFilter::Only(DayOfWeek::Friday),
//! );
//! assert!(!filter.is_identity());
//! assert!(TripFilter::default().is_identity());
//! ```

use crate::models::{DayFilter, FilterSpec, MonthFilter, TripCollection, TripRecord};

/// Predicates applied to a trip collection. Both parts must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TripFilter {
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl TripFilter {
    pub fn new(month: MonthFilter, day: DayFilter) -> Self {
        Self { month, day }
    }

    /// True for ("all", "all"), which keeps every record.
    pub fn is_identity(&self) -> bool {
        self.month == MonthFilter::All && self.day == DayFilter::All
    }

    /// Check if a trip passes the filter
    pub fn matches(&self, trip: &TripRecord) -> bool {
        let month_ok = match self.month {
            MonthFilter::All => true,
            MonthFilter::Only(month) => trip.month() == month.ordinal(),
        };
        let day_ok = match self.day {
            DayFilter::All => true,
            DayFilter::Only(day) => trip.day_of_week() == day,
        };
        month_ok && day_ok
    }

    /// Return a new collection holding the matching records in their
    /// original order. The input is left untouched.
    pub fn apply(&self, trips: &TripCollection) -> TripCollection {
        if self.is_identity() {
            return trips.clone();
        }
        let kept = trips.iter().filter(|t| self.matches(t)).cloned().collect();
        TripCollection::new(trips.city(), trips.schema(), kept)
    }

    /// Like [`TripFilter::apply`] but reuses the records of an owned collection.
    pub fn apply_owned(&self, trips: TripCollection) -> TripCollection {
        if self.is_identity() {
            return trips;
        }
        let (city, schema, mut records) = trips.into_parts();
        records.retain(|t| self.matches(t));
        TripCollection::new(city, schema, records)
    }
}

impl From<&FilterSpec> for TripFilter {
    fn from(spec: &FilterSpec) -> Self {
        Self::new(spec.month, spec.day)
    }
}
