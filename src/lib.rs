//! bikeshare_rs
//!
//! A small Rust library for exploring US bikeshare trip logs (Chicago,
//! New York City, Washington). Pairs with the `bikeshare` CLI.
//!
//! ### Features
//! - Load a city's CSV trip log with derived hour / month / day-of-week
//! - Filter by month (January–June) and day of week
//! - Popular travel times, stations and trips, trip-duration totals, and
//!   rider demographics, with "no data" results for empty selections
//! - Page through raw records five at a time
//! - Export a report as JSON or the filtered trips as CSV
//!
//! ### Example
//! ```no_run
//! use bikeshare_rs::{FilterSpec, Registry, analyze};
//!
//! let registry = Registry::new("data");
//! let spec = FilterSpec::parse("chicago", "march", "friday")?;
//! let analysis = analyze(&registry, &spec)?;
//! if let Some(time) = &analysis.report.time {
//!     println!("busiest hour: {}", time.hour.value);
//! }
//! bikeshare_rs::storage::save_json(&analysis.report, "chicago_march_friday.json")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod analysis;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod paginate;
pub mod present;
pub mod registry;
pub mod stats;
pub mod storage;

pub use analysis::{Analysis, Report, analyze};
pub use error::{Error, LoadError};
pub use models::{
    City, DayFilter, DayOfWeek, FilterSpec, Month, MonthFilter, TripCollection, TripRecord,
};
pub use registry::Registry;
