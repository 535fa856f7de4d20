//! Read a city's trip log into a [`TripCollection`].
//!
//! ### Source layout
//! A CSV file with a header row. Required columns: `Start Time`,
//! `Trip Duration`, `Start Station`, `End Station`, `User Type`. Optional:
//! `End Time`, and the rider pair `Gender` + `Birth Year` (both present means
//! [`SchemaVariant::Full`]). Any other column, including the unnamed index
//! column some exports carry, is ignored.
//!
//! Every start time must parse; a single bad start time fails the whole
//! load. Durations and birth years are lenient: blank or unparsable cells
//! become `None`.
use crate::error::{Error, LoadError, Result};
use crate::models::{City, SchemaVariant, TripCollection, TripRecord};
use crate::registry::Registry;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use std::fs::File;
use std::io::Read;

const START_TIME: &str = "Start Time";
const END_TIME: &str = "End Time";
const TRIP_DURATION: &str = "Trip Duration";
const START_STATION: &str = "Start Station";
const END_STATION: &str = "End Station";
const USER_TYPE: &str = "User Type";
const GENDER: &str = "Gender";
const BIRTH_YEAR: &str = "Birth Year";

// Tried in order. `%.f` also accepts a missing fraction.
const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Load the dataset of `city` from the file the registry points at.
///
/// ### Errors
/// `Error::Load` if the file cannot be opened, a row is malformed, a
/// required column is missing, or a start time does not parse.
pub fn load_city(registry: &Registry, city: City) -> Result<TripCollection> {
    let path = registry.source(city);
    debug!("loading {} trips from {}", city, path.display());
    let file = File::open(&path).map_err(|e| Error::Load {
        path: path.clone(),
        source: e.into(),
    })?;
    let trips = read_trips(city, file).map_err(|source| Error::Load {
        path: path.clone(),
        source,
    })?;
    debug!(
        "loaded {} rows ({:?} schema) from {}",
        trips.len(),
        trips.schema(),
        path.display()
    );
    Ok(trips)
}

/// Parse trips from any CSV reader.
pub fn read_trips<R: Read>(
    city: City,
    reader: R,
) -> std::result::Result<TripCollection, LoadError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let columns = Columns::resolve(rdr.headers()?)?;

    let mut trips = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        trips.push(columns.trip(&record, i as u64 + 1)?);
    }
    Ok(TripCollection::new(city, columns.schema(), trips))
}

/// Column positions resolved once from the header row.
#[derive(Debug)]
struct Columns {
    start_time: usize,
    end_time: Option<usize>,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    // Either both or neither: a lone rider column does not make a full schema.
    rider: Option<(usize, usize)>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> std::result::Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(LoadError::MissingColumn(name));

        let rider = match (find(GENDER), find(BIRTH_YEAR)) {
            (Some(g), Some(b)) => Some((g, b)),
            _ => None,
        };
        Ok(Self {
            start_time: require(START_TIME)?,
            end_time: find(END_TIME),
            trip_duration: require(TRIP_DURATION)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: require(USER_TYPE)?,
            rider,
        })
    }

    fn schema(&self) -> SchemaVariant {
        if self.rider.is_some() {
            SchemaVariant::Full
        } else {
            SchemaVariant::Base
        }
    }

    fn trip(&self, record: &StringRecord, row: u64) -> std::result::Result<TripRecord, LoadError> {
        let raw_start = record.get(self.start_time).unwrap_or("");
        let start_time = parse_timestamp(raw_start).ok_or_else(|| LoadError::StartTime {
            row,
            value: raw_start.to_string(),
        })?;

        let mut trip = TripRecord::new(
            start_time,
            record.get(self.start_station).unwrap_or(""),
            record.get(self.end_station).unwrap_or(""),
        );
        trip.end_time = self
            .end_time
            .and_then(|i| cell(record, i))
            .and_then(parse_timestamp);
        trip.trip_duration = cell(record, self.trip_duration).and_then(parse_duration);
        trip.user_type = cell(record, self.user_type).map(str::to_string);
        if let Some((gender, birth_year)) = self.rider {
            trip.gender = cell(record, gender).map(str::to_string);
            trip.birth_year = cell(record, birth_year).and_then(parse_year);
        }
        Ok(trip)
    }
}

/// Non-empty cell content.
fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).filter(|s| !s.is_empty())
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn parse_duration(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

// Birth years are exported as floats ("1992.0"). Anything outside a
// plausible range is treated as missing.
const BIRTH_YEARS: std::ops::RangeInclusive<f64> = 1800.0..=2100.0;

fn parse_year(s: &str) -> Option<i32> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.fract() == 0.0 && BIRTH_YEARS.contains(v))
        .map(|v| v as i32)
}
