use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The cities with published trip data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "chicago")]
    Chicago,
    #[serde(rename = "new york")]
    NewYork,
    #[serde(rename = "washington")]
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYork, City::Washington];

    /// Lowercase key as typed by the user (`"new york"`).
    pub fn key(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYork => "new york",
            City::Washington => "washington",
        }
    }

    /// Case-insensitive lookup; anything outside the fixed set is `NotFound`.
    pub fn from_key(key: &str) -> Result<City> {
        let wanted = key.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| Error::NotFound(key.trim().to_string()))
    }
}

impl FromStr for City {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        City::from_key(s)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            City::Chicago => "Chicago",
            City::NewYork => "New York",
            City::Washington => "Washington",
        })
    }
}

/// Months that can be filtered on. The datasets only cover the first half
/// of the year, so the universe stops at June.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
}

impl Month {
    /// Shared by validation and filtering.
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// 1-based calendar month number.
    pub fn ordinal(&self) -> u32 {
        *self as u32
    }

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
            Month::April => "april",
            Month::May => "may",
            Month::June => "june",
        }
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Month::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| invalid_filter("month", s, Month::ALL.iter().map(Month::name)))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Day of week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Proper-cased name, e.g. `"Monday"`.
    pub fn name(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(w: Weekday) -> Self {
        DayOfWeek::ALL[w.num_days_from_monday() as usize]
    }
}

impl FromStr for DayOfWeek {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        DayOfWeek::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                invalid_filter(
                    "day",
                    s,
                    DayOfWeek::ALL.iter().map(|d| d.name().to_lowercase()),
                )
            })
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn invalid_filter<I, S>(field: &'static str, value: &str, names: I) -> Error
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut expected: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
    expected.push("all".into());
    Error::InvalidFilter {
        field,
        value: value.trim().to_string(),
        expected: expected.join(", "),
    }
}

/// Month selection of a filter spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

/// Day-of-week selection of a filter spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Only(DayOfWeek),
}

impl FromStr for MonthFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(MonthFilter::All)
        } else {
            s.parse().map(MonthFilter::Only)
        }
    }
}

impl FromStr for DayFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(DayFilter::All)
        } else {
            s.parse().map(DayFilter::Only)
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Only(m) => m.fmt(f),
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Only(d) => f.write_str(&d.name().to_lowercase()),
        }
    }
}

// Filters serialize as the same strings they parse from.
impl Serialize for MonthFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for DayFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A validated (city, month, day) selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterSpec {
    pub fn new(city: City, month: MonthFilter, day: DayFilter) -> Self {
        Self { city, month, day }
    }

    /// Validate raw user input. Fails on the first field that is out of range.
    pub fn parse(city: &str, month: &str, day: &str) -> Result<Self> {
        Ok(Self {
            city: city.parse()?,
            month: month.parse()?,
            day: day.parse()?,
        })
    }
}

/// Which optional rider columns a dataset carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Trip columns only.
    Base,
    /// Trip columns plus `Gender` and `Birth Year`.
    Full,
}

impl SchemaVariant {
    pub fn has_rider_details(&self) -> bool {
        matches!(self, SchemaVariant::Full)
    }
}

/// One rental event (one row of a city's trip log).
///
/// Hour, month and day of week are derived from the start time when the
/// record is built. The start time cannot be changed afterwards, so they
/// always agree with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Seconds; `None` when the cell was blank or not a valid number.
    pub trip_duration: Option<f64>,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    hour: u32,
    month: u32,
    day_of_week: DayOfWeek,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        Self {
            start_time,
            end_time: None,
            trip_duration: None,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            hour: start_time.hour(),
            month: start_time.month(),
            day_of_week: start_time.weekday().into(),
        }
    }

    pub fn with_end_time(mut self, end_time: NaiveDateTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.trip_duration = Some(seconds);
        self
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    /// Hour of day, 0–23.
    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Calendar month, 1–12.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.day_of_week
    }
}

/// Trip records of one city in source order, tagged with the schema
/// variant they were loaded from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripCollection {
    city: City,
    schema: SchemaVariant,
    trips: Vec<TripRecord>,
}

impl TripCollection {
    pub fn new(city: City, schema: SchemaVariant, trips: Vec<TripRecord>) -> Self {
        Self { city, schema, trips }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn schema(&self) -> SchemaVariant {
        self.schema
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.trips
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.trips.iter()
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn into_parts(self) -> (City, SchemaVariant, Vec<TripRecord>) {
        (self.city, self.schema, self.trips)
    }
}

impl<'a> IntoIterator for &'a TripCollection {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}
