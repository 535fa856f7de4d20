//! Plain-text rendering of reports and raw record pages.
//!
//! Numbers are grouped according to a locale tag (`en`, `de`, `fr`, ...),
//! e.g. `1,234,567.89` vs `1.234.567,89`.
use crate::analysis::Report;
use crate::models::{SchemaVariant, TripRecord};
use crate::stats::{
    Availability, BirthYearStats, CategoryCount, DurationStats, StationStats, TimeStats, UserStats,
};
use num_format::{Locale, ToFormattedString};
use std::io::{self, Write};

const RULE: &str = "----------------------------------------";
const NO_DATA: &str = "No data for the selected filters.";
const NOT_AVAILABLE: &str = "not available for this dataset";

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Render seconds as `1d 02h 03m 04s`, dropping leading zero units.
pub fn humanize_seconds(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    let (d, h, m, s) = (total / 86_400, total / 3_600 % 24, total / 60 % 60, total % 60);
    if d > 0 {
        format!("{d}d {h:02}h {m:02}m {s:02}s")
    } else if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string())
}

/// Writes summaries for humans.
#[derive(Debug, Clone, Copy)]
pub struct Presenter {
    locale: &'static Locale,
    decimal: char,
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new("en")
    }
}

impl Presenter {
    pub fn new(locale_tag: &str) -> Self {
        let (locale, decimal) = map_locale(locale_tag);
        Self { locale, decimal }
    }

    pub fn count(&self, n: usize) -> String {
        n.to_formatted_string(self.locale)
    }

    /// Two decimals with grouped integer part.
    pub fn decimal(&self, v: f64) -> String {
        if !v.is_finite() {
            return "NA".into();
        }
        let cents = (v.abs() * 100.0).round() as u64;
        let sign = if v < 0.0 && cents > 0 { "-" } else { "" };
        format!(
            "{}{}{}{:02}",
            sign,
            (cents / 100).to_formatted_string(self.locale),
            self.decimal,
            cents % 100
        )
    }

    fn seconds(&self, v: f64) -> String {
        format!("{} s ({})", self.decimal(v), humanize_seconds(v))
    }

    pub fn write_report<W: Write>(&self, w: &mut W, report: &Report) -> io::Result<()> {
        writeln!(
            w,
            "{} (month: {}, day: {}): {} of {} trips",
            report.city,
            report.month,
            report.day,
            self.count(report.matched),
            self.count(report.loaded)
        )?;
        writeln!(w, "{RULE}")?;
        self.write_time(w, report.time.as_ref())?;
        self.write_stations(w, report.stations.as_ref())?;
        self.write_durations(w, report.durations.as_ref())?;
        self.write_users(w, report.users.as_ref())
    }

    pub fn write_time<W: Write>(&self, w: &mut W, stats: Option<&TimeStats>) -> io::Result<()> {
        writeln!(w, "\nMost frequent times of travel\n")?;
        match stats {
            Some(t) => {
                writeln!(
                    w,
                    "Most popular month: {} ({} trips)",
                    month_name(t.month.value),
                    self.count(t.month.count)
                )?;
                writeln!(
                    w,
                    "Most popular day: {} ({} trips)",
                    t.day_of_week.value,
                    self.count(t.day_of_week.count)
                )?;
                writeln!(
                    w,
                    "Most popular start hour: {} ({} trips)",
                    t.hour.value,
                    self.count(t.hour.count)
                )?;
            }
            None => writeln!(w, "{NO_DATA}")?,
        }
        writeln!(w, "{RULE}")
    }

    pub fn write_stations<W: Write>(
        &self,
        w: &mut W,
        stats: Option<&StationStats>,
    ) -> io::Result<()> {
        writeln!(w, "\nMost popular stations and trip\n")?;
        match stats {
            Some(s) => {
                writeln!(
                    w,
                    "Most common start station: {} ({} trips)",
                    s.start_station.value,
                    self.count(s.start_station.count)
                )?;
                writeln!(
                    w,
                    "Most common end station: {} ({} trips)",
                    s.end_station.value,
                    self.count(s.end_station.count)
                )?;
                writeln!(
                    w,
                    "Most frequent trip: {} -> {} ({} trips)",
                    s.trip.value.start,
                    s.trip.value.end,
                    self.count(s.trip.count)
                )?;
            }
            None => writeln!(w, "{NO_DATA}")?,
        }
        writeln!(w, "{RULE}")
    }

    pub fn write_durations<W: Write>(
        &self,
        w: &mut W,
        stats: Option<&DurationStats>,
    ) -> io::Result<()> {
        writeln!(w, "\nTrip duration\n")?;
        match stats {
            Some(d) if d.count == 0 => {
                writeln!(w, "No trip in this selection has a recorded duration.")?;
            }
            Some(d) => {
                writeln!(w, "Total travel time: {}", self.seconds(d.total))?;
                let fmt = |v: Option<f64>| {
                    v.map(|x| self.seconds(x))
                        .unwrap_or_else(|| "NA".into())
                };
                writeln!(w, "Average travel time: {}", fmt(d.mean))?;
                writeln!(w, "Shortest trip: {}", fmt(d.min))?;
                writeln!(w, "Longest trip: {}", fmt(d.max))?;
                if d.missing > 0 {
                    writeln!(
                        w,
                        "({} trips without a duration were left out)",
                        self.count(d.missing)
                    )?;
                }
            }
            None => writeln!(w, "{NO_DATA}")?,
        }
        writeln!(w, "{RULE}")
    }

    pub fn write_users<W: Write>(&self, w: &mut W, stats: Option<&UserStats>) -> io::Result<()> {
        writeln!(w, "\nUser stats\n")?;
        let Some(u) = stats else {
            writeln!(w, "{NO_DATA}")?;
            return writeln!(w, "{RULE}");
        };

        writeln!(w, "Counts of user types:")?;
        self.write_counts(w, &u.user_types)?;

        match &u.gender {
            Availability::Available(counts) => {
                writeln!(w, "\nCounts of gender:")?;
                self.write_counts(w, counts)?;
            }
            Availability::NoData => writeln!(w, "\nGender: no data for the selected filters")?,
            Availability::NotAvailable => writeln!(w, "\nGender: {NOT_AVAILABLE}")?,
        }

        match &u.birth_year {
            Availability::Available(BirthYearStats {
                earliest,
                most_recent,
                most_common,
            }) => {
                writeln!(w, "\nEarliest year of birth (oldest rider): {earliest}")?;
                writeln!(w, "Most recent year of birth (youngest rider): {most_recent}")?;
                writeln!(
                    w,
                    "Most common year of birth: {} ({} riders)",
                    most_common.value,
                    self.count(most_common.count)
                )?;
            }
            Availability::NoData => writeln!(w, "\nBirth year: no data for the selected filters")?,
            Availability::NotAvailable => writeln!(w, "\nBirth year: {NOT_AVAILABLE}")?,
        }
        writeln!(w, "{RULE}")
    }

    fn write_counts<W: Write>(&self, w: &mut W, counts: &[CategoryCount]) -> io::Result<()> {
        let width = counts.iter().map(|c| c.label.len()).max().unwrap_or(0);
        for c in counts {
            writeln!(w, "  {:<width$}  {}", c.label, self.count(c.count))?;
        }
        Ok(())
    }

    /// One page of raw records. `offset` is the position of the first record
    /// in the filtered view and is used for numbering.
    pub fn write_page<W: Write>(
        &self,
        w: &mut W,
        records: &[TripRecord],
        offset: usize,
        schema: SchemaVariant,
    ) -> io::Result<()> {
        for (i, t) in records.iter().enumerate() {
            writeln!(w, "[{}]", self.count(offset + i + 1))?;
            writeln!(w, "  Start Time:    {}", t.start_time())?;
            writeln!(w, "  End Time:      {}", opt(t.end_time))?;
            writeln!(
                w,
                "  Trip Duration: {}",
                t.trip_duration
                    .map(|d| self.decimal(d))
                    .unwrap_or_else(|| "NA".into())
            )?;
            writeln!(w, "  Start Station: {}", t.start_station)?;
            writeln!(w, "  End Station:   {}", t.end_station)?;
            writeln!(w, "  User Type:     {}", opt(t.user_type.as_deref()))?;
            if schema.has_rider_details() {
                writeln!(w, "  Gender:        {}", opt(t.gender.as_deref()))?;
                writeln!(w, "  Birth Year:    {}", opt(t.birth_year))?;
            }
        }
        Ok(())
    }
}

fn opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "NA".into())
}
