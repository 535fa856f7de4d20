use crate::analysis::Report;
use crate::models::TripCollection;
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn sanitize_cell(s: &str) -> String {
    if s.starts_with(['=', '+', '-', '@']) {
        format!("'{s}")
    } else {
        s.to_string()
    }
}

/// Save trips as CSV with the source column names.
///
/// `Gender` and `Birth Year` are only written for full-schema collections.
/// Text cells starting with `=`, `+`, `-` or `@` are written with a leading
/// `'`, so such values read back with the quote attached.
pub fn save_csv<P: AsRef<Path>>(trips: &TripCollection, path: P) -> Result<()> {
    let full = trips.schema().has_rider_details();
    let mut wtr = WriterBuilder::new().from_path(path)?;
    let mut header = vec![
        "Start Time",
        "End Time",
        "Trip Duration",
        "Start Station",
        "End Station",
        "User Type",
    ];
    if full {
        header.extend(["Gender", "Birth Year"]);
    }
    wtr.write_record(&header)?;

    for t in trips {
        let mut row = vec![
            t.start_time().format("%Y-%m-%d %H:%M:%S").to_string(),
            t.end_time
                .map(|e| e.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            t.trip_duration.map(|d| d.to_string()).unwrap_or_default(),
            sanitize_cell(&t.start_station),
            sanitize_cell(&t.end_station),
            sanitize_cell(t.user_type.as_deref().unwrap_or_default()),
        ];
        if full {
            row.push(sanitize_cell(t.gender.as_deref().unwrap_or_default()));
            row.push(t.birth_year.map(|y| y.to_string()).unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a report as pretty JSON.
pub fn save_json<P: AsRef<Path>>(report: &Report, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(report)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{City, FilterSpec, SchemaVariant, TripRecord};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn one_trip(schema: SchemaVariant) -> TripCollection {
        let start = NaiveDate::from_ymd_opt(2017, 3, 4)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let trip = TripRecord::new(start, "=HYPERLINK(\"x\")", "Canal St")
            .with_duration(600.0)
            .with_user_type("Subscriber")
            .with_gender("Female")
            .with_birth_year(1990);
        TripCollection::new(City::Chicago, schema, vec![trip])
    }

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let trips = one_trip(SchemaVariant::Full);
        let spec = FilterSpec::parse("chicago", "all", "all").unwrap();
        save_csv(&trips, &csvp).unwrap();
        save_json(&Report::compute(&spec, 1, &trips), &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());
    }

    #[test]
    fn base_schema_omits_rider_columns() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("base.csv");
        save_csv(&one_trip(SchemaVariant::Base), &csvp).unwrap();
        let text = std::fs::read_to_string(&csvp).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.ends_with("User Type"));
        assert!(!text.contains("Female"));
    }

    #[test]
    fn formula_cells_are_prefixed() {
        assert_eq!(sanitize_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(sanitize_cell("@foo"), "'@foo");
        assert_eq!(sanitize_cell("Canal St"), "Canal St");
    }
}
