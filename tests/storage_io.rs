use bikeshare_rs::models::{City, FilterSpec, SchemaVariant, TripCollection, TripRecord};
use bikeshare_rs::{Report, storage};
use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;

fn sample(n: u32) -> TripCollection {
    let records = (0..n)
        .map(|i| {
            let start = NaiveDate::from_ymd_opt(2017, 5, 1 + i)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap();
            TripRecord::new(start, "Broadway & W 60 St", "9 Ave & W 45 St")
                .with_duration(100.0 + i as f64)
                .with_user_type("Subscriber")
                .with_gender("Male")
                .with_birth_year(1980 + i as i32)
        })
        .collect();
    TripCollection::new(City::NewYork, SchemaVariant::Full, records)
}

#[test]
fn save_csv_and_json() {
    let trips = sample(3);
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join("trips.csv");
    storage::save_csv(&trips, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("Start Time,End Time,Trip Duration,"));
    assert_eq!(csv_txt.lines().count(), 1 + trips.len());

    let spec = FilterSpec::parse("new york", "may", "all").unwrap();
    let json_path = dir.path().join("report.json");
    storage::save_json(&Report::compute(&spec, 3, &trips), &json_path).unwrap();
    let json_txt = fs::read_to_string(&json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json_txt).unwrap();
    assert_eq!(v["matched"], 3);
    assert_eq!(v["month"], "may");
    assert_eq!(v["durations"]["total"], 303.0);
    assert_eq!(v["users"]["birth_year"]["value"]["earliest"], 1980);
}

// None of the sample's text cells needs a formula prefix.
#[test]
fn saved_csv_loads_back_when_no_cell_is_prefixed() {
    let trips = sample(4);
    let dir = tempdir().unwrap();
    let path = dir.path().join("new_york_city.csv");
    storage::save_csv(&trips, &path).unwrap();

    let back = bikeshare_rs::loader::load_city(
        &bikeshare_rs::Registry::new(dir.path()),
        City::NewYork,
    )
    .unwrap();
    assert_eq!(back.schema(), SchemaVariant::Full);
    assert_eq!(back.records(), trips.records());
}

// Station names that start like a spreadsheet formula get a leading quote.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let start = NaiveDate::from_ymd_opt(2017, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let trips = TripCollection::new(
        City::Chicago,
        SchemaVariant::Base,
        vec![
            TripRecord::new(start, "=HYPERLINK(\"http://evil\")", "@foo")
                .with_user_type("+SUM(A1:A9)"),
        ],
    );
    let dir = tempdir().unwrap();
    let path = dir.path().join("injection.csv");
    storage::save_csv(&trips, &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let row = rdr.records().next().expect("one data row expected").unwrap();
    let cell = |name: &str| {
        let idx = headers.iter().position(|h| h == name).expect("header present");
        row.get(idx).unwrap().to_string()
    };

    assert_eq!(cell("Start Station"), "'=HYPERLINK(\"http://evil\")");
    assert_eq!(cell("End Station"), "'@foo");
    assert_eq!(cell("User Type"), "'+SUM(A1:A9)");
}

#[test]
fn prefixed_cells_keep_the_quote_when_loaded_back() {
    let start = NaiveDate::from_ymd_opt(2017, 2, 3)
        .unwrap()
        .and_hms_opt(7, 30, 0)
        .unwrap();
    let trips = TripCollection::new(
        City::Washington,
        SchemaVariant::Base,
        vec![
            TripRecord::new(start, "-Lake Shore", "Union Station")
                .with_duration(420.0)
                .with_user_type("Subscriber"),
        ],
    );
    let dir = tempdir().unwrap();
    storage::save_csv(&trips, dir.path().join("washington.csv")).unwrap();

    let back = bikeshare_rs::loader::load_city(
        &bikeshare_rs::Registry::new(dir.path()),
        City::Washington,
    )
    .unwrap();
    let trip = &back.records()[0];
    assert_eq!(trip.start_station, "'-Lake Shore");
    assert_eq!(trip.end_station, "Union Station");
    assert_eq!(trip.trip_duration, Some(420.0));
    assert_ne!(back.records(), trips.records());
}
