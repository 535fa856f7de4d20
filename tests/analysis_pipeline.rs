use bikeshare_rs::present::Presenter;
use bikeshare_rs::stats::Availability;
use bikeshare_rs::{City, Error, FilterSpec, Registry, analyze};
use std::fs;
use tempfile::{TempDir, tempdir};

const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1,2017-01-01 00:07:57,2017-01-01 00:20:53,776,Canal St & Adams St,Clinton St & Madison St,Subscriber,Male,1990.0
2,2017-01-01 05:10:00,2017-01-01 05:15:00,300,Canal St & Adams St,Clinton St & Madison St,Customer,Female,1985.0
3,2017-02-01 05:30:00,2017-02-01 05:40:00,,Wells St & Elm St,Canal St & Adams St,Subscriber,,
";

const WASHINGTON: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-03-03 08:00:00,2017-03-03 08:10:00,600.5,15th & P St NW,Lincoln Memorial,Subscriber
2017-03-04 09:00:00,2017-03-04 09:05:00,300,Lincoln Memorial,15th & P St NW,Customer
";

fn data_dir() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("chicago.csv"), CHICAGO).unwrap();
    fs::write(dir.path().join("washington.csv"), WASHINGTON).unwrap();
    dir
}

#[test]
fn analyze_filters_then_summarizes() {
    let dir = data_dir();
    let reg = Registry::new(dir.path());
    let spec = FilterSpec::parse("chicago", "january", "all").unwrap();
    let a = analyze(&reg, &spec).unwrap();

    assert_eq!(a.report.city, City::Chicago);
    assert_eq!(a.report.loaded, 3);
    assert_eq!(a.report.matched, 2);
    assert_eq!(a.trips.len(), 2);

    let time = a.report.time.as_ref().unwrap();
    assert_eq!(time.month.value, 1);
    assert_eq!(time.hour.value, 0);

    let durations = a.report.durations.as_ref().unwrap();
    assert_eq!(durations.total, 1076.0);
    assert_eq!(durations.missing, 0);

    let users = a.report.users.as_ref().unwrap();
    let years = users.birth_year.as_option().unwrap();
    assert_eq!((years.earliest, years.most_recent), (1985, 1990));
}

#[test]
fn empty_selection_reports_no_data() {
    let dir = data_dir();
    let reg = Registry::new(dir.path());
    let spec = FilterSpec::parse("chicago", "june", "all").unwrap();
    let a = analyze(&reg, &spec).unwrap();
    assert!(a.report.is_empty());
    assert_eq!(a.report.loaded, 3);
    assert!(a.report.time.is_none());
    assert!(a.report.stations.is_none());
    assert!(a.report.durations.is_none());
    assert!(a.report.users.is_none());

    let mut out = Vec::new();
    Presenter::default().write_report(&mut out, &a.report).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("No data for the selected filters.").count(), 4);
}

#[test]
fn base_schema_city_reports_not_available() {
    let dir = data_dir();
    let reg = Registry::new(dir.path());
    let spec = FilterSpec::parse("washington", "all", "all").unwrap();
    let a = analyze(&reg, &spec).unwrap();
    let users = a.report.users.as_ref().unwrap();
    assert_eq!(users.gender, Availability::NotAvailable);
    assert_eq!(users.user_types.len(), 2);

    let json = serde_json::to_value(&a.report).unwrap();
    assert_eq!(json["city"], "washington");
    assert_eq!(json["month"], "all");
    assert_eq!(json["users"]["gender"]["status"], "not_available");
    assert_eq!(json["time"]["day_of_week"]["value"], "Friday");

    let mut out = Vec::new();
    Presenter::default().write_report(&mut out, &a.report).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Gender: not available for this dataset"));
    assert!(text.contains("Birth year: not available for this dataset"));
    assert!(text.contains("Counts of user types:"));
}

#[test]
fn missing_dataset_is_a_load_error() {
    let dir = data_dir();
    let reg = Registry::new(dir.path());
    let spec = FilterSpec::parse("new york", "all", "all").unwrap();
    let err = analyze(&reg, &spec).unwrap_err();
    assert!(matches!(err, Error::Load { .. }), "{err:?}");
    assert!(err.to_string().contains("new_york_city.csv"));
}

#[test]
fn rendered_pages_show_rider_columns_only_for_full_schema() {
    let dir = data_dir();
    let reg = Registry::new(dir.path());
    let presenter = Presenter::default();

    let chicago = analyze(&reg, &FilterSpec::parse("chicago", "all", "all").unwrap()).unwrap();
    let mut out = Vec::new();
    presenter
        .write_page(&mut out, chicago.trips.records(), 0, chicago.trips.schema())
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("[3]"));
    assert!(text.contains("Birth Year:    1990"));
    assert!(text.contains("Trip Duration: NA"));

    let dc = analyze(&reg, &FilterSpec::parse("washington", "all", "all").unwrap()).unwrap();
    let mut out = Vec::new();
    presenter
        .write_page(&mut out, dc.trips.records(), 10, dc.trips.schema())
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("[11]"));
    assert!(!text.contains("Gender"));
}
