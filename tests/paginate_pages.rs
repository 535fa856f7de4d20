use bikeshare_rs::models::{City, SchemaVariant, TripCollection, TripRecord};
use bikeshare_rs::paginate::{PAGE_SIZE, page, pages};
use chrono::NaiveDate;

fn seven() -> TripCollection {
    let records = (0..7)
        .map(|i| {
            let start = NaiveDate::from_ymd_opt(2017, 4, 1 + i)
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap();
            TripRecord::new(start, format!("S{i}"), "E")
        })
        .collect();
    TripCollection::new(City::NewYork, SchemaVariant::Full, records)
}

fn labels(records: &[TripRecord]) -> Vec<&str> {
    records.iter().map(|t| t.start_station.as_str()).collect()
}

#[test]
fn first_page_is_full() {
    let trips = seven();
    assert_eq!(PAGE_SIZE, 5);
    assert_eq!(labels(page(&trips, 0)), ["S0", "S1", "S2", "S3", "S4"]);
}

#[test]
fn last_page_is_short() {
    let trips = seven();
    assert_eq!(labels(page(&trips, 5)), ["S5", "S6"]);
    assert_eq!(labels(page(&trips, 3)), ["S3", "S4", "S5", "S6"]);
}

#[test]
fn out_of_range_offsets_are_empty() {
    let trips = seven();
    assert!(page(&trips, 7).is_empty());
    assert!(page(&trips, 1_000).is_empty());
    assert!(page(&trips, usize::MAX).is_empty());
    let empty = TripCollection::new(City::NewYork, SchemaVariant::Base, vec![]);
    assert!(page(&empty, 0).is_empty());
}

#[test]
fn pages_cover_the_collection_in_order() {
    let trips = seven();
    let sizes: Vec<usize> = pages(&trips).map(<[TripRecord]>::len).collect();
    assert_eq!(sizes, [5, 2]);
    let flat: Vec<&str> = pages(&trips).flat_map(labels).collect();
    assert_eq!(flat, labels(trips.records()));
}
