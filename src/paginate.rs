use crate::models::{TripCollection, TripRecord};

/// Records shown per page of raw data.
pub const PAGE_SIZE: usize = 5;

/// Window of at most [`PAGE_SIZE`] records starting at `offset`.
///
/// Offsets past the end give a shorter or empty slice rather than an error.
pub fn page(trips: &TripCollection, offset: usize) -> &[TripRecord] {
    let records = trips.records();
    let start = offset.min(records.len());
    let end = offset.saturating_add(PAGE_SIZE).min(records.len());
    &records[start..end]
}

/// All pages in order.
pub fn pages(trips: &TripCollection) -> std::slice::Chunks<'_, TripRecord> {
    trips.records().chunks(PAGE_SIZE)
}
