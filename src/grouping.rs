// Flight grouping presenter: buckets an adapted, departure-ascending flight
// list by calendar date for display.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::presenter::FlightView;

#[derive(Debug, Clone, Serialize)]
pub struct FlightDateGroup {
    /// ISO calendar date, e.g. "2026-09-01".
    pub date: String,
    /// Full human-readable form, e.g. "Tuesday, September 01, 2026".
    pub display_date: String,
    pub flights_count: usize,
    pub flights: Vec<FlightView>,
}

/// Groups flights by departure date. Groups come out ascending by date and
/// each group preserves the relative order of its flights; dates with no
/// flights never appear.
pub fn group_flights_by_date(flights: Vec<FlightView>) -> Vec<FlightDateGroup> {
    let mut buckets: BTreeMap<NaiveDate, Vec<FlightView>> = BTreeMap::new();
    for flight in flights {
        buckets
            .entry(flight.departure.date_naive())
            .or_default()
            .push(flight);
    }

    buckets
        .into_iter()
        .map(|(date, flights)| FlightDateGroup {
            date: date.format("%Y-%m-%d").to_string(),
            display_date: date.format("%A, %B %d, %Y").to_string(),
            flights_count: flights.len(),
            flights,
        })
        .collect()
}
