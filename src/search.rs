// Filter/search engine: global multi-entity keyword search and the filtered,
// date-bucketed flight listing.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::grouping::{group_flights_by_date, FlightDateGroup};
use crate::models::Flight;
use crate::presenter::{
    flight_view_at, DestinationView, FlightView, HotelView, MediaContext, PackageView, Presenter,
};
use crate::store::TravelStore;

/// Flights that departed more than this many hours ago fall out of listings.
pub const VISIBILITY_WINDOW_HOURS: i64 = 24;

/// Optional filters for the flight listing. City filters match
/// case-insensitive substrings; departure_date must be an exact `YYYY-MM-DD`
/// calendar date and is silently ignored when unparseable; flight_class is an
/// exact match. Empty strings count as absent filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightFilters {
    pub from_city: Option<String>,
    pub to_city: Option<String>,
    pub departure_date: Option<String>,
    pub flight_class: Option<String>,
}

/// Result of a global search. All four buckets are always present, each in the
/// store's natural (id-ascending) order.
#[derive(Debug, Default, Serialize)]
pub struct SearchResults {
    pub hotels: Vec<HotelView>,
    pub packages: Vec<PackageView>,
    pub destinations: Vec<DestinationView>,
    pub flights: Vec<FlightView>,
}

pub struct SearchEngine {
    store: Arc<TravelStore>,
    presenter: Presenter,
}

impl SearchEngine {
    pub fn new(store: Arc<TravelStore>) -> Self {
        let presenter = Presenter::new(Arc::clone(&store));
        Self { store, presenter }
    }

    /// Case-insensitive substring search over hotel/package/destination names
    /// and six flight fields. An empty or whitespace-only query short-circuits
    /// to empty buckets.
    pub fn search(&self, query: &str, ctx: &MediaContext) -> SearchResults {
        let query = query.trim();
        if query.is_empty() {
            return SearchResults::default();
        }
        let needle = query.to_lowercase();
        let matches = |field: &str| field.to_lowercase().contains(&needle);

        SearchResults {
            hotels: self
                .store
                .hotels()
                .iter()
                .filter(|hotel| matches(&hotel.name))
                .map(|hotel| self.presenter.hotel(hotel, ctx))
                .collect(),
            packages: self
                .store
                .packages()
                .iter()
                .filter(|package| matches(&package.name))
                .map(|package| self.presenter.package(package, ctx))
                .collect(),
            destinations: self
                .store
                .destinations()
                .iter()
                .filter(|destination| matches(&destination.name))
                .map(|destination| self.presenter.destination(destination, ctx))
                .collect(),
            flights: self
                .store
                .flights()
                .iter()
                .filter(|flight| {
                    matches(&flight.from_city)
                        || matches(&flight.to_city)
                        || matches(&flight.from_airport_code)
                        || matches(&flight.to_airport_code)
                        || matches(&flight.flight_number)
                        || matches(&flight.airline)
                })
                .map(|flight| self.presenter.flight(flight, ctx))
                .collect(),
        }
    }

    /// Filtered flight listing, grouped by departure date.
    pub fn list_flights(&self, filters: &FlightFilters, ctx: &MediaContext) -> Vec<FlightDateGroup> {
        self.list_flights_at(filters, Utc::now(), ctx)
    }

    pub fn list_flights_at(
        &self,
        filters: &FlightFilters,
        now: DateTime<Utc>,
        ctx: &MediaContext,
    ) -> Vec<FlightDateGroup> {
        let cutoff = now - Duration::hours(VISIBILITY_WINDOW_HOURS);
        let exact_date = filters
            .departure_date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());

        let mut flights: Vec<Flight> = self
            .store
            .flights()
            .into_iter()
            .filter(|flight| flight.departure >= cutoff)
            .filter(|flight| Self::city_matches(filters.from_city.as_deref(), &flight.from_city))
            .filter(|flight| Self::city_matches(filters.to_city.as_deref(), &flight.to_city))
            .filter(|flight| match exact_date {
                Some(date) => flight.departure.date_naive() == date,
                None => true,
            })
            .filter(|flight| match filters.flight_class.as_deref() {
                Some(class) if !class.is_empty() => flight.flight_class == class,
                _ => true,
            })
            .collect();
        flights.sort_by(|a, b| a.departure.cmp(&b.departure).then(a.id.cmp(&b.id)));

        let views: Vec<FlightView> = flights
            .iter()
            .map(|flight| flight_view_at(flight, ctx, now))
            .collect();
        group_flights_by_date(views)
    }

    fn city_matches(filter: Option<&str>, city: &str) -> bool {
        match filter {
            Some(wanted) if !wanted.is_empty() => {
                city.to_lowercase().contains(&wanted.to_lowercase())
            }
            _ => true,
        }
    }
}
