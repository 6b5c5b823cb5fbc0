// Entity records behind the persistence store.
// Derived values (arrival, availability, average rating) live here as methods
// so the presentation layer never recomputes them differently per call site.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub location: String,
    #[serde(default = "default_star_rating")]
    pub star_rating: i32,
    #[serde(default)]
    pub amenities: String,
    pub price_per_night: f64,
    #[serde(default)]
    pub photo: Option<String>,
    /// Gallery image URLs stored as a JSON-encoded text blob.
    #[serde(default)]
    pub gallery: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub policies: Option<String>,
    #[serde(default)]
    pub landmarks: Option<String>,
}

fn default_star_rating() -> i32 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub hotel_id: u64,
    #[serde(rename = "type")]
    pub room_type: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default = "default_max_guests")]
    pub max_guests: u32,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_max_guests() -> u32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    #[serde(default)]
    pub id: u64,
    pub flight_number: String,
    pub airline: String,
    pub from_city: String,
    pub to_city: String,
    pub from_airport_code: String,
    pub to_airport_code: String,
    pub departure: DateTime<Utc>,
    /// Scheduled flight time in minutes.
    pub duration_minutes: i64,
    pub price: f64,
    pub seats_available: u32,
    pub flight_class: String,
    #[serde(default = "default_trip_type")]
    pub trip_type: String,
    /// "lat,lng" strings, auto-filled from the static city table on insert.
    #[serde(default)]
    pub from_coords: Option<String>,
    #[serde(default)]
    pub to_coords: Option<String>,
    #[serde(default)]
    pub destination_image: Option<String>,
}

fn default_trip_type() -> String {
    "round-trip".to_string()
}

impl Flight {
    pub fn arrival(&self) -> DateTime<Utc> {
        self.departure + Duration::minutes(self.duration_minutes)
    }

    pub fn is_available(&self) -> bool {
        self.is_available_at(Utc::now())
    }

    pub fn is_available_at(&self, now: DateTime<Utc>) -> bool {
        self.departure > now && self.seats_available > 0
    }

    /// Fills `from_coords`/`to_coords` from the static city table, falling back
    /// to the airport code; both left unset when neither matches.
    pub fn resolve_coords(&mut self) {
        if let Some(coords) = city_coords(&self.from_city).or_else(|| city_coords(&self.from_airport_code)) {
            self.from_coords = Some(format!("{},{}", coords[0], coords[1]));
        }
        if let Some(coords) = city_coords(&self.to_city).or_else(|| city_coords(&self.to_airport_code)) {
            self.to_coords = Some(format!("{},{}", coords[0], coords[1]));
        }
    }
}

/// Static city/airport -> [lat, lng] table used to derive flight coordinates.
pub const CITY_COORDS: &[(&str, [f64; 2])] = &[
    ("Delhi", [28.5562, 77.1000]),
    ("New Delhi", [28.5562, 77.1000]),
    ("DEL", [28.5562, 77.1000]),
    ("Mumbai", [19.0896, 72.8656]),
    ("Bombay", [19.0896, 72.8656]),
    ("BOM", [19.0896, 72.8656]),
    ("Bangalore", [13.1986, 77.7066]),
    ("Bengaluru", [13.1986, 77.7066]),
    ("BLR", [13.1986, 77.7066]),
    ("Chennai", [13.0827, 80.2707]),
    ("MAA", [13.0827, 80.2707]),
    ("Kolkata", [22.6520, 88.4463]),
    ("Calcutta", [22.6520, 88.4463]),
    ("CCU", [22.6520, 88.4463]),
    ("Hyderabad", [17.2403, 78.4294]),
    ("HYD", [17.2403, 78.4294]),
    ("Goa", [15.3803, 73.8352]),
    ("GOI", [15.3803, 73.8352]),
    ("Jaipur", [26.8288, 75.8093]),
    ("JAI", [26.8288, 75.8093]),
    ("Amritsar", [31.6340, 74.8723]),
    ("ATQ", [31.6340, 74.8723]),
    ("Ludhiana", [30.9010, 75.8573]),
    ("LUH", [30.9010, 75.8573]),
    ("Chandigarh", [30.7333, 76.7794]),
    ("IXC", [30.7333, 76.7794]),
    ("Jalandhar", [31.3260, 75.5762]),
    ("JUC", [31.3260, 75.5762]),
    ("Patiala", [30.3398, 76.3869]),
    ("IXP", [30.3398, 76.3869]),
];

pub fn city_coords(key: &str) -> Option<[f64; 2]> {
    CITY_COORDS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, coords)| *coords)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub category: String,
    /// Number of days.
    pub duration: u32,
    /// Free text or a JSON-encoded list; normalized at presentation time.
    #[serde(default)]
    pub inclusions: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub coords: Option<Coords>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Parent record a review is attached to. Reviews are cascade-deleted with
/// their parent but only weakly reference their author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewTarget {
    Hotel(u64),
    Flight(u64),
    Package(u64),
    Destination(u64),
}

impl ReviewTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            ReviewTarget::Hotel(_) => "hotel",
            ReviewTarget::Flight(_) => "flight",
            ReviewTarget::Package(_) => "package",
            ReviewTarget::Destination(_) => "destination",
        }
    }

    pub fn parent_id(&self) -> u64 {
        match self {
            ReviewTarget::Hotel(id)
            | ReviewTarget::Flight(id)
            | ReviewTarget::Package(id)
            | ReviewTarget::Destination(id) => *id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub id: u64,
    pub target: ReviewTarget,
    pub user_id: u64,
    pub rating: u8,
    #[serde(default)]
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default)]
    pub id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub flight_id: Option<u64>,
    #[serde(default)]
    pub hotel_id: Option<u64>,
    #[serde(default)]
    pub package_id: Option<u64>,
    #[serde(default = "Utc::now")]
    pub booking_date: DateTime<Utc>,
    #[serde(default = "default_booking_status")]
    pub status: String,
}

fn default_booking_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub password_hash: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub otp_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_flight() -> Flight {
        Flight {
            id: 1,
            flight_number: "AI101".to_string(),
            airline: "Air India".to_string(),
            from_city: "Mumbai".to_string(),
            to_city: "Delhi".to_string(),
            from_airport_code: "BOM".to_string(),
            to_airport_code: "DEL".to_string(),
            departure: Utc.with_ymd_and_hms(2026, 9, 1, 6, 30, 0).unwrap(),
            duration_minutes: 135,
            price: 5400.0,
            seats_available: 42,
            flight_class: "Economy".to_string(),
            trip_type: "round-trip".to_string(),
            from_coords: None,
            to_coords: None,
            destination_image: None,
        }
    }

    #[test]
    fn test_arrival_is_departure_plus_duration() {
        let flight = sample_flight();
        assert_eq!(
            flight.arrival(),
            flight.departure + Duration::minutes(flight.duration_minutes)
        );
        assert_eq!(
            flight.arrival(),
            Utc.with_ymd_and_hms(2026, 9, 1, 8, 45, 0).unwrap()
        );
    }

    #[test]
    fn test_availability_boundary() {
        let flight = sample_flight();

        // Strictly after departure counts as unavailable, exactly at departure too.
        assert!(flight.is_available_at(flight.departure - Duration::seconds(1)));
        assert!(!flight.is_available_at(flight.departure));
        assert!(!flight.is_available_at(flight.departure + Duration::seconds(1)));

        let mut sold_out = sample_flight();
        sold_out.seats_available = 0;
        assert!(!sold_out.is_available_at(sold_out.departure - Duration::hours(1)));
    }

    #[test]
    fn test_coords_resolved_from_city_name() {
        let mut flight = sample_flight();
        flight.resolve_coords();
        assert_eq!(flight.from_coords.as_deref(), Some("19.0896,72.8656"));
        assert_eq!(flight.to_coords.as_deref(), Some("28.5562,77.1"));
    }

    #[test]
    fn test_coords_fall_back_to_airport_code() {
        let mut flight = sample_flight();
        flight.from_city = "Navi Mumbai".to_string();
        flight.resolve_coords();
        // City miss, airport code BOM still resolves.
        assert_eq!(flight.from_coords.as_deref(), Some("19.0896,72.8656"));
    }

    #[test]
    fn test_coords_left_unset_when_nothing_matches() {
        let mut flight = sample_flight();
        flight.from_city = "Atlantis".to_string();
        flight.from_airport_code = "XXX".to_string();
        flight.resolve_coords();
        assert!(flight.from_coords.is_none());
        assert!(flight.to_coords.is_some());
    }
}
