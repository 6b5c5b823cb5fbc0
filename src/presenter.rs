// Presentation adapter: stored entity -> external representation.
// All computed fields are explicit pure functions of the entity plus an
// optional request context; a failure to derive any field resolves to a
// neutral empty value and never aborts the response.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    Booking, Coords, Destination, Flight, Hotel, Package, Review, ReviewTarget, Room, User,
};
use crate::store::TravelStore;

/// Request context supplying the optional "build absolute URL" capability.
/// Without a base URL the stored relative path is passed through unchanged.
#[derive(Debug, Clone, Default)]
pub struct MediaContext {
    pub base_url: Option<String>,
}

impl MediaContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_base(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
        }
    }

    /// Resolves a stored media reference. Missing or blank references resolve
    /// to None rather than an error; already-absolute URLs pass through.
    pub fn resolve(&self, stored: Option<&str>) -> Option<String> {
        let path = stored?.trim();
        if path.is_empty() {
            return None;
        }
        if path.starts_with("http://") || path.starts_with("https://") {
            return Some(path.to_string());
        }
        match &self.base_url {
            Some(base) => Some(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            )),
            None => Some(path.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewAuthor {
    pub id: u64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub id: u64,
    /// None when the author account has since been deleted.
    pub user: Option<ReviewAuthor>,
    pub rating: u8,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomView {
    pub id: u64,
    #[serde(rename = "type")]
    pub room_type: String,
    pub description: String,
    pub price: f64,
    pub max_guests: u32,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HotelView {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub star_rating: i32,
    pub price_per_night: f64,
    pub photo: Option<String>,
    pub gallery: Option<String>,
    pub reviews: Vec<ReviewView>,
    pub rooms: Vec<RoomView>,
    pub average_rating: Option<f64>,
    pub total_reviews: usize,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub policies: Option<String>,
    pub amenities: String,
    pub landmarks: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlightView {
    pub id: u64,
    #[serde(rename = "flightNumber")]
    pub flight_number: String,
    pub airline: String,
    pub from_location: String,
    pub to_location: String,
    pub from_airport_code: String,
    pub to_airport_code: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    /// Minutes.
    pub duration: i64,
    pub duration_hours: String,
    pub price: f64,
    pub seats_available: u32,
    pub flight_class: String,
    pub trip_type: String,
    pub from_coords: Option<[f64; 2]>,
    pub to_coords: Option<[f64; 2]>,
    pub is_available: bool,
    pub destination_image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageView {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub duration: u32,
    pub inclusions: Vec<String>,
    pub price: f64,
    pub description: String,
    pub photo: Option<String>,
    pub rating: f64,
    #[serde(rename = "originalPrice")]
    pub original_price: Option<f64>,
    #[serde(rename = "shortDescription")]
    pub short_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DestinationView {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub gallery: Vec<String>,
    pub coords: Option<Coords>,
    pub features: Vec<String>,
    pub reviews: Vec<ReviewView>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub id: u64,
    pub user: u64,
    pub flight: Option<u64>,
    pub hotel: Option<u64>,
    pub package: Option<u64>,
    pub booking_date: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_verified: bool,
}

/// Until packages collect enough reviews for a real aggregate, listings show
/// this placeholder rating.
pub const PACKAGE_PLACEHOLDER_RATING: f64 = 4.5;

const SHORT_DESCRIPTION_CHARS: usize = 100;

pub fn format_duration_hours(minutes: i64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Parses a stored "lat,lng" string; malformed or absent input yields None.
pub fn parse_coords(stored: Option<&str>) -> Option<[f64; 2]> {
    let (lat, lng) = stored?.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    Some([lat, lng])
}

/// Normalizes the inclusions text: JSON-encoded lists decode directly, any
/// other content is treated as comma-separated, trimmed, with empty segments
/// dropped.
pub fn normalize_inclusions(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
        return list;
    }
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn short_description(description: &str) -> String {
    let prefix: String = description.chars().take(SHORT_DESCRIPTION_CHARS).collect();
    if description.chars().count() > SHORT_DESCRIPTION_CHARS {
        format!("{}...", prefix)
    } else {
        prefix
    }
}

fn average_rating(reviews: &[ReviewView]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    Some(f64::from(total) / reviews.len() as f64)
}

pub fn review_view(review: &Review, author: Option<&User>) -> ReviewView {
    ReviewView {
        id: review.id,
        user: author.map(|user| ReviewAuthor {
            id: user.id,
            username: user.username.clone(),
        }),
        rating: review.rating,
        text: review.text.clone(),
        created_at: review.created_at,
    }
}

pub fn room_view(room: &Room, ctx: &MediaContext) -> RoomView {
    RoomView {
        id: room.id,
        room_type: room.room_type.clone(),
        description: room.description.clone(),
        price: room.price,
        max_guests: room.max_guests,
        image: ctx.resolve(room.image.as_deref()),
    }
}

pub fn hotel_view(
    hotel: &Hotel,
    rooms: &[Room],
    reviews: Vec<ReviewView>,
    ctx: &MediaContext,
) -> HotelView {
    HotelView {
        id: hotel.id,
        name: hotel.name.clone(),
        description: hotel.description.clone(),
        location: hotel.location.clone(),
        star_rating: hotel.star_rating,
        price_per_night: hotel.price_per_night,
        photo: ctx.resolve(hotel.photo.as_deref()),
        gallery: hotel.gallery.clone(),
        rooms: rooms.iter().map(|room| room_view(room, ctx)).collect(),
        average_rating: average_rating(&reviews),
        total_reviews: reviews.len(),
        reviews,
        email: hotel.email.clone(),
        phone: hotel.phone.clone(),
        website: hotel.website.clone(),
        policies: hotel.policies.clone(),
        amenities: hotel.amenities.clone(),
        landmarks: hotel.landmarks.clone(),
    }
}

pub fn flight_view(flight: &Flight, ctx: &MediaContext) -> FlightView {
    flight_view_at(flight, ctx, Utc::now())
}

pub fn flight_view_at(flight: &Flight, ctx: &MediaContext, now: DateTime<Utc>) -> FlightView {
    FlightView {
        id: flight.id,
        flight_number: flight.flight_number.clone(),
        airline: flight.airline.clone(),
        from_location: flight.from_city.clone(),
        to_location: flight.to_city.clone(),
        from_airport_code: flight.from_airport_code.clone(),
        to_airport_code: flight.to_airport_code.clone(),
        departure: flight.departure,
        arrival: flight.arrival(),
        duration: flight.duration_minutes,
        duration_hours: format_duration_hours(flight.duration_minutes),
        price: flight.price,
        seats_available: flight.seats_available,
        flight_class: flight.flight_class.clone(),
        trip_type: flight.trip_type.clone(),
        from_coords: parse_coords(flight.from_coords.as_deref()),
        to_coords: parse_coords(flight.to_coords.as_deref()),
        is_available: flight.is_available_at(now),
        destination_image: ctx.resolve(flight.destination_image.as_deref()),
    }
}

pub fn package_view(package: &Package, ctx: &MediaContext) -> PackageView {
    PackageView {
        id: package.id,
        name: package.name.clone(),
        category: package.category.clone(),
        duration: package.duration,
        inclusions: normalize_inclusions(&package.inclusions),
        price: package.price,
        description: package.description.clone(),
        photo: ctx.resolve(package.photo.as_deref()),
        rating: PACKAGE_PLACEHOLDER_RATING,
        original_price: if package.price > 0.0 {
            Some(package.price * 1.1)
        } else {
            None
        },
        short_description: short_description(&package.description),
    }
}

pub fn destination_view(
    destination: &Destination,
    reviews: Vec<ReviewView>,
    ctx: &MediaContext,
) -> DestinationView {
    DestinationView {
        id: destination.id,
        name: destination.name.clone(),
        description: destination.description.clone(),
        image: ctx.resolve(destination.image.as_deref()),
        gallery: destination.gallery.clone(),
        coords: destination.coords,
        features: destination.features.clone(),
        rating: average_rating(&reviews),
        reviews,
    }
}

pub fn booking_view(booking: &Booking) -> BookingView {
    BookingView {
        id: booking.id,
        user: booking.user_id,
        flight: booking.flight_id,
        hotel: booking.hotel_id,
        package: booking.package_id,
        booking_date: booking.booking_date,
        status: booking.status.clone(),
    }
}

pub fn user_view(user: &User) -> UserView {
    UserView {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        phone: user.phone.clone(),
        is_verified: user.is_verified,
    }
}

/// Assembles views that need related records (rooms, reviews, authors) from
/// the store. The per-entity adapters above stay pure; this is the only place
/// that touches persistence.
pub struct Presenter {
    store: Arc<TravelStore>,
}

impl Presenter {
    pub fn new(store: Arc<TravelStore>) -> Self {
        Self { store }
    }

    pub fn review_views(&self, target: ReviewTarget) -> Vec<ReviewView> {
        self.store
            .reviews_for(target)
            .iter()
            .map(|review| review_view(review, self.store.user(review.user_id).as_ref()))
            .collect()
    }

    pub fn hotel(&self, hotel: &Hotel, ctx: &MediaContext) -> HotelView {
        let rooms = self.store.rooms_for_hotel(hotel.id);
        let reviews = self.review_views(ReviewTarget::Hotel(hotel.id));
        hotel_view(hotel, &rooms, reviews, ctx)
    }

    pub fn destination(&self, destination: &Destination, ctx: &MediaContext) -> DestinationView {
        let reviews = self.review_views(ReviewTarget::Destination(destination.id));
        destination_view(destination, reviews, ctx)
    }

    pub fn flight(&self, flight: &Flight, ctx: &MediaContext) -> FlightView {
        flight_view(flight, ctx)
    }

    pub fn package(&self, package: &Package, ctx: &MediaContext) -> PackageView {
        package_view(package, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn package(description: &str, inclusions: &str, price: f64) -> Package {
        Package {
            id: 7,
            name: "Kerala Backwaters".to_string(),
            category: "Beaches".to_string(),
            duration: 5,
            inclusions: inclusions.to_string(),
            price,
            description: description.to_string(),
            photo: None,
        }
    }

    #[test]
    fn test_inclusions_comma_split() {
        let view = package_view(
            &package("", "Breakfast, WiFi, Pool", 100.0),
            &MediaContext::none(),
        );
        assert_eq!(view.inclusions, vec!["Breakfast", "WiFi", "Pool"]);
    }

    #[test]
    fn test_inclusions_json_list_decodes_directly() {
        let view = package_view(
            &package("", r#"["Breakfast", "Airport pickup"]"#, 100.0),
            &MediaContext::none(),
        );
        assert_eq!(view.inclusions, vec!["Breakfast", "Airport pickup"]);
    }

    #[test]
    fn test_inclusions_empty_and_dangling_commas() {
        let view = package_view(&package("", " , Breakfast,, ", 100.0), &MediaContext::none());
        assert_eq!(view.inclusions, vec!["Breakfast"]);
        let view = package_view(&package("", "", 100.0), &MediaContext::none());
        assert!(view.inclusions.is_empty());
    }

    #[test]
    fn test_short_description_truncates_at_100_chars() {
        let long = "x".repeat(150);
        let view = package_view(&package(&long, "", 100.0), &MediaContext::none());
        assert_eq!(view.short_description.chars().count(), 103);
        assert!(view.short_description.ends_with("..."));
        assert_eq!(&view.short_description[..100], &long[..100]);

        let short = "a pleasant trip";
        let view = package_view(&package(short, "", 100.0), &MediaContext::none());
        assert_eq!(view.short_description, short);

        let view = package_view(&package("", "", 100.0), &MediaContext::none());
        assert_eq!(view.short_description, "");
    }

    #[test]
    fn test_original_price_markup() {
        let view = package_view(&package("", "", 42000.0), &MediaContext::none());
        assert_eq!(view.original_price, Some(42000.0 * 1.1));
        let view = package_view(&package("", "", 0.0), &MediaContext::none());
        assert_eq!(view.original_price, None);
        assert_eq!(view.rating, PACKAGE_PLACEHOLDER_RATING);
    }

    #[test]
    fn test_parse_coords_handles_malformed_input() {
        assert_eq!(parse_coords(Some("19.0896,72.8656")), Some([19.0896, 72.8656]));
        assert_eq!(parse_coords(Some(" 19.0 , 72.8 ")), Some([19.0, 72.8]));
        assert_eq!(parse_coords(Some("not,numbers")), None);
        assert_eq!(parse_coords(Some("19.0896")), None);
        assert_eq!(parse_coords(Some("")), None);
        assert_eq!(parse_coords(None), None);
    }

    #[test]
    fn test_duration_hours_formatting() {
        assert_eq!(format_duration_hours(135), "2h 15m");
        assert_eq!(format_duration_hours(60), "1h 0m");
        assert_eq!(format_duration_hours(45), "0h 45m");
    }

    #[test]
    fn test_media_resolution() {
        let ctx = MediaContext::with_base("https://api.example.com/");
        assert_eq!(
            ctx.resolve(Some("media/hotel.jpg")),
            Some("https://api.example.com/media/hotel.jpg".to_string())
        );
        assert_eq!(
            ctx.resolve(Some("https://cdn.example.com/x.jpg")),
            Some("https://cdn.example.com/x.jpg".to_string())
        );
        assert_eq!(ctx.resolve(Some("  ")), None);
        assert_eq!(ctx.resolve(None), None);

        let bare = MediaContext::none();
        assert_eq!(bare.resolve(Some("media/hotel.jpg")), Some("media/hotel.jpg".to_string()));
    }

    #[test]
    fn test_hotel_without_reviews_has_null_rating() {
        let hotel = Hotel {
            id: 1,
            name: "Sea Breeze".to_string(),
            location: "Goa".to_string(),
            star_rating: 4,
            amenities: String::new(),
            price_per_night: 8000.0,
            photo: None,
            gallery: None,
            description: String::new(),
            email: None,
            phone: None,
            website: None,
            policies: None,
            landmarks: None,
        };
        let view = hotel_view(&hotel, &[], Vec::new(), &MediaContext::none());
        assert_eq!(view.average_rating, None);
        assert_eq!(view.total_reviews, 0);
    }

    #[test]
    fn test_flight_view_computed_fields() {
        let mut flight = Flight {
            id: 3,
            flight_number: "AI101".to_string(),
            airline: "Air India".to_string(),
            from_city: "Mumbai".to_string(),
            to_city: "Delhi".to_string(),
            from_airport_code: "BOM".to_string(),
            to_airport_code: "DEL".to_string(),
            departure: Utc::now() + Duration::hours(6),
            duration_minutes: 135,
            price: 5400.0,
            seats_available: 3,
            flight_class: "Economy".to_string(),
            trip_type: "round-trip".to_string(),
            from_coords: None,
            to_coords: None,
            destination_image: None,
        };
        flight.resolve_coords();

        let view = flight_view(&flight, &MediaContext::none());
        assert_eq!(view.arrival, flight.departure + Duration::minutes(135));
        assert_eq!(view.duration_hours, "2h 15m");
        assert_eq!(view.from_coords, Some([19.0896, 72.8656]));
        assert!(view.is_available);

        // Malformed stored coords degrade to None instead of failing.
        flight.to_coords = Some("garbage".to_string());
        let view = flight_view(&flight, &MediaContext::none());
        assert_eq!(view.to_coords, None);
    }
}
