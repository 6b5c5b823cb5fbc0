// In-memory persistence store.
// Collections are sharded maps keyed by id; reads return clones sorted by id
// so listing order is stable within a query. Single-record inserts/updates are
// atomic per entry; cross-record invariants (cascades, nulling booking
// references) are applied here and nowhere else.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::models::{
    Booking, Destination, Flight, Hotel, Package, Review, ReviewTarget, Room, User,
};

#[derive(Default)]
pub struct TravelStore {
    hotels: DashMap<u64, Hotel>,
    rooms: DashMap<u64, Room>,
    flights: DashMap<u64, Flight>,
    packages: DashMap<u64, Package>,
    destinations: DashMap<u64, Destination>,
    reviews: DashMap<u64, Review>,
    bookings: DashMap<u64, Booking>,
    users: DashMap<u64, User>,
    next_id: AtomicU64,
}

impl TravelStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn sorted_by_id<T: Clone>(map: &DashMap<u64, T>) -> Vec<T> {
        let mut entries: Vec<(u64, T)> = map
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, value)| value).collect()
    }

    // ----- hotels -----

    pub fn insert_hotel(&self, mut hotel: Hotel) -> Hotel {
        hotel.id = self.allocate_id();
        self.hotels.insert(hotel.id, hotel.clone());
        hotel
    }

    pub fn hotel(&self, id: u64) -> Option<Hotel> {
        self.hotels.get(&id).map(|entry| entry.clone())
    }

    pub fn hotels(&self) -> Vec<Hotel> {
        Self::sorted_by_id(&self.hotels)
    }

    /// Removes the hotel, its rooms and reviews, and nulls any booking
    /// references to it.
    pub fn delete_hotel(&self, id: u64) -> bool {
        let removed = self.hotels.remove(&id).is_some();
        if removed {
            self.rooms.retain(|_, room| room.hotel_id != id);
            self.reviews
                .retain(|_, review| review.target != ReviewTarget::Hotel(id));
            for mut booking in self.bookings.iter_mut() {
                if booking.hotel_id == Some(id) {
                    booking.hotel_id = None;
                }
            }
        }
        removed
    }

    // ----- rooms -----

    pub fn insert_room(&self, mut room: Room) -> Room {
        room.id = self.allocate_id();
        self.rooms.insert(room.id, room.clone());
        room
    }

    pub fn rooms_for_hotel(&self, hotel_id: u64) -> Vec<Room> {
        let mut rooms: Vec<Room> = self
            .rooms
            .iter()
            .filter(|entry| entry.hotel_id == hotel_id)
            .map(|entry| entry.clone())
            .collect();
        rooms.sort_by_key(|room| room.id);
        rooms
    }

    // ----- flights -----

    pub fn insert_flight(&self, mut flight: Flight) -> Flight {
        flight.resolve_coords();
        flight.id = self.allocate_id();
        self.flights.insert(flight.id, flight.clone());
        flight
    }

    pub fn flight(&self, id: u64) -> Option<Flight> {
        self.flights.get(&id).map(|entry| entry.clone())
    }

    pub fn flights(&self) -> Vec<Flight> {
        Self::sorted_by_id(&self.flights)
    }

    pub fn delete_flight(&self, id: u64) -> bool {
        let removed = self.flights.remove(&id).is_some();
        if removed {
            self.reviews
                .retain(|_, review| review.target != ReviewTarget::Flight(id));
            for mut booking in self.bookings.iter_mut() {
                if booking.flight_id == Some(id) {
                    booking.flight_id = None;
                }
            }
        }
        removed
    }

    // ----- packages -----

    pub fn insert_package(&self, mut package: Package) -> Package {
        package.id = self.allocate_id();
        self.packages.insert(package.id, package.clone());
        package
    }

    pub fn package(&self, id: u64) -> Option<Package> {
        self.packages.get(&id).map(|entry| entry.clone())
    }

    pub fn packages(&self) -> Vec<Package> {
        Self::sorted_by_id(&self.packages)
    }

    pub fn delete_package(&self, id: u64) -> bool {
        let removed = self.packages.remove(&id).is_some();
        if removed {
            self.reviews
                .retain(|_, review| review.target != ReviewTarget::Package(id));
            for mut booking in self.bookings.iter_mut() {
                if booking.package_id == Some(id) {
                    booking.package_id = None;
                }
            }
        }
        removed
    }

    // ----- destinations -----

    pub fn insert_destination(&self, mut destination: Destination) -> Destination {
        destination.id = self.allocate_id();
        self.destinations.insert(destination.id, destination.clone());
        destination
    }

    pub fn destination(&self, id: u64) -> Option<Destination> {
        self.destinations.get(&id).map(|entry| entry.clone())
    }

    pub fn destinations(&self) -> Vec<Destination> {
        Self::sorted_by_id(&self.destinations)
    }

    pub fn delete_destination(&self, id: u64) -> bool {
        let removed = self.destinations.remove(&id).is_some();
        if removed {
            self.reviews
                .retain(|_, review| review.target != ReviewTarget::Destination(id));
        }
        removed
    }

    // ----- reviews -----

    pub fn insert_review(&self, mut review: Review) -> Review {
        review.id = self.allocate_id();
        self.reviews.insert(review.id, review.clone());
        review
    }

    pub fn review(&self, id: u64) -> Option<Review> {
        self.reviews.get(&id).map(|entry| entry.clone())
    }

    /// Reviews for one parent, newest first (ties broken by id, newest first).
    pub fn reviews_for(&self, target: ReviewTarget) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .reviews
            .iter()
            .filter(|entry| entry.target == target)
            .map(|entry| entry.clone())
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        reviews
    }

    pub fn delete_review(&self, id: u64) -> Option<Review> {
        self.reviews.remove(&id).map(|(_, review)| review)
    }

    // ----- bookings -----

    pub fn insert_booking(&self, mut booking: Booking) -> Booking {
        booking.id = self.allocate_id();
        self.bookings.insert(booking.id, booking.clone());
        booking
    }

    pub fn booking(&self, id: u64) -> Option<Booking> {
        self.bookings.get(&id).map(|entry| entry.clone())
    }

    pub fn bookings(&self) -> Vec<Booking> {
        Self::sorted_by_id(&self.bookings)
    }

    pub fn bookings_for_user(&self, user_id: u64) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.clone())
            .collect();
        bookings.sort_by_key(|booking| booking.id);
        bookings
    }

    // ----- users -----

    pub fn insert_user(&self, mut user: User) -> User {
        user.id = self.allocate_id();
        self.users.insert(user.id, user.clone());
        user
    }

    pub fn user(&self, id: u64) -> Option<User> {
        self.users.get(&id).map(|entry| entry.clone())
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .iter()
            .find(|entry| entry.email.eq_ignore_ascii_case(email))
            .map(|entry| entry.clone())
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .iter()
            .find(|entry| entry.username == username)
            .map(|entry| entry.clone())
    }

    pub fn users(&self) -> Vec<User> {
        Self::sorted_by_id(&self.users)
    }

    /// Replaces the stored record with the same id. Returns false if the user
    /// no longer exists.
    pub fn update_user(&self, user: User) -> bool {
        match self.users.get_mut(&user.id) {
            Some(mut entry) => {
                *entry = user;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn hotel(name: &str) -> Hotel {
        Hotel {
            id: 0,
            name: name.to_string(),
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
        }
    }

    fn user(username: &str, email: &str) -> User {
        User {
            id: 0,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            date_of_birth: None,
            gender: String::new(),
            is_verified: true,
            otp_code: String::new(),
        }
    }

    #[test]
    fn test_ids_are_assigned_and_listing_order_is_stable() {
        let store = TravelStore::new();
        let first = store.insert_hotel(hotel("Sea Breeze"));
        let second = store.insert_hotel(hotel("Palm Grove"));
        assert!(first.id < second.id);

        let names: Vec<String> = store.hotels().into_iter().map(|h| h.name).collect();
        assert_eq!(names, vec!["Sea Breeze", "Palm Grove"]);
    }

    #[test]
    fn test_hotel_delete_cascades_rooms_and_reviews_and_nulls_bookings() {
        let store = TravelStore::new();
        let hotel = store.insert_hotel(hotel("Sea Breeze"));
        let author = store.insert_user(user("asha", "asha@example.com"));
        store.insert_room(Room {
            id: 0,
            hotel_id: hotel.id,
            room_type: "Deluxe".to_string(),
            description: String::new(),
            price: 9000.0,
            max_guests: 2,
            image: None,
        });
        let review = store.insert_review(Review {
            id: 0,
            target: ReviewTarget::Hotel(hotel.id),
            user_id: author.id,
            rating: 5,
            text: "Great stay".to_string(),
            created_at: Utc::now(),
        });
        let booking = store.insert_booking(Booking {
            id: 0,
            user_id: author.id,
            flight_id: None,
            hotel_id: Some(hotel.id),
            package_id: None,
            booking_date: Utc::now(),
            status: "pending".to_string(),
        });

        assert!(store.delete_hotel(hotel.id));
        assert!(store.hotel(hotel.id).is_none());
        assert!(store.rooms_for_hotel(hotel.id).is_empty());
        assert!(store.review(review.id).is_none());
        // The booking survives with the reference nulled.
        let booking = store.booking(booking.id).unwrap();
        assert_eq!(booking.hotel_id, None);
        assert_eq!(booking.user_id, author.id);
    }

    #[test]
    fn test_reviews_for_orders_newest_first() {
        let store = TravelStore::new();
        let hotel = store.insert_hotel(hotel("Sea Breeze"));
        let author = store.insert_user(user("asha", "asha@example.com"));
        let base = Utc::now();
        for (offset, text) in [(0, "first"), (60, "second"), (120, "third")] {
            store.insert_review(Review {
                id: 0,
                target: ReviewTarget::Hotel(hotel.id),
                user_id: author.id,
                rating: 4,
                text: text.to_string(),
                created_at: base + chrono::Duration::seconds(offset),
            });
        }

        let texts: Vec<String> = store
            .reviews_for(ReviewTarget::Hotel(hotel.id))
            .into_iter()
            .map(|r| r.text)
            .collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_user_lookup_by_email_is_case_insensitive() {
        let store = TravelStore::new();
        store.insert_user(user("asha", "Asha@Example.com"));
        assert!(store.user_by_email("asha@example.com").is_some());
        assert!(store.user_by_email("other@example.com").is_none());
    }

    #[test]
    fn test_insert_flight_resolves_coords() {
        let store = TravelStore::new();
        let flight = store.insert_flight(Flight {
            id: 0,
            flight_number: "6E204".to_string(),
            airline: "IndiGo".to_string(),
            from_city: "Jaipur".to_string(),
            to_city: "Goa".to_string(),
            from_airport_code: "JAI".to_string(),
            to_airport_code: "GOI".to_string(),
            departure: Utc::now(),
            duration_minutes: 100,
            price: 4300.0,
            seats_available: 12,
            flight_class: "Economy".to_string(),
            trip_type: "one-way".to_string(),
            from_coords: None,
            to_coords: None,
            destination_image: None,
        });
        assert!(flight.from_coords.is_some());
        assert!(flight.to_coords.is_some());
        assert_eq!(store.flight(flight.id).unwrap().to_coords, flight.to_coords);
    }
}
