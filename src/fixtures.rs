// Demo dataset for development and load testing. Seeding is idempotent per
// process: it only ever appends, so call it once at startup.

use chrono::{Duration, Utc};

use crate::models::{Coords, Destination, Flight, Hotel, Package, Room};
use crate::store::TravelStore;

const AIRLINES: &[(&str, &str)] = &[
    ("AI", "Air India"),
    ("6E", "IndiGo"),
    ("SG", "SpiceJet"),
    ("UK", "Vistara"),
];

const ROUTES: &[((&str, &str), (&str, &str))] = &[
    (("Delhi", "DEL"), ("Mumbai", "BOM")),
    (("Mumbai", "BOM"), ("Goa", "GOI")),
    (("Delhi", "DEL"), ("Goa", "GOI")),
    (("Bangalore", "BLR"), ("Delhi", "DEL")),
    (("Chennai", "MAA"), ("Kolkata", "CCU")),
    (("Hyderabad", "HYD"), ("Jaipur", "JAI")),
];

const CLASSES: &[&str] = &["Economy", "Business"];

pub fn seed_demo_data(store: &TravelStore) {
    seed_hotels(store);
    seed_destinations(store);
    seed_packages(store);
    seed_flights(store);
    tracing::info!(
        hotels = store.hotels().len(),
        flights = store.flights().len(),
        packages = store.packages().len(),
        destinations = store.destinations().len(),
        "demo data seeded"
    );
}

fn seed_hotels(store: &TravelStore) {
    let hotels = [
        (
            "Taj Palace",
            "Delhi",
            5,
            14500.0,
            "Landmark luxury hotel in the diplomatic enclave with award-winning dining.",
            "WiFi, Pool, Spa, Gym, Restaurant",
        ),
        (
            "Goa Beach Resort",
            "Goa",
            4,
            8200.0,
            "Beachfront resort on Candolim beach with a lagoon pool and water sports desk.",
            "WiFi, Pool, Beach Access, Bar",
        ),
        (
            "Himalayan View Lodge",
            "Manali",
            3,
            4100.0,
            "Family-run lodge with snow peak views and wood-fired dining.",
            "WiFi, Heating, Restaurant",
        ),
    ];

    for (name, location, stars, price, description, amenities) in hotels {
        let hotel = store.insert_hotel(Hotel {
            id: 0,
            name: name.to_string(),
            location: location.to_string(),
            star_rating: stars,
            amenities: amenities.to_string(),
            price_per_night: price,
            photo: None,
            gallery: None,
            description: description.to_string(),
            email: Some(format!(
                "reservations@{}.example.com",
                name.to_lowercase().replace(' ', "-")
            )),
            phone: Some("+91 11 2611 0202".to_string()),
            website: None,
            policies: Some("Check-in 2 PM, check-out 11 AM. No pets.".to_string()),
            landmarks: None,
        });

        for (room_type, multiplier, guests) in
            [("Standard", 1.0, 2), ("Deluxe", 1.4, 3), ("Suite", 2.2, 4)]
        {
            store.insert_room(Room {
                id: 0,
                hotel_id: hotel.id,
                room_type: room_type.to_string(),
                description: format!("{} room at {}", room_type, hotel.name),
                price: hotel.price_per_night * multiplier,
                max_guests: guests,
                image: None,
            });
        }
    }
}

fn seed_destinations(store: &TravelStore) {
    let destinations = [
        (
            "Goa",
            "Sun-soaked beaches, Portuguese quarters and seafood shacks.",
            Some(Coords { lat: 15.2993, lng: 74.1240 }),
            vec!["Beaches", "Nightlife", "Water Sports"],
        ),
        (
            "Jaipur",
            "The pink city: forts, palaces and bazaars of Rajasthan.",
            Some(Coords { lat: 26.9124, lng: 75.7873 }),
            vec!["Heritage", "Shopping", "Cuisine"],
        ),
        (
            "Kerala Backwaters",
            "Houseboat cruises through palm-lined canals and lagoons.",
            Some(Coords { lat: 9.4981, lng: 76.3388 }),
            vec!["Houseboats", "Ayurveda", "Nature"],
        ),
    ];

    for (name, description, coords, features) in destinations {
        store.insert_destination(Destination {
            id: 0,
            name: name.to_string(),
            description: description.to_string(),
            image: None,
            gallery: Vec::new(),
            coords,
            features: features.into_iter().map(str::to_string).collect(),
        });
    }
}

fn seed_packages(store: &TravelStore) {
    let packages = [
        (
            "Kashmir Paradise Tour",
            "Mountains",
            6,
            42000.0,
            "Srinagar houseboats, Gulmarg gondola and Pahalgam valleys over six unhurried days with \
             an English-speaking guide and all transfers included.",
            r#"["Hotel", "Breakfast", "Transfers", "Shikara Ride"]"#,
        ),
        (
            "Goa Carnival Special",
            "Beaches",
            4,
            18500.0,
            "Four days of beaches, forts and carnival nights in North Goa.",
            "Hotel, Breakfast, Airport Pickup",
        ),
        (
            "Rajasthan Royal Circuit",
            "Heritage",
            8,
            56000.0,
            "Jaipur, Jodhpur and Udaipur with palace stays and desert camp night.",
            "Hotel, All Meals, Car with Driver, Guide",
        ),
    ];

    for (name, category, duration, price, description, inclusions) in packages {
        store.insert_package(Package {
            id: 0,
            name: name.to_string(),
            category: category.to_string(),
            duration,
            inclusions: inclusions.to_string(),
            price,
            description: description.to_string(),
            photo: None,
        });
    }
}

fn seed_flights(store: &TravelStore) {
    let base = Utc::now();
    let mut counter = 100;

    // One flight per route/class/day over the next week, departures staggered
    // through the morning and afternoon.
    for day in 0..7 {
        for (index, (from, to)) in ROUTES.iter().enumerate() {
            for (class_index, class) in CLASSES.iter().enumerate() {
                let (code, airline) = AIRLINES[(index + class_index) % AIRLINES.len()];
                let base_fare = if *class == "Business" { 14200.0 } else { 5400.0 };
                counter += 1;
                store.insert_flight(Flight {
                    id: 0,
                    flight_number: format!("{}{}", code, counter),
                    airline: airline.to_string(),
                    from_city: from.0.to_string(),
                    to_city: to.0.to_string(),
                    from_airport_code: from.1.to_string(),
                    to_airport_code: to.1.to_string(),
                    departure: base
                        + Duration::days(day)
                        + Duration::hours(6 + 3 * index as i64 + class_index as i64),
                    duration_minutes: 90 + 15 * index as i64,
                    price: base_fare + 250.0 * index as f64,
                    seats_available: 24,
                    flight_class: class.to_string(),
                    trip_type: "round-trip".to_string(),
                    from_coords: None,
                    to_coords: None,
                    destination_image: None,
                });
            }
        }
    }
}
