// Booking operations: pending bookings created directly, confirmed bookings
// created only after the payment signature checks out.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::models::Booking;
use crate::payment::PaymentClient;
use crate::presenter::{booking_view, BookingView};
use crate::store::TravelStore;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BookingError {
    #[error("user {0} not found")]
    UserNotFound(u64),

    #[error("flight {0} not found")]
    FlightNotFound(u64),

    #[error("hotel {0} not found")]
    HotelNotFound(u64),

    #[error("package {0} not found")]
    PackageNotFound(u64),

    #[error("booking must reference a flight, hotel or package")]
    NothingBooked,

    #[error("payment signature verification failed")]
    PaymentRejected,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    #[serde(alias = "user")]
    pub user_id: u64,
    #[serde(default, alias = "flight")]
    pub flight_id: Option<u64>,
    #[serde(default, alias = "hotel")]
    pub hotel_id: Option<u64>,
    #[serde(default, alias = "package")]
    pub package_id: Option<u64>,
}

/// Checkout callback payload: the gateway ids plus what was being bought.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCapture {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    pub user_id: u64,
    pub booking_type: String,
    #[serde(default)]
    pub flight_id: Option<u64>,
    #[serde(default)]
    pub hotel_id: Option<u64>,
    #[serde(default)]
    pub package_id: Option<u64>,
}

pub struct BookingService {
    store: Arc<TravelStore>,
    payment: Arc<PaymentClient>,
}

impl BookingService {
    pub fn new(store: Arc<TravelStore>, payment: Arc<PaymentClient>) -> Self {
        Self { store, payment }
    }

    fn validate_references(&self, booking: &NewBooking) -> Result<(), BookingError> {
        if self.store.user(booking.user_id).is_none() {
            return Err(BookingError::UserNotFound(booking.user_id));
        }
        if booking.flight_id.is_none() && booking.hotel_id.is_none() && booking.package_id.is_none()
        {
            return Err(BookingError::NothingBooked);
        }
        if let Some(id) = booking.flight_id {
            if self.store.flight(id).is_none() {
                return Err(BookingError::FlightNotFound(id));
            }
        }
        if let Some(id) = booking.hotel_id {
            if self.store.hotel(id).is_none() {
                return Err(BookingError::HotelNotFound(id));
            }
        }
        if let Some(id) = booking.package_id {
            if self.store.package(id).is_none() {
                return Err(BookingError::PackageNotFound(id));
            }
        }
        Ok(())
    }

    fn insert(&self, booking: NewBooking, status: &str) -> BookingView {
        let stored = self.store.insert_booking(Booking {
            id: 0,
            user_id: booking.user_id,
            flight_id: booking.flight_id,
            hotel_id: booking.hotel_id,
            package_id: booking.package_id,
            booking_date: Utc::now(),
            status: status.to_string(),
        });
        booking_view(&stored)
    }

    /// Creates a pending booking. Every referenced record must exist.
    pub fn create(&self, booking: NewBooking) -> Result<BookingView, BookingError> {
        self.validate_references(&booking)?;
        Ok(self.insert(booking, "pending"))
    }

    pub fn list(&self) -> Vec<BookingView> {
        self.store.bookings().iter().map(booking_view).collect()
    }

    pub fn for_user(&self, user_id: u64) -> Vec<BookingView> {
        self.store
            .bookings_for_user(user_id)
            .iter()
            .map(booking_view)
            .collect()
    }

    /// Verifies the gateway signature, then records a confirmed booking for
    /// the item named by `booking_type`. A bad signature records nothing.
    pub fn confirm_paid(&self, capture: PaymentCapture) -> Result<BookingView, BookingError> {
        if !self
            .payment
            .verify_signature(&capture.order_id, &capture.payment_id, &capture.signature)
        {
            return Err(BookingError::PaymentRejected);
        }

        let booking = NewBooking {
            user_id: capture.user_id,
            flight_id: (capture.booking_type == "flight")
                .then_some(capture.flight_id)
                .flatten(),
            hotel_id: (capture.booking_type == "hotel")
                .then_some(capture.hotel_id)
                .flatten(),
            package_id: (capture.booking_type == "package")
                .then_some(capture.package_id)
                .flatten(),
        };
        self.validate_references(&booking)?;
        Ok(self.insert(booking, "confirmed"))
    }
}
