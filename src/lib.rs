// Main library file for the travel booking backend

// Export modules for each layer of the service
pub mod auth;
pub mod bookings;
pub mod config;
pub mod fixtures;
pub mod grouping;
pub mod http;
pub mod mailer;
pub mod models;
pub mod payment;
pub mod presenter;
pub mod reviews;
pub mod search;
pub mod store;

// Re-export key types for convenience
pub use auth::{AuthError, AuthService, LoginResponse, RegisterRequest, TokenPair};
pub use bookings::{BookingError, BookingService, NewBooking, PaymentCapture};
pub use config::{AppConfig, JwtConfig, SmtpConfig};
pub use grouping::{group_flights_by_date, FlightDateGroup};
pub use http::{router, AppState};
pub use mailer::{LogMailer, MailError, Mailer, OutboundMail};
pub use models::{
    Booking, Coords, Destination, Flight, Hotel, Package, Review, ReviewTarget, Room, User,
};
pub use payment::{GatewayOrder, PaymentClient, PaymentConfig, PaymentError};
pub use presenter::{MediaContext, Presenter};
pub use reviews::{ReviewError, ReviewService};
pub use search::{FlightFilters, SearchEngine, SearchResults, VISIBILITY_WINDOW_HOURS};
pub use store::TravelStore;
