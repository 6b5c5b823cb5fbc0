// HTTP surface. Handlers stay thin: decode the request, call one service,
// map the domain error onto a status code and a JSON error body.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{AuthError, AuthService, LoginResponse, RegisterRequest, TokenPair};
use crate::bookings::{BookingError, BookingService, NewBooking, PaymentCapture};
use crate::config::AppConfig;
use crate::grouping::FlightDateGroup;
use crate::mailer::Mailer;
use crate::models::{Destination, Flight, Hotel, Package, ReviewTarget, User};
use crate::payment::{GatewayOrder, PaymentClient, PaymentError};
use crate::presenter::{
    BookingView, DestinationView, FlightView, HotelView, MediaContext, PackageView, Presenter,
    ReviewView, UserView,
};
use crate::reviews::{ReviewError, ReviewService};
use crate::search::{FlightFilters, SearchEngine, SearchResults};
use crate::store::TravelStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TravelStore>,
    pub search: Arc<SearchEngine>,
    pub presenter: Arc<Presenter>,
    pub reviews: Arc<ReviewService>,
    pub auth: Arc<AuthService>,
    pub bookings: Arc<BookingService>,
    pub payment: Arc<PaymentClient>,
    pub media: MediaContext,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<TravelStore>, mailer: Arc<dyn Mailer>) -> Self {
        let payment = Arc::new(PaymentClient::new(config.payment.clone()));
        let media = match &config.public_base_url {
            Some(base) => MediaContext::with_base(base.clone()),
            None => MediaContext::none(),
        };
        Self {
            search: Arc::new(SearchEngine::new(Arc::clone(&store))),
            presenter: Arc::new(Presenter::new(Arc::clone(&store))),
            reviews: Arc::new(ReviewService::new(Arc::clone(&store))),
            auth: Arc::new(AuthService::new(
                Arc::clone(&store),
                mailer,
                config.jwt.clone(),
            )),
            bookings: Arc::new(BookingService::new(Arc::clone(&store), Arc::clone(&payment))),
            payment,
            media,
            store,
        }
    }
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(what: &str, id: u64) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{} {} not found", what, id))
    }

    fn unauthorized(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::Validation(_)
            | AuthError::EmailTaken
            | AuthError::UsernameTaken
            | AuthError::InvalidOtp => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials | AuthError::Token(_) => StatusCode::UNAUTHORIZED,
            AuthError::NotVerified => StatusCode::FORBIDDEN,
            AuthError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        let status = match &err {
            ReviewError::TargetNotFound { .. }
            | ReviewError::AuthorNotFound(_)
            | ReviewError::NotFound(_) => StatusCode::NOT_FOUND,
            ReviewError::InvalidRating(_) => StatusCode::BAD_REQUEST,
            ReviewError::NotAuthor(_) => StatusCode::FORBIDDEN,
        };
        Self::new(status, err.to_string())
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        let status = match &err {
            BookingError::UserNotFound(_)
            | BookingError::FlightNotFound(_)
            | BookingError::HotelNotFound(_)
            | BookingError::PackageNotFound(_) => StatusCode::NOT_FOUND,
            BookingError::NothingBooked | BookingError::PaymentRejected => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, err.to_string())
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn bearer_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("malformed authorization header"))?;
    Ok(state.auth.authenticate(token)?)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", get(search))
        .route("/api/hotels", get(list_hotels).post(create_hotel))
        .route("/api/hotels/{id}", get(get_hotel).delete(delete_hotel))
        .route("/api/flights", get(list_flights).post(create_flight))
        .route("/api/flights/{id}", get(get_flight).delete(delete_flight))
        .route("/api/packages", get(list_packages).post(create_package))
        .route("/api/packages/{id}", get(get_package).delete(delete_package))
        .route(
            "/api/destinations",
            get(list_destinations).post(create_destination),
        )
        .route(
            "/api/destinations/{id}",
            get(get_destination).delete(delete_destination),
        )
        .route(
            "/api/{kind}/{id}/reviews",
            get(list_reviews).post(create_review),
        )
        .route("/api/reviews/{id}", axum::routing::delete(delete_review))
        .route("/api/bookings", get(list_bookings).post(create_booking))
        .route("/api/users", get(list_users))
        .route("/api/users/{id}/bookings", get(user_bookings))
        .route("/api/users/register", post(register))
        .route("/api/users/verify-otp", post(verify_otp))
        .route("/api/users/login", post(login))
        .route("/api/users/token-refresh", post(token_refresh))
        .route(
            "/api/users/forgot-password-request",
            post(forgot_password_request),
        )
        .route(
            "/api/users/forgot-password-verify",
            post(forgot_password_verify),
        )
        .route("/api/payments/order", post(create_order))
        .route("/api/payments/verify", post(verify_payment))
        .with_state(state)
}

// ----- search -----

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResults> {
    Json(state.search.search(&query.q, &state.media))
}

// ----- hotels -----

async fn list_hotels(State(state): State<AppState>) -> Json<Vec<HotelView>> {
    let views = state
        .store
        .hotels()
        .iter()
        .map(|hotel| state.presenter.hotel(hotel, &state.media))
        .collect();
    Json(views)
}

async fn get_hotel(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<HotelView> {
    let hotel = state
        .store
        .hotel(id)
        .ok_or_else(|| ApiError::not_found("hotel", id))?;
    Ok(Json(state.presenter.hotel(&hotel, &state.media)))
}

async fn create_hotel(
    State(state): State<AppState>,
    Json(hotel): Json<Hotel>,
) -> (StatusCode, Json<HotelView>) {
    let stored = state.store.insert_hotel(hotel);
    let view = state.presenter.hotel(&stored, &state.media);
    (StatusCode::CREATED, Json(view))
}

async fn delete_hotel(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_hotel(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("hotel", id))
    }
}

// ----- flights -----

async fn list_flights(
    State(state): State<AppState>,
    Query(filters): Query<FlightFilters>,
) -> Json<Vec<FlightDateGroup>> {
    Json(state.search.list_flights(&filters, &state.media))
}

async fn get_flight(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<FlightView> {
    let flight = state
        .store
        .flight(id)
        .ok_or_else(|| ApiError::not_found("flight", id))?;
    Ok(Json(state.presenter.flight(&flight, &state.media)))
}

async fn create_flight(
    State(state): State<AppState>,
    Json(flight): Json<Flight>,
) -> (StatusCode, Json<FlightView>) {
    let stored = state.store.insert_flight(flight);
    let view = state.presenter.flight(&stored, &state.media);
    (StatusCode::CREATED, Json(view))
}

async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_flight(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("flight", id))
    }
}

// ----- packages -----

async fn list_packages(State(state): State<AppState>) -> Json<Vec<PackageView>> {
    let views = state
        .store
        .packages()
        .iter()
        .map(|package| state.presenter.package(package, &state.media))
        .collect();
    Json(views)
}

async fn get_package(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<PackageView> {
    let package = state
        .store
        .package(id)
        .ok_or_else(|| ApiError::not_found("package", id))?;
    Ok(Json(state.presenter.package(&package, &state.media)))
}

async fn create_package(
    State(state): State<AppState>,
    Json(package): Json<Package>,
) -> (StatusCode, Json<PackageView>) {
    let stored = state.store.insert_package(package);
    let view = state.presenter.package(&stored, &state.media);
    (StatusCode::CREATED, Json(view))
}

async fn delete_package(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_package(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("package", id))
    }
}

// ----- destinations -----

async fn list_destinations(State(state): State<AppState>) -> Json<Vec<DestinationView>> {
    let views = state
        .store
        .destinations()
        .iter()
        .map(|destination| state.presenter.destination(destination, &state.media))
        .collect();
    Json(views)
}

async fn get_destination(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<DestinationView> {
    let destination = state
        .store
        .destination(id)
        .ok_or_else(|| ApiError::not_found("destination", id))?;
    Ok(Json(state.presenter.destination(&destination, &state.media)))
}

async fn create_destination(
    State(state): State<AppState>,
    Json(destination): Json<Destination>,
) -> (StatusCode, Json<DestinationView>) {
    let stored = state.store.insert_destination(destination);
    let view = state.presenter.destination(&stored, &state.media);
    (StatusCode::CREATED, Json(view))
}

async fn delete_destination(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_destination(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("destination", id))
    }
}

// ----- reviews -----

fn parse_target(kind: &str, id: u64) -> Result<ReviewTarget, ApiError> {
    match kind {
        "hotels" => Ok(ReviewTarget::Hotel(id)),
        "flights" => Ok(ReviewTarget::Flight(id)),
        "packages" => Ok(ReviewTarget::Package(id)),
        "destinations" => Ok(ReviewTarget::Destination(id)),
        other => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("unknown review target kind '{}'", other),
        )),
    }
}

#[derive(Deserialize)]
struct ReviewBody {
    rating: u8,
    #[serde(default)]
    text: String,
}

async fn list_reviews(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, u64)>,
) -> ApiResult<Vec<ReviewView>> {
    let target = parse_target(&kind, id)?;
    Ok(Json(state.reviews.list(target)?))
}

async fn create_review(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, u64)>,
    headers: HeaderMap,
    Json(body): Json<ReviewBody>,
) -> Result<(StatusCode, Json<ReviewView>), ApiError> {
    let target = parse_target(&kind, id)?;
    let user = bearer_user(&state, &headers)?;
    let view = state.reviews.create(target, user.id, body.rating, body.text)?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let user = bearer_user(&state, &headers)?;
    state.reviews.delete(id, user.id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- bookings -----

async fn list_bookings(State(state): State<AppState>) -> Json<Vec<BookingView>> {
    Json(state.bookings.list())
}

async fn create_booking(
    State(state): State<AppState>,
    Json(booking): Json<NewBooking>,
) -> Result<(StatusCode, Json<BookingView>), ApiError> {
    let view = state.bookings.create(booking)?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn user_bookings(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Json<Vec<BookingView>> {
    Json(state.bookings.for_user(id))
}

// ----- users / auth -----

async fn list_users(State(state): State<AppState>) -> Json<Vec<UserView>> {
    let views = state
        .store
        .users()
        .iter()
        .map(crate::presenter::user_view)
        .collect();
    Json(views)
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let view = state.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[derive(Deserialize)]
struct OtpRequest {
    email: String,
    otp: String,
}

async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<OtpRequest>,
) -> ApiResult<UserView> {
    Ok(Json(state.auth.verify_otp(&request.email, &request.otp).await?))
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    Ok(Json(
        state.auth.login(&request.email, &request.password).await?,
    ))
}

#[derive(Deserialize)]
struct RefreshRequest {
    refresh: String,
}

async fn token_refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<TokenPair> {
    Ok(Json(state.auth.refresh(&request.refresh)?))
}

#[derive(Deserialize)]
struct ForgotPasswordRequest {
    email: String,
}

async fn forgot_password_request(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> ApiResult<serde_json::Value> {
    state.auth.forgot_password_request(&request.email).await?;
    Ok(Json(json!({ "detail": "OTP sent" })))
}

#[derive(Deserialize)]
struct ForgotPasswordVerify {
    email: String,
    otp: String,
    new_password: String,
}

async fn forgot_password_verify(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordVerify>,
) -> ApiResult<serde_json::Value> {
    state
        .auth
        .forgot_password_verify(&request.email, &request.otp, &request.new_password)
        .await?;
    Ok(Json(json!({ "detail": "password updated" })))
}

// ----- payments -----

#[derive(Deserialize)]
struct OrderRequest {
    amount: u64,
}

async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> ApiResult<GatewayOrder> {
    Ok(Json(state.payment.create_order(request.amount).await?))
}

async fn verify_payment(
    State(state): State<AppState>,
    Json(capture): Json<PaymentCapture>,
) -> Result<(StatusCode, Json<BookingView>), ApiError> {
    let view = state.bookings.confirm_paid(capture)?;
    Ok((StatusCode::CREATED, Json(view)))
}
