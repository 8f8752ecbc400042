// Handlers for the mock booking endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::booking::BookingError;
use crate::models::{ApiError, Booking, BookingRequest};
use crate::AppState;

/// POST /api/bookings - Confirm a booking for a planned trip
pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<Booking>, (StatusCode, Json<ApiError>)> {
    let session = state
        .sessions
        .get(&req.session_id)
        .map_err(|_| booking_error_to_api_error(BookingError::UnknownSession(req.session_id.clone())))?;
    let car = state
        .catalog
        .find(&session.car_id)
        .ok_or_else(|| {
            booking_error_to_api_error(BookingError::UnknownSession(req.session_id.clone()))
        })?;

    state
        .bookings
        .create(&req, &session, car)
        .map(Json)
        .map_err(booking_error_to_api_error)
}

/// GET /api/bookings/:id - Fetch a confirmed booking
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, (StatusCode, Json<ApiError>)> {
    state
        .bookings
        .get(&id)
        .map(Json)
        .map_err(booking_error_to_api_error)
}

fn booking_error_to_api_error(err: BookingError) -> (StatusCode, Json<ApiError>) {
    let status = match err {
        BookingError::UnknownSession(_) | BookingError::NotFound(_) => StatusCode::NOT_FOUND,
        BookingError::InvalidContact(_) | BookingError::InvalidPickupDate(_) => {
            StatusCode::BAD_REQUEST
        }
    };

    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
