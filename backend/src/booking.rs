//! Mock booking flow. Confirms every valid request immediately and keeps
//! bookings in memory for the lifetime of the process.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Booking, BookingRequest, BookingStatus, Car};
use crate::session::TripSession;

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("trip session {0} not found")]
    UnknownSession(String),
    #[error("invalid contact details: {0}")]
    InvalidContact(String),
    #[error("invalid pickup date {0:?}, expected YYYY-MM-DD")]
    InvalidPickupDate(String),
    #[error("booking {0} not found")]
    NotFound(String),
}

#[derive(Default)]
pub struct BookingStore {
    bookings: RwLock<HashMap<String, Booking>>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Booking>> {
        self.bookings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Booking>> {
        self.bookings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Confirm a booking for the session's current plan and car.
    pub fn create(
        &self,
        request: &BookingRequest,
        session: &TripSession,
        car: &Car,
    ) -> Result<Booking, BookingError> {
        let customer_name = validate_name(&request.customer_name)?;
        let phone = normalize_phone(&request.phone)?;
        let pickup_date = NaiveDate::parse_from_str(request.pickup_date.trim(), "%Y-%m-%d")
            .map_err(|_| BookingError::InvalidPickupDate(request.pickup_date.clone()))?;

        let id = Uuid::new_v4();
        let plan = &session.plan;
        let booking = Booking {
            id: id.to_string(),
            reference: booking_reference(&id),
            status: BookingStatus::Confirmed,
            customer_name,
            phone,
            pickup_date: pickup_date.format("%Y-%m-%d").to_string(),
            car: car.clone(),
            source: plan.source.clone(),
            destination: plan.destination.clone(),
            trip_type: plan.trip_type,
            trip_stats: plan.trip_stats.clone(),
            created_at: Utc::now().to_rfc3339(),
        };

        tracing::info!(
            "Booking {} confirmed: {} -> {} in {} for {:.0}",
            booking.reference,
            booking.source.name,
            booking.destination.name,
            booking.car.name,
            booking.trip_stats.total_fare
        );
        self.write().insert(booking.id.clone(), booking.clone());
        Ok(booking)
    }

    pub fn get(&self, id: &str) -> Result<Booking, BookingError> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound(id.to_string()))
    }
}

fn booking_reference(id: &Uuid) -> String {
    let simple = id.simple().to_string();
    format!("SAR-{}", simple[..8].to_uppercase())
}

fn validate_name(name: &str) -> Result<String, BookingError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BookingError::InvalidContact("name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(BookingError::InvalidContact("name is too long".into()));
    }
    Ok(name.to_string())
}

/// Indian mobile numbers: ten digits starting 6-9, with an optional +91 or 0 prefix.
fn normalize_phone(phone: &str) -> Result<String, BookingError> {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = digits
        .strip_prefix("+91")
        .or_else(|| digits.strip_prefix('0'))
        .unwrap_or(&digits);

    let valid = digits.len() == 10
        && digits.chars().all(|c| c.is_ascii_digit())
        && matches!(digits.as_bytes()[0], b'6'..=b'9');
    if !valid {
        return Err(BookingError::InvalidContact(format!(
            "{phone:?} is not a valid mobile number"
        )));
    }
    Ok(format!("+91{digits}"))
}
