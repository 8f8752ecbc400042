pub mod booking;
pub mod booking_handlers;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fare;
pub mod geo;
pub mod gpx_export;
pub mod itinerary;
pub mod models;
pub mod planner;
pub mod providers;
pub mod route_mapper;
pub mod session;
pub mod suggestions;
pub mod validator;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::booking::BookingStore;
use crate::catalog::Catalog;
use crate::error::PlanError;
use crate::fare::{compute_trip_stats, TripStatsInput};
use crate::gpx_export::encode_trip_as_gpx;
use crate::models::{
    ApiError, Car, FareRequest, GpxResponse, Leg, Location, PlanTripRequest, Pricing,
    ReplanRequest, SelectCarRequest, SelectRouteRequest, Stop, StopType, TripSessionResponse,
    TripStats,
};
use crate::planner::TripPlanner;
use crate::session::SessionStore;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
    pub catalog: Arc<Catalog>,
    pub sessions: Arc<SessionStore>,
    pub bookings: Arc<BookingStore>,
}

impl AppState {
    pub fn new(planner: TripPlanner, catalog: Catalog) -> Self {
        Self {
            planner: Arc::new(planner),
            catalog: Arc::new(catalog),
            sessions: Arc::new(SessionStore::default()),
            bookings: Arc::new(BookingStore::new()),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/cars", get(list_cars))
        .route("/api/fare", post(fare_handler))
        .route("/api/trips", post(create_trip))
        .route("/api/trips/:id", get(get_trip))
        .route("/api/trips/:id/replan", post(replan_trip))
        .route("/api/trips/:id/stops/:stop_id/toggle", post(toggle_stop))
        .route("/api/trips/:id/route", post(select_route))
        .route("/api/trips/:id/car", post(select_car))
        .route("/api/trips/:id/gpx", get(trip_gpx))
        .route("/api/bookings", post(booking_handlers::create_booking))
        .route("/api/bookings/:id", get(booking_handlers::get_booking))
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_cars(State(state): State<AppState>) -> Json<Vec<Car>> {
    Json(state.catalog.cars().to_vec())
}

/// Stateless fare calculator: explicit pricing wins over a catalog car.
async fn fare_handler(
    State(state): State<AppState>,
    Json(req): Json<FareRequest>,
) -> ApiResult<TripStats> {
    let valid = |value: f64| value.is_finite() && value >= 0.0;
    if !valid(req.distance_km) || !valid(req.duration_minutes) {
        return Err(bad_request(
            "distance_km and duration_minutes must be non-negative numbers",
        ));
    }

    let pricing: Pricing = match (&req.pricing, &req.car_id) {
        (Some(pricing), _) => *pricing,
        (None, Some(car_id)) => state.catalog.pricing(car_id).map_err(plan_error_to_api_error)?,
        (None, None) => return Err(bad_request("either pricing or car_id is required")),
    };

    let stops = fare_stops(&req.stop_durations);
    Ok(Json(compute_trip_stats(&TripStatsInput {
        distance_km: req.distance_km,
        duration_minutes: req.duration_minutes,
        selected_stops: &stops,
        pricing,
        trip_type: req.trip_type,
        toll_amount: None,
        night_halt_hint: None,
    })))
}

fn fare_stops(durations: &[u32]) -> Vec<Stop> {
    durations
        .iter()
        .enumerate()
        .map(|(i, &duration)| Stop {
            id: format!("stop-{i}"),
            name: format!("Stop {}", i + 1),
            stop_type: StopType::Rest,
            location: Location::new("", "", 0.0, 0.0),
            duration,
            is_selected: true,
            detour_km: None,
            leg: Leg::Onward,
            progress: 0.0,
        })
        .collect()
}

async fn create_trip(
    State(state): State<AppState>,
    Json(req): Json<PlanTripRequest>,
) -> ApiResult<TripSessionResponse> {
    let pricing = state
        .catalog
        .pricing(&req.car_id)
        .map_err(plan_error_to_api_error)?;
    let plan = state
        .planner
        .plan_trip(&req.source, &req.destination, req.trip_type, pricing)
        .await
        .map_err(plan_error_to_api_error)?;
    let session = state.sessions.create(req.car_id, plan);
    Ok(Json(session.response()))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TripSessionResponse> {
    state
        .sessions
        .get(&id)
        .map(|session| Json(session.response()))
        .map_err(plan_error_to_api_error)
}

/// Changing endpoints or trip type discards the old plan. Only the most
/// recent replan for a session is kept.
async fn replan_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReplanRequest>,
) -> ApiResult<TripSessionResponse> {
    let ticket = state
        .sessions
        .begin_replan(&id, req.source, req.destination, req.trip_type)
        .map_err(plan_error_to_api_error)?;
    let pricing = state
        .catalog
        .pricing(&ticket.car_id)
        .map_err(plan_error_to_api_error)?;

    let plan = state
        .planner
        .plan_trip(&ticket.source, &ticket.destination, ticket.trip_type, pricing)
        .await
        .map_err(plan_error_to_api_error)?;

    state
        .sessions
        .commit(&ticket, plan)
        .map(|session| Json(session.response()))
        .map_err(plan_error_to_api_error)
}

async fn toggle_stop(
    State(state): State<AppState>,
    Path((id, stop_id)): Path<(String, String)>,
) -> ApiResult<TripSessionResponse> {
    let catalog = &state.catalog;
    state
        .sessions
        .update(&id, |session| {
            let pricing = catalog.pricing(&session.car_id)?;
            itinerary::toggle_stop(&mut session.plan.stops, &stop_id)?;
            itinerary::refresh(&mut session.plan, pricing);
            Ok(())
        })
        .map(|session| Json(session.response()))
        .map_err(plan_error_to_api_error)
}

async fn select_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SelectRouteRequest>,
) -> ApiResult<TripSessionResponse> {
    let catalog = &state.catalog;
    let planner = &state.planner;
    state
        .sessions
        .update(&id, |session| {
            let pricing = catalog.pricing(&session.car_id)?;
            planner.select_route(&mut session.plan, &req.route_id, pricing)
        })
        .map(|session| Json(session.response()))
        .map_err(plan_error_to_api_error)
}

async fn select_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SelectCarRequest>,
) -> ApiResult<TripSessionResponse> {
    let catalog = &state.catalog;
    state
        .sessions
        .update(&id, |session| {
            let pricing = catalog.pricing(&req.car_id)?;
            session.car_id = req.car_id.clone();
            itinerary::refresh(&mut session.plan, pricing);
            Ok(())
        })
        .map(|session| Json(session.response()))
        .map_err(plan_error_to_api_error)
}

async fn trip_gpx(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<GpxResponse> {
    let session = state.sessions.get(&id).map_err(plan_error_to_api_error)?;
    let gpx_base64 = encode_trip_as_gpx(&session.plan).map_err(plan_error_to_api_error)?;
    Ok(Json(GpxResponse { gpx_base64 }))
}

fn bad_request(message: &str) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            message: message.to_string(),
        }),
    )
}

fn plan_error_to_api_error(err: PlanError) -> (StatusCode, Json<ApiError>) {
    let status = match &err {
        PlanError::Routing(_) | PlanError::NoRoute { .. } | PlanError::InvalidRoute(_) => {
            StatusCode::BAD_GATEWAY
        }
        PlanError::UnknownCar(_)
        | PlanError::UnknownSession(_)
        | PlanError::UnknownStop(_)
        | PlanError::UnknownRoute(_) => StatusCode::NOT_FOUND,
        PlanError::EndpointLocked(_) => StatusCode::BAD_REQUEST,
        PlanError::Superseded => StatusCode::CONFLICT,
        PlanError::Gpx(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::warn!("Request failed: {}", err);
    }

    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
