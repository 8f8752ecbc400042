//! Stop list assembly and the derived views over it.
//!
//! A plan's `stops` always read in travel order: `start`, onward stops,
//! return stops, `end`. Day groups and trip stats are recomputed from that
//! list whenever a selection or the active route changes.

use crate::error::PlanError;
use crate::fare::{compute_trip_stats, TripStatsInput};
use crate::models::{
    DayPlan, Leg, Location, Pricing, RouteData, Stop, StopType, TripPlan, TripStats, TripType,
};
use crate::route_mapper::{point_at_progress, progress_of_index, RouteMapError};
use crate::suggestions::CandidateStop;
use crate::validator::ValidatedStop;

pub const START_STOP_ID: &str = "start";
pub const END_STOP_ID: &str = "end";

/// Synthetic `start` and `end` stops. A round trip ends back at the source.
pub fn endpoint_stops(source: &Location, destination: &Location, trip_type: TripType) -> (Stop, Stop) {
    let start = endpoint(START_STOP_ID, StopType::Start, source.clone(), Leg::Onward, 0.0);
    let end = match trip_type {
        TripType::OneWay => endpoint(END_STOP_ID, StopType::End, destination.clone(), Leg::Onward, 1.0),
        TripType::RoundTrip => endpoint(END_STOP_ID, StopType::End, source.clone(), Leg::Return, 0.0),
    };
    (start, end)
}

fn endpoint(id: &str, stop_type: StopType, location: Location, leg: Leg, progress: f64) -> Stop {
    Stop {
        id: id.to_string(),
        name: location.name.clone(),
        stop_type,
        location,
        duration: 0,
        is_selected: true,
        detour_km: None,
        leg,
        progress,
    }
}

fn stop_id(leg: Leg, index: usize) -> String {
    format!("{}-{}", leg.as_str(), index)
}

/// Turn validated suggestions into stops, keeping the order they arrive in.
pub fn stops_from_validated(validated: &[ValidatedStop], route_len: usize) -> Vec<Stop> {
    validated
        .iter()
        .enumerate()
        .map(|(i, stop)| Stop {
            id: stop_id(stop.leg, i),
            name: stop.candidate.name.clone(),
            stop_type: stop.candidate.stop_type,
            location: stop.location.clone(),
            duration: stop.candidate.duration_minutes,
            is_selected: true,
            detour_km: Some(detour_for(stop.route_distance_km)),
            leg: stop.leg,
            progress: progress_of_index(route_len, stop.route_index),
        })
        .collect()
}

/// Place suggestions by their own coordinates or, failing that, by their
/// approximate distance along the route.
///
/// Used when validation rejected every candidate, so the user still sees
/// the suggestions rather than an empty itinerary.
pub fn place_unvalidated(
    candidates: &[CandidateStop],
    leg: Leg,
    route: &RouteData,
) -> Result<Vec<Stop>, RouteMapError> {
    let total_km = route.distance_km;
    let mut placed = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        // Return suggestions count km from the destination.
        let km_along = match leg {
            Leg::Onward => candidate.approx_km,
            Leg::Return => total_km - candidate.approx_km,
        };
        let point = match candidate.coordinates {
            Some(point) => point,
            None => point_at_progress(&route.coordinates, km_along, total_km)?,
        };
        let progress = if total_km > 0.0 {
            (km_along / total_km).clamp(0.0, 1.0)
        } else {
            0.0
        };
        placed.push((candidate, point, progress));
    }

    placed.sort_by(|a, b| match leg {
        Leg::Onward => a.2.total_cmp(&b.2),
        Leg::Return => b.2.total_cmp(&a.2),
    });

    Ok(placed
        .into_iter()
        .enumerate()
        .map(|(i, (candidate, point, progress))| Stop {
            id: stop_id(leg, i),
            name: candidate.name.clone(),
            stop_type: candidate.stop_type,
            location: Location::new(
                candidate.name.clone(),
                candidate.name.clone(),
                point.lat,
                point.lng,
            ),
            duration: candidate.duration_minutes,
            is_selected: true,
            detour_km: None,
            leg,
            progress,
        })
        .collect())
}

/// Out to the stop and back again.
pub fn detour_for(route_distance_km: f64) -> f64 {
    ((route_distance_km * 2.0) * 10.0).round() / 10.0
}

pub fn assemble_stops(start: Stop, onward: Vec<Stop>, ret: Vec<Stop>, end: Stop) -> Vec<Stop> {
    let mut stops = Vec::with_capacity(onward.len() + ret.len() + 2);
    stops.push(start);
    stops.extend(onward);
    stops.extend(ret);
    stops.push(end);
    stops
}

/// Selected stops other than `start` and `end`, in travel order.
pub fn selected_non_endpoint_stops(stops: &[Stop]) -> Vec<Stop> {
    stops
        .iter()
        .filter(|stop| stop.is_selected && !stop.stop_type.is_endpoint())
        .cloned()
        .collect()
}

pub fn trip_stats_for(
    stops: &[Stop],
    route: &RouteData,
    trip_type: TripType,
    pricing: Pricing,
    night_halt_hint: Option<&str>,
) -> TripStats {
    let selected = selected_non_endpoint_stops(stops);
    compute_trip_stats(&TripStatsInput {
        distance_km: route.distance_km,
        duration_minutes: route.duration_minutes,
        selected_stops: &selected,
        pricing,
        trip_type,
        toll_amount: route.toll_info.as_ref().map(|toll| toll.amount),
        night_halt_hint,
    })
}

/// Split the selected stops into `total_days` groups of roughly equal size.
///
/// Day 1 opens with `start` and the last day closes with `end`. Days after
/// the stops run out stay empty so the list length always equals the day count.
pub fn group_by_day(stops: &[Stop], total_days: u32) -> Vec<DayPlan> {
    let days = total_days.max(1) as usize;
    let middle = selected_non_endpoint_stops(stops);
    let per_day = middle.len().div_ceil(days).max(1);

    let mut plans: Vec<DayPlan> = (1..=days)
        .map(|day| DayPlan {
            day: day as u32,
            stops: Vec::new(),
        })
        .collect();

    for (i, stop) in middle.into_iter().enumerate() {
        plans[(i / per_day).min(days - 1)].stops.push(stop);
    }

    let selected_endpoint = |stop_type: StopType| {
        stops
            .iter()
            .find(|stop| stop.is_selected && stop.stop_type == stop_type)
            .cloned()
    };
    if let Some(start) = selected_endpoint(StopType::Start) {
        plans[0].stops.insert(0, start);
    }
    if let Some(end) = selected_endpoint(StopType::End) {
        plans[days - 1].stops.push(end);
    }
    plans
}

/// Flip a stop's selection. Endpoints are always part of the trip.
pub fn toggle_stop(stops: &mut [Stop], stop_id: &str) -> Result<bool, PlanError> {
    let stop = stops
        .iter_mut()
        .find(|stop| stop.id == stop_id)
        .ok_or_else(|| PlanError::UnknownStop(stop_id.to_string()))?;
    if stop.stop_type.is_endpoint() {
        return Err(PlanError::EndpointLocked(stop_id.to_string()));
    }
    stop.is_selected = !stop.is_selected;
    Ok(stop.is_selected)
}

/// Recompute trip stats and day groups after the stop list or route changed.
pub fn refresh(plan: &mut TripPlan, pricing: Pricing) {
    plan.trip_stats = trip_stats_for(
        &plan.stops,
        &plan.route,
        plan.trip_type,
        pricing,
        plan.night_halt_hint.as_deref(),
    );
    plan.days = group_by_day(&plan.stops, plan.trip_stats.total_days);
}
