use crate::models::{Pricing, Stop, TripStats, TripType};

/// Effective driving (plus sightseeing) hours the driver covers per billed day.
pub const HOURS_PER_DAY: f64 = 10.0;
/// Kilometres bundled into each billed day before per-km charges apply.
pub const INCLUDED_KM_PER_DAY: f64 = 250.0;
/// Drive time above which a multi-day trip gets a night halt suggestion.
pub const NIGHT_HALT_DRIVE_HOURS: f64 = 8.0;

#[derive(Debug, Clone)]
pub struct TripStatsInput<'a> {
    pub distance_km: f64,
    pub duration_minutes: f64,
    /// Currently selected stops, excluding `start` and `end`.
    pub selected_stops: &'a [Stop],
    pub pricing: Pricing,
    pub trip_type: TripType,
    pub toll_amount: Option<f64>,
    pub night_halt_hint: Option<&'a str>,
}

/// Fare and duration breakdown for one trip. Pure: no I/O, no clock.
pub fn compute_trip_stats(input: &TripStatsInput<'_>) -> TripStats {
    let stop_minutes: f64 = input
        .selected_stops
        .iter()
        .filter(|stop| !stop.stop_type.is_endpoint())
        .map(|stop| f64::from(stop.duration))
        .sum();

    // Stops are visited once, so only the drive is doubled.
    let legs = if input.trip_type.is_round_trip() { 2.0 } else { 1.0 };
    let distance_km = input.distance_km * legs;
    let drive_minutes = input.duration_minutes * legs;

    let total_trip_hours = (drive_minutes + stop_minutes) / 60.0;
    let total_days = billed_days(total_trip_hours);

    let included_km = INCLUDED_KM_PER_DAY * f64::from(total_days);
    let extra_km = (distance_km - included_km).max(0.0);
    let extra_km_charge = (extra_km * input.pricing.per_km_rate).max(0.0);

    // The first day's allowance is part of the base fare.
    let driver_allowance =
        (f64::from(total_days - 1) * input.pricing.driver_allowance_per_day).max(0.0);

    let total_fare = (input.pricing.base_fare + extra_km_charge + driver_allowance).round();
    let drive_hours = drive_minutes / 60.0;

    let suggested_night_halt = if drive_hours > NIGHT_HALT_DRIVE_HOURS && total_days > 1 {
        input
            .night_halt_hint
            .map(str::to_string)
            .or_else(|| midpoint_stop(input.selected_stops).map(|stop| stop.name.clone()))
    } else {
        None
    };

    TripStats {
        total_distance_km: distance_km,
        total_drive_time_hours: drive_hours,
        total_days,
        base_fare: input.pricing.base_fare,
        extra_km_charge,
        driver_allowance,
        total_fare,
        toll_estimate: input.toll_amount.map(|amount| amount * legs),
        suggested_night_halt,
    }
}

fn billed_days(total_trip_hours: f64) -> u32 {
    let days = (total_trip_hours / HOURS_PER_DAY).ceil();
    if days.is_finite() && days > 1.0 {
        days as u32
    } else {
        1
    }
}

fn midpoint_stop(stops: &[Stop]) -> Option<&Stop> {
    stops
        .iter()
        .filter(|stop| !stop.stop_type.is_endpoint())
        .min_by(|a, b| {
            (a.progress - 0.5)
                .abs()
                .partial_cmp(&(b.progress - 0.5).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
