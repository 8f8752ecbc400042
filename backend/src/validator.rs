use std::{collections::HashSet, sync::Arc};

use crate::{
    geo::{is_within_corridor, nearest_route_sample, RouteSample},
    models::{Leg, Location, RoutePoint},
    providers::{PlaceCandidate, PlaceSearch},
    suggestions::CandidateStop,
};

pub const DEFAULT_CORRIDOR_BUFFER_KM: f64 = 100.0;
pub const DEFAULT_MAX_ROUTE_DISTANCE_KM: f64 = 50.0;
pub const DEFAULT_SAMPLE_STEP: usize = 2;
pub const DEFAULT_DETOUR_SAMPLE_STEP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatorConfig {
    /// Buffer around the leg's endpoints for the rectangular pre-filter.
    pub corridor_buffer_km: f64,
    /// Hard gate on distance to the nearest sampled route vertex.
    pub max_route_distance_km: f64,
    /// Vertex stride when matching candidates against the route.
    pub sample_step: usize,
    /// Vertex stride when re-projecting stops onto an alternate route.
    pub detour_sample_step: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            corridor_buffer_km: DEFAULT_CORRIDOR_BUFFER_KM,
            max_route_distance_km: DEFAULT_MAX_ROUTE_DISTANCE_KM,
            sample_step: DEFAULT_SAMPLE_STEP,
            detour_sample_step: DEFAULT_DETOUR_SAMPLE_STEP,
        }
    }
}

/// A suggestion confirmed to exist near the route.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedStop {
    pub candidate: CandidateStop,
    pub location: Location,
    pub leg: Leg,
    pub route_distance_km: f64,
    pub route_index: usize,
}

pub struct StopValidator {
    places: Arc<dyn PlaceSearch>,
    config: ValidatorConfig,
}

impl StopValidator {
    pub fn new(places: Arc<dyn PlaceSearch>, config: ValidatorConfig) -> Self {
        Self { places, config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Geocode suggestions and keep the ones that really sit along the route.
    ///
    /// Candidates that cannot be found, fall outside the corridor, or are
    /// farther than `max_route_distance_km` from the route are dropped with a
    /// log line. Survivors come back in travel order for `leg`: ascending
    /// route index onward, descending on the way back.
    pub async fn validate_stops(
        &self,
        candidates: &[CandidateStop],
        leg: Leg,
        leg_source: &Location,
        leg_dest: &Location,
        route: &[RoutePoint],
    ) -> Vec<ValidatedStop> {
        if route.is_empty() {
            tracing::warn!("Cannot validate {} stops against an empty route", candidates.len());
            return Vec::new();
        }
        let bias = route[route.len() / 2];

        let mut validated = Vec::with_capacity(candidates.len());
        let mut seen = HashSet::new();

        // Sequential on purpose: geocoders rate-limit aggressively.
        for candidate in candidates {
            let hits = match self.places.search(&candidate.name, bias).await {
                Ok(hits) => hits,
                Err(err) => {
                    tracing::warn!("Geocoding {:?} failed: {}", candidate.name, err);
                    continue;
                }
            };
            if hits.is_empty() {
                tracing::debug!("Rejected {:?}: no geocoding result", candidate.name);
                continue;
            }

            let Some((place, sample)) = self.best_match(&hits, leg_source, leg_dest, route) else {
                tracing::debug!(
                    "Rejected {:?}: none of {} result(s) within {:.0} km of the route",
                    candidate.name,
                    hits.len(),
                    self.config.max_route_distance_km
                );
                continue;
            };

            let key = (
                (place.point.lat * 1e4).round() as i64,
                (place.point.lng * 1e4).round() as i64,
            );
            if !seen.insert(key) {
                tracing::debug!("Rejected {:?}: duplicate of an earlier stop", candidate.name);
                continue;
            }

            tracing::debug!(
                "Accepted {:?} at {:.1} km from route (index {})",
                candidate.name,
                sample.min_distance_km,
                sample.route_index
            );
            validated.push(ValidatedStop {
                candidate: candidate.clone(),
                location: Location::new(
                    candidate.name.clone(),
                    place.display_name.clone(),
                    place.point.lat,
                    place.point.lng,
                ),
                leg,
                route_distance_km: sample.min_distance_km,
                route_index: sample.route_index,
            });
        }

        match leg {
            Leg::Onward => validated.sort_by_key(|stop| stop.route_index),
            Leg::Return => validated.sort_by_key(|stop| std::cmp::Reverse(stop.route_index)),
        }

        tracing::info!(
            "Validated {}/{} {} stop(s)",
            validated.len(),
            candidates.len(),
            leg.as_str()
        );
        validated
    }

    fn best_match<'h>(
        &self,
        hits: &'h [PlaceCandidate],
        leg_source: &Location,
        leg_dest: &Location,
        route: &[RoutePoint],
    ) -> Option<(&'h PlaceCandidate, RouteSample)> {
        hits.iter()
            .filter(|hit| {
                is_within_corridor(
                    hit.point,
                    leg_source.point(),
                    leg_dest.point(),
                    self.config.corridor_buffer_km,
                )
            })
            .filter_map(|hit| {
                nearest_route_sample(hit.point, route, self.config.sample_step)
                    .map(|sample| (hit, sample))
            })
            .filter(|(_, sample)| sample.min_distance_km <= self.config.max_route_distance_km)
            .min_by(|(_, a), (_, b)| {
                a.min_distance_km
                    .partial_cmp(&b.min_distance_km)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}
