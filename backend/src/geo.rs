use crate::models::RoutePoint;

const EARTH_RADIUS_KM: f64 = 6_371.0;
const KM_PER_DEGREE_LAT: f64 = 111.0;

pub fn haversine_km(a: RoutePoint, b: RoutePoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

pub fn approximate_distance_km(path: &[RoutePoint]) -> f64 {
    path.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: RoutePoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }

    /// Rectangle spanned by two endpoints, grown by `buffer_km` on every side.
    ///
    /// Longitude margin is corrected with the cosine of the southern edge, so
    /// the box is slightly wider than needed in the north. This is a coarse
    /// pre-filter: points near a corner can be far from the actual road.
    pub fn corridor(start: RoutePoint, end: RoutePoint, buffer_km: f64) -> Self {
        let min_lat = start.lat.min(end.lat);
        let lat_margin = buffer_km / KM_PER_DEGREE_LAT;
        let lng_margin = buffer_km / (KM_PER_DEGREE_LAT * min_lat.to_radians().cos());

        Self {
            min_lat: min_lat - lat_margin,
            max_lat: start.lat.max(end.lat) + lat_margin,
            min_lng: start.lng.min(end.lng) - lng_margin,
            max_lng: start.lng.max(end.lng) + lng_margin,
        }
    }
}

pub fn is_within_corridor(
    point: RoutePoint,
    start: RoutePoint,
    end: RoutePoint,
    buffer_km: f64,
) -> bool {
    BoundingBox::corridor(start, end, buffer_km).contains(point)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSample {
    pub min_distance_km: f64,
    pub route_index: usize,
    pub matched_point: RoutePoint,
}

/// Closest vertex among every `step`-th route point (plus the last one).
///
/// Linear scan; route polylines stay in the hundreds of points and callers
/// check a handful of candidates, so no spatial index is built.
pub fn nearest_route_sample(
    point: RoutePoint,
    route: &[RoutePoint],
    step: usize,
) -> Option<RouteSample> {
    let last = route.len().checked_sub(1)?;
    let step = step.max(1);

    let sampled = (0..route.len()).step_by(step);
    let indices = sampled.chain((last % step != 0).then_some(last));

    indices
        .map(|idx| RouteSample {
            min_distance_km: haversine_km(point, route[idx]),
            route_index: idx,
            matched_point: route[idx],
        })
        .min_by(|a, b| {
            a.min_distance_km
                .partial_cmp(&b.min_distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
