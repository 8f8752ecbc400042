use crate::models::RoutePoint;

const MAX_PROGRESS: f64 = 0.99;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteMapError {
    #[error("invalid route: no coordinates to map onto")]
    EmptyRoute,
}

/// Map a distance along the route onto one of its vertices.
///
/// Indexes the polyline proportionally, which assumes evenly spaced vertices.
/// Provider polylines are denser in cities, so the point is directionally
/// right but not distance-exact.
pub fn point_at_progress(
    route: &[RoutePoint],
    approximate_km: f64,
    total_km: f64,
) -> Result<RoutePoint, RouteMapError> {
    if route.is_empty() {
        return Err(RouteMapError::EmptyRoute);
    }

    let idx = index_at_fraction(route.len(), approximate_km / total_km);
    Ok(route[idx])
}

pub(crate) fn index_at_fraction(len: usize, fraction: f64) -> usize {
    // NaN comes from 0 / 0; +inf (km past a zero-length route) clamps high.
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, MAX_PROGRESS)
    };
    ((fraction * len as f64).floor() as usize).min(len.saturating_sub(1))
}

/// Fraction of the route covered at vertex `index`.
pub fn progress_of_index(route_len: usize, index: usize) -> f64 {
    if route_len < 2 {
        return 0.0;
    }
    (index as f64 / (route_len - 1) as f64).clamp(0.0, 1.0)
}
