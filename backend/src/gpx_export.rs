use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

use crate::error::PlanError;
use crate::models::{RoutePoint, Stop, TripPlan};

const CREATOR: &str = "sarathi";

/// Active route as a track plus one waypoint per selected stop, base64 encoded.
pub fn encode_trip_as_gpx(plan: &TripPlan) -> Result<String, PlanError> {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(CREATOR.into()),
        ..Default::default()
    };

    gpx.waypoints = plan
        .selected_stops()
        .into_iter()
        .map(stop_waypoint)
        .collect();

    let mut track = Track {
        name: Some(format!("{} to {}", plan.source.name, plan.destination.name)),
        ..Default::default()
    };
    let mut segment = TrackSegment::new();
    segment
        .points
        .extend(plan.route.coordinates.iter().copied().map(track_point));
    track.segments.push(segment);
    gpx.tracks.push(track);

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(BASE64.encode(buffer))
}

fn track_point(point: RoutePoint) -> Waypoint {
    Waypoint::new(Point::new(point.lng, point.lat))
}

fn stop_waypoint(stop: &Stop) -> Waypoint {
    let mut waypoint = track_point(stop.location.point());
    waypoint.name = Some(stop.name.clone());
    waypoint.description = Some(stop.location.display_name.clone());
    waypoint.comment = Some(format!("{:?}", stop.stop_type));
    waypoint
}
