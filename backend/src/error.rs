use thiserror::Error;

use crate::providers::ProviderError;
use crate::route_mapper::RouteMapError;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("could not plan trip: {0}")]
    Routing(#[source] ProviderError),
    #[error("could not plan trip: no route between {from} and {to}")]
    NoRoute { from: String, to: String },
    #[error(transparent)]
    InvalidRoute(#[from] RouteMapError),
    #[error("unknown car {0:?}")]
    UnknownCar(String),
    #[error("trip session {0} not found")]
    UnknownSession(String),
    #[error("stop {0:?} not found")]
    UnknownStop(String),
    #[error("route option {0:?} not found")]
    UnknownRoute(String),
    #[error("stop {0:?} is a trip endpoint and cannot be deselected")]
    EndpointLocked(String),
    #[error("plan was superseded by a newer request")]
    Superseded,
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
}
