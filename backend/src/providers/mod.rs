//! External collaborators: routing, place search and stop suggestions.
//!
//! Each concern is a trait so the planner can run against Google, OSRM,
//! Nominatim and OpenRouter in production and against in-process fakes in
//! tests. Fallback chains are themselves implementations of the traits.

pub mod google;
pub mod nominatim;
pub mod openrouter;
pub mod osrm;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{Leg, RoutePoint, TripType};
use crate::suggestions::{SuggestionBatch, SuggestionError};

pub use google::{GooglePlacesSearch, GoogleRoutesProvider};
pub use nominatim::NominatimGeocoder;
pub use openrouter::OpenRouterSuggester;
pub use osrm::OsrmRouteProvider;

const USER_AGENT: &str = concat!("sarathi/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("could not decode {provider} response: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },
    #[error("invalid encoded polyline: {0}")]
    Polyline(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error(transparent)]
    Suggestion(#[from] SuggestionError),
}

/// One geocoding or place-search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub display_name: String,
    pub point: RoutePoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuggestionQuery {
    pub source: String,
    pub destination: String,
    /// Rounded to whole kilometres so the query can serve as a cache key.
    pub distance_km: u32,
    pub leg: Leg,
    pub trip_type: TripType,
}

#[async_trait]
pub trait RouteProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Routes between two points, best first. May be empty.
    async fn fetch_routes(
        &self,
        origin: RoutePoint,
        destination: RoutePoint,
    ) -> Result<Vec<crate::models::RouteData>, ProviderError>;
}

#[async_trait]
pub trait PlaceSearch: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(
        &self,
        query: &str,
        bias: RoutePoint,
    ) -> Result<Vec<PlaceCandidate>, ProviderError>;
}

#[async_trait]
pub trait StopSuggester: Send + Sync {
    async fn suggest_stops(&self, query: &SuggestionQuery)
        -> Result<SuggestionBatch, ProviderError>;
}

/// Tries each route provider in order until one returns at least one route.
pub struct FallbackRouteProvider {
    providers: Vec<Arc<dyn RouteProvider>>,
}

impl FallbackRouteProvider {
    pub fn new(providers: Vec<Arc<dyn RouteProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl RouteProvider for FallbackRouteProvider {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn fetch_routes(
        &self,
        origin: RoutePoint,
        destination: RoutePoint,
    ) -> Result<Vec<crate::models::RouteData>, ProviderError> {
        let mut last_error = None;
        for provider in &self.providers {
            match provider.fetch_routes(origin, destination).await {
                Ok(routes) if !routes.is_empty() => {
                    tracing::debug!("{} returned {} route(s)", provider.name(), routes.len());
                    return Ok(routes);
                }
                Ok(_) => {
                    tracing::warn!("{} returned no routes", provider.name());
                    // A later provider answering "no route" outranks an earlier outage.
                    last_error = None;
                }
                Err(err) => {
                    tracing::warn!("{} routing failed: {}", provider.name(), err);
                    last_error = Some(err);
                }
            }
        }
        match last_error {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        }
    }
}

/// Tries each place search in order until one returns a hit.
pub struct FallbackPlaceSearch {
    searches: Vec<Arc<dyn PlaceSearch>>,
}

impl FallbackPlaceSearch {
    pub fn new(searches: Vec<Arc<dyn PlaceSearch>>) -> Self {
        Self { searches }
    }
}

#[async_trait]
impl PlaceSearch for FallbackPlaceSearch {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn search(
        &self,
        query: &str,
        bias: RoutePoint,
    ) -> Result<Vec<PlaceCandidate>, ProviderError> {
        let mut last_error = None;
        for search in &self.searches {
            match search.search(query, bias).await {
                Ok(hits) if !hits.is_empty() => return Ok(hits),
                Ok(_) => tracing::debug!("{} found nothing for {query:?}", search.name()),
                Err(err) => {
                    tracing::debug!("{} failed for {query:?}: {}", search.name(), err);
                    last_error = Some(err);
                }
            }
        }
        match last_error {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        }
    }
}

pub fn http_client() -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

/// Turn a non-2xx response into `ProviderError::Status` with the body kept for logs.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        provider,
        status: status.as_u16(),
        body,
    })
}
