use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TTL_DAYS};
use crate::catalog::{Catalog, CatalogError};
use crate::planner::{PlannerConfig, TripPlanner};
use crate::providers::{
    http_client, openrouter, FallbackPlaceSearch, FallbackRouteProvider, GooglePlacesSearch,
    GoogleRoutesProvider, NominatimGeocoder, OpenRouterSuggester, OsrmRouteProvider, PlaceSearch,
    ProviderError, RouteProvider,
};
use crate::validator::{
    ValidatorConfig, DEFAULT_CORRIDOR_BUFFER_KM, DEFAULT_DETOUR_SAMPLE_STEP,
    DEFAULT_MAX_ROUTE_DISTANCE_KM, DEFAULT_SAMPLE_STEP,
};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Sarathi trip planning API")]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "SARATHI_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,

    /// Google Maps Platform key for Routes and Places. Without it, OSRM and Nominatim are used.
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    pub google_maps_api_key: Option<String>,

    /// OpenRouter key for stop suggestions. Without it, trips have no suggested stops.
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub openrouter_api_key: Option<String>,

    #[arg(long, env = "OPENROUTER_MODEL", default_value = openrouter::DEFAULT_MODEL)]
    pub openrouter_model: String,

    #[arg(long, env = "OSRM_URL", default_value = crate::providers::osrm::PUBLIC_OSRM_URL)]
    pub osrm_url: String,

    #[arg(long, env = "NOMINATIM_URL", default_value = crate::providers::nominatim::PUBLIC_NOMINATIM_URL)]
    pub nominatim_url: String,

    /// JSON file with the car catalog. The built-in catalog is used when absent.
    #[arg(long, env = "CARS_JSON")]
    pub cars_json: Option<PathBuf>,

    /// Half-width in km of the box around a leg's endpoints that stops must fall in
    #[arg(long, env = "SARATHI_CORRIDOR_BUFFER_KM", default_value_t = DEFAULT_CORRIDOR_BUFFER_KM)]
    pub corridor_buffer_km: f64,

    /// Farthest a stop may sit from the route, in km
    #[arg(long, env = "SARATHI_MAX_ROUTE_DISTANCE_KM", default_value_t = DEFAULT_MAX_ROUTE_DISTANCE_KM)]
    pub max_route_distance_km: f64,

    #[arg(long, env = "SARATHI_SAMPLE_STEP", default_value_t = DEFAULT_SAMPLE_STEP)]
    pub sample_step: usize,

    #[arg(long, env = "SARATHI_DETOUR_SAMPLE_STEP", default_value_t = DEFAULT_DETOUR_SAMPLE_STEP)]
    pub detour_sample_step: usize,

    /// Place search bias radius in km (capped at 50 by Google)
    #[arg(long, env = "SARATHI_PLACES_RADIUS_KM", default_value_t = 50.0)]
    pub places_radius_km: f64,

    #[arg(long, env = "SARATHI_CACHE_TTL_DAYS", default_value_t = DEFAULT_TTL_DAYS)]
    pub cache_ttl_days: i64,

    #[arg(long, env = "SARATHI_CACHE_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub cache_capacity: usize,
}

impl Config {
    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            corridor_buffer_km: self.corridor_buffer_km,
            max_route_distance_km: self.max_route_distance_km,
            sample_step: self.sample_step.max(1),
            detour_sample_step: self.detour_sample_step.max(1),
        }
    }

    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            validator: self.validator_config(),
            cache_capacity: NonZeroUsize::new(self.cache_capacity).unwrap_or(NonZeroUsize::MIN),
            cache_ttl: chrono::Duration::days(self.cache_ttl_days.max(0)),
        }
    }

    fn google_key(&self) -> Option<&str> {
        self.google_maps_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Wire the provider chains: Google first when keyed, open services after.
    pub fn planner(&self) -> Result<TripPlanner, ProviderError> {
        let client = http_client()?;

        let mut routes: Vec<Arc<dyn RouteProvider>> = Vec::new();
        let mut places: Vec<Arc<dyn PlaceSearch>> = Vec::new();
        match self.google_key() {
            Some(key) => {
                routes.push(Arc::new(GoogleRoutesProvider::new(client.clone(), key)));
                places.push(Arc::new(GooglePlacesSearch::new(
                    client.clone(),
                    key,
                    self.places_radius_km,
                )));
            }
            None => tracing::warn!("GOOGLE_MAPS_API_KEY not set, routing through OSRM only"),
        }
        routes.push(Arc::new(OsrmRouteProvider::new(client.clone(), self.osrm_url.as_str())));
        places.push(Arc::new(NominatimGeocoder::new(
            client.clone(),
            self.nominatim_url.as_str(),
        )));

        if self.openrouter_api_key.is_none() {
            tracing::warn!("OPENROUTER_API_KEY not set, trips will have no suggested stops");
        }
        let suggester =
            OpenRouterSuggester::new(client, self.openrouter_api_key.clone(), &self.openrouter_model);

        Ok(TripPlanner::new(
            Arc::new(FallbackRouteProvider::new(routes)),
            Arc::new(suggester),
            Arc::new(FallbackPlaceSearch::new(places)),
            self.planner_config(),
        ))
    }

    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.cars_json {
            Some(path) => Catalog::from_path(path),
            None => Ok(Catalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_validator_defaults() {
        let config = Config::parse_from(["sarathi"]);
        assert_eq!(config.validator_config(), ValidatorConfig::default());
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.planner_config().cache_ttl, chrono::Duration::days(7));
    }

    #[test]
    fn flags_override_thresholds() {
        let config = Config::parse_from([
            "sarathi",
            "--max-route-distance-km",
            "25",
            "--sample-step",
            "0",
            "--cache-capacity",
            "0",
        ]);
        let validator = config.validator_config();
        assert_eq!(validator.max_route_distance_km, 25.0);
        assert_eq!(validator.sample_step, 1);
        assert_eq!(config.planner_config().cache_capacity.get(), 1);
    }

    #[test]
    fn blank_google_key_counts_as_missing() {
        let config = Config::parse_from(["sarathi", "--google-maps-api-key", "  "]);
        assert!(config.google_key().is_none());
    }
}
