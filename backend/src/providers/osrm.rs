use async_trait::async_trait;
use serde::Deserialize;

use super::{ensure_success, ProviderError, RouteProvider};
use crate::models::{RouteData, RoutePoint};

pub const PUBLIC_OSRM_URL: &str = "https://router.project-osrm.org";

pub struct OsrmRouteProvider {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmRouteProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RouteProvider for OsrmRouteProvider {
    fn name(&self) -> &'static str {
        "osrm"
    }

    async fn fetch_routes(
        &self,
        origin: RoutePoint,
        destination: RoutePoint,
    ) -> Result<Vec<RouteData>, ProviderError> {
        // OSRM wants lng,lat pairs.
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, origin.lng, origin.lat, destination.lng, destination.lat
        );
        let response = self
            .client
            .get(url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("alternatives", "true"),
            ])
            .send()
            .await?;
        let text = ensure_success(self.name(), response).await?.text().await?;
        parse_osrm_routes(&text)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

pub fn parse_osrm_routes(body: &str) -> Result<Vec<RouteData>, ProviderError> {
    let response: OsrmResponse = serde_json::from_str(body).map_err(|err| ProviderError::Decode {
        provider: "osrm",
        message: err.to_string(),
    })?;

    match response.code.as_str() {
        "Ok" => {}
        // No route between the points is an empty answer, not a failure.
        "NoRoute" => return Ok(Vec::new()),
        code => {
            return Err(ProviderError::Decode {
                provider: "osrm",
                message: format!("{code}: {}", response.message.unwrap_or_default()),
            })
        }
    }

    Ok(response
        .routes
        .into_iter()
        .filter(|route| !route.geometry.coordinates.is_empty())
        .map(|route| RouteData {
            coordinates: route
                .geometry
                .coordinates
                .iter()
                .map(|[lng, lat]| RoutePoint::new(*lat, *lng))
                .collect(),
            distance_km: route.distance / 1000.0,
            duration_minutes: route.duration / 60.0,
            toll_info: None,
        })
        .collect())
}
