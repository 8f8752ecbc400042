use async_trait::async_trait;
use serde::Deserialize;

use super::{ensure_success, PlaceCandidate, PlaceSearch, ProviderError};
use crate::models::RoutePoint;

pub const PUBLIC_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

const RESULT_LIMIT: &str = "5";
/// Half-width in degrees of the preferred viewbox around the bias point.
const VIEWBOX_HALF_DEG: f64 = 1.0;

/// General-purpose geocoder used when place search finds nothing.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PlaceSearch for NominatimGeocoder {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn search(
        &self,
        query: &str,
        bias: RoutePoint,
    ) -> Result<Vec<PlaceCandidate>, ProviderError> {
        // Non-bounded viewbox: results nearby rank higher but others still come back.
        let viewbox = format!(
            "{},{},{},{}",
            bias.lng - VIEWBOX_HALF_DEG,
            bias.lat + VIEWBOX_HALF_DEG,
            bias.lng + VIEWBOX_HALF_DEG,
            bias.lat - VIEWBOX_HALF_DEG
        );
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", RESULT_LIMIT),
                ("viewbox", viewbox.as_str()),
            ])
            .send()
            .await?;
        let text = ensure_success(self.name(), response).await?.text().await?;
        parse_nominatim(&text)
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    name: Option<String>,
}

pub fn parse_nominatim(body: &str) -> Result<Vec<PlaceCandidate>, ProviderError> {
    let results: Vec<NominatimResult> =
        serde_json::from_str(body).map_err(|err| ProviderError::Decode {
            provider: "nominatim",
            message: err.to_string(),
        })?;

    Ok(results
        .into_iter()
        .filter_map(|result| {
            let lat = result.lat.parse().ok()?;
            let lng = result.lon.parse().ok()?;
            let name = result
                .name
                .filter(|name| !name.is_empty())
                .or_else(|| result.display_name.split(',').next().map(str::to_string))
                .unwrap_or_default();
            Some(PlaceCandidate {
                name,
                display_name: result.display_name,
                point: RoutePoint::new(lat, lng),
            })
        })
        .collect())
}
