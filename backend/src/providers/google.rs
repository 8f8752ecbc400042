use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ensure_success, PlaceCandidate, PlaceSearch, ProviderError, RouteProvider};
use crate::models::{RouteData, RoutePoint, TollInfo};

pub const ROUTES_BASE_URL: &str = "https://routes.googleapis.com";
pub const PLACES_BASE_URL: &str = "https://places.googleapis.com";

const ROUTES_FIELD_MASK: &str = "routes.distanceMeters,routes.duration,routes.polyline.encodedPolyline,routes.travelAdvisory.tollInfo,routes.routeLabels";
const PLACES_FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.location";
/// Places API rejects circular bias radii above 50 km.
const MAX_BIAS_RADIUS_M: f64 = 50_000.0;
const MAX_PLACE_RESULTS: u32 = 5;
const POLYLINE_PRECISION: u32 = 5;

pub struct GoogleRoutesProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleRoutesProvider {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, ROUTES_BASE_URL)
    }

    pub fn with_base_url(
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RouteProvider for GoogleRoutesProvider {
    fn name(&self) -> &'static str {
        "google-routes"
    }

    async fn fetch_routes(
        &self,
        origin: RoutePoint,
        destination: RoutePoint,
    ) -> Result<Vec<RouteData>, ProviderError> {
        let body = json!({
            "origin": waypoint(origin),
            "destination": waypoint(destination),
            "travelMode": "DRIVE",
            "routingPreference": "TRAFFIC_AWARE",
            "computeAlternativeRoutes": true,
            "extraComputations": ["TOLLS"],
            "languageCode": "en-IN",
            "units": "METRIC",
        });

        let response = self
            .client
            .post(format!("{}/directions/v2:computeRoutes", self.base_url))
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", ROUTES_FIELD_MASK)
            .json(&body)
            .send()
            .await?;
        let text = ensure_success(self.name(), response).await?.text().await?;
        parse_compute_routes(&text)
    }
}

fn waypoint(point: RoutePoint) -> serde_json::Value {
    json!({
        "location": {
            "latLng": { "latitude": point.lat, "longitude": point.lng }
        }
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesResponse {
    #[serde(default)]
    routes: Vec<GoogleRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleRoute {
    #[serde(default)]
    distance_meters: f64,
    #[serde(default)]
    duration: Option<String>,
    polyline: Option<GooglePolyline>,
    #[serde(default)]
    travel_advisory: Option<TravelAdvisory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GooglePolyline {
    encoded_polyline: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TravelAdvisory {
    toll_info: Option<GoogleTollInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleTollInfo {
    #[serde(default)]
    estimated_price: Vec<Money>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Money {
    currency_code: String,
    #[serde(default)]
    units: Option<String>,
    #[serde(default)]
    nanos: Option<i64>,
}

pub fn parse_compute_routes(body: &str) -> Result<Vec<RouteData>, ProviderError> {
    let response: ComputeRoutesResponse =
        serde_json::from_str(body).map_err(|err| ProviderError::Decode {
            provider: "google-routes",
            message: err.to_string(),
        })?;

    response
        .routes
        .into_iter()
        .filter_map(|route| {
            let encoded = route.polyline.as_ref()?.encoded_polyline.as_str();
            Some(decode_polyline(encoded).map(|coordinates| RouteData {
                coordinates,
                distance_km: route.distance_meters / 1000.0,
                duration_minutes: route
                    .duration
                    .as_deref()
                    .and_then(parse_duration_seconds)
                    .unwrap_or(0.0)
                    / 60.0,
                toll_info: route
                    .travel_advisory
                    .and_then(|advisory| advisory.toll_info)
                    .and_then(|tolls| tolls.estimated_price.into_iter().next())
                    .map(|price| TollInfo {
                        amount: money_amount(&price),
                        currency: price.currency_code,
                    }),
            }))
        })
        .collect()
}

pub fn decode_polyline(encoded: &str) -> Result<Vec<RoutePoint>, ProviderError> {
    let line = polyline::decode_polyline(encoded, POLYLINE_PRECISION)
        .map_err(|err| ProviderError::Polyline(err.to_string()))?;
    Ok(line
        .coords()
        .map(|coord| RoutePoint::new(coord.y, coord.x))
        .collect())
}

/// Google encodes durations as protobuf strings such as `"5400s"` or `"12.5s"`.
fn parse_duration_seconds(raw: &str) -> Option<f64> {
    raw.trim().strip_suffix('s')?.parse().ok()
}

fn money_amount(price: &Money) -> f64 {
    let units = price
        .units
        .as_deref()
        .and_then(|units| units.parse::<f64>().ok())
        .unwrap_or(0.0);
    units + price.nanos.unwrap_or(0) as f64 / 1e9
}

pub struct GooglePlacesSearch {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    bias_radius_m: f64,
}

impl GooglePlacesSearch {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, bias_radius_km: f64) -> Self {
        Self::with_base_url(client, api_key, bias_radius_km, PLACES_BASE_URL)
    }

    pub fn with_base_url(
        client: reqwest::Client,
        api_key: impl Into<String>,
        bias_radius_km: f64,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bias_radius_m: (bias_radius_km * 1000.0).clamp(0.0, MAX_BIAS_RADIUS_M),
        }
    }
}

#[async_trait]
impl PlaceSearch for GooglePlacesSearch {
    fn name(&self) -> &'static str {
        "google-places"
    }

    async fn search(
        &self,
        query: &str,
        bias: RoutePoint,
    ) -> Result<Vec<PlaceCandidate>, ProviderError> {
        let body = json!({
            "textQuery": query,
            "maxResultCount": MAX_PLACE_RESULTS,
            "locationBias": {
                "circle": {
                    "center": { "latitude": bias.lat, "longitude": bias.lng },
                    "radius": self.bias_radius_m,
                }
            }
        });

        let response = self
            .client
            .post(format!("{}/v1/places:searchText", self.base_url))
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", PLACES_FIELD_MASK)
            .json(&body)
            .send()
            .await?;
        let text = ensure_success(self.name(), response).await?.text().await?;
        parse_places(&text)
    }
}

#[derive(Debug, Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<GooglePlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GooglePlace {
    display_name: Option<LocalizedText>,
    formatted_address: Option<String>,
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

pub fn parse_places(body: &str) -> Result<Vec<PlaceCandidate>, ProviderError> {
    let response: SearchTextResponse =
        serde_json::from_str(body).map_err(|err| ProviderError::Decode {
            provider: "google-places",
            message: err.to_string(),
        })?;

    Ok(response
        .places
        .into_iter()
        .filter_map(|place| {
            let location = place.location?;
            let name = place.display_name.map(|text| text.text).unwrap_or_default();
            let display_name = place.formatted_address.unwrap_or_else(|| name.clone());
            Some(PlaceCandidate {
                name,
                display_name,
                point: RoutePoint::new(location.latitude, location.longitude),
            })
        })
        .collect())
}
