use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
}

impl RoutePoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn interpolate(self, other: Self, t: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }
}

/// A named point of interest or trip endpoint. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub display_name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            lat,
            lng,
        }
    }

    pub fn point(&self) -> RoutePoint {
        RoutePoint::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TollInfo {
    pub currency: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteData {
    pub coordinates: Vec<RoutePoint>,
    pub distance_km: f64,
    pub duration_minutes: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toll_info: Option<TollInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOption {
    pub id: String,
    pub label: String,
    pub highlights: Vec<String>,
    pub color: String,
    pub is_recommended: bool,
    pub route: RouteData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopType {
    Start,
    End,
    Restaurant,
    Viewpoint,
    Heritage,
    Fuel,
    Rest,
    NightHalt,
    Food,
}

impl StopType {
    pub fn is_endpoint(self) -> bool {
        matches!(self, StopType::Start | StopType::End)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leg {
    Onward,
    Return,
}

impl Leg {
    pub fn as_str(self) -> &'static str {
        match self {
            Leg::Onward => "onward",
            Leg::Return => "return",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub stop_type: StopType,
    pub location: Location,
    /// Visit duration in minutes. Always zero for `start` and `end`.
    pub duration: u32,
    #[serde(default = "default_selected")]
    pub is_selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detour_km: Option<f64>,
    pub leg: Leg,
    /// Fraction (0..=1) of the active route at which the stop sits.
    #[serde(default)]
    pub progress: f64,
}

fn default_selected() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripType {
    #[serde(rename = "one-way")]
    OneWay,
    #[serde(rename = "round-trip")]
    RoundTrip,
}

impl TripType {
    pub fn is_round_trip(self) -> bool {
        matches!(self, TripType::RoundTrip)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub base_fare: f64,
    pub per_km_rate: f64,
    pub driver_allowance_per_day: f64,
}

/// Read-only catalog entry describing a rentable vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: String,
    pub name: String,
    pub category: String,
    pub seats: u8,
    pub base_fare: f64,
    pub per_km_rate: f64,
    pub driver_allowance_per_day: f64,
}

impl Car {
    pub fn pricing(&self) -> Pricing {
        Pricing {
            base_fare: self.base_fare,
            per_km_rate: self.per_km_rate,
            driver_allowance_per_day: self.driver_allowance_per_day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripStats {
    pub total_distance_km: f64,
    pub total_drive_time_hours: f64,
    pub total_days: u32,
    pub base_fare: f64,
    pub extra_km_charge: f64,
    pub driver_allowance: f64,
    pub total_fare: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toll_estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_night_halt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    pub stops: Vec<Stop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub source: Location,
    pub destination: Location,
    pub trip_type: TripType,
    pub route: RouteData,
    pub route_options: Vec<RouteOption>,
    pub selected_route_id: String,
    pub stops: Vec<Stop>,
    pub trip_stats: TripStats,
    pub days: Vec<DayPlan>,
    /// False when stops were placed approximately because validation rejected every candidate.
    pub stops_validated: bool,
    /// Overnight city proposed alongside the stop suggestions, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night_halt_hint: Option<String>,
}

impl TripPlan {
    /// Selected stops in travel order: `start` first, `end` last.
    pub fn selected_stops(&self) -> Vec<&Stop> {
        self.stops.iter().filter(|stop| stop.is_selected).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTripRequest {
    pub source: Location,
    pub destination: Location,
    pub trip_type: TripType,
    pub car_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplanRequest {
    #[serde(default)]
    pub source: Option<Location>,
    #[serde(default)]
    pub destination: Option<Location>,
    #[serde(default)]
    pub trip_type: Option<TripType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectRouteRequest {
    pub route_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectCarRequest {
    pub car_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSessionResponse {
    pub session_id: String,
    pub car_id: String,
    pub plan: TripPlan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareRequest {
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub trip_type: TripType,
    #[serde(default)]
    pub stop_durations: Vec<u32>,
    #[serde(default)]
    pub car_id: Option<String>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpxResponse {
    pub gpx_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub session_id: String,
    pub customer_name: String,
    pub phone: String,
    pub pickup_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub reference: String,
    pub status: BookingStatus,
    pub customer_name: String,
    pub phone: String,
    pub pickup_date: String,
    pub car: Car,
    pub source: Location,
    pub destination: Location,
    pub trip_type: TripType,
    pub trip_stats: TripStats,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_type_uses_hyphenated_names() {
        assert_eq!(serde_json::to_string(&TripType::RoundTrip).unwrap(), "\"round-trip\"");
        let parsed: TripType = serde_json::from_str("\"one-way\"").unwrap();
        assert_eq!(parsed, TripType::OneWay);
    }

    #[test]
    fn stop_type_serializes_as_type_field() {
        let stop = Stop {
            id: "onward-0".into(),
            name: "Srirangapatna".into(),
            stop_type: StopType::NightHalt,
            location: Location::new("Srirangapatna", "Srirangapatna, Karnataka", 12.42, 76.68),
            duration: 60,
            is_selected: true,
            detour_km: None,
            leg: Leg::Return,
            progress: 0.5,
        };
        let json = serde_json::to_value(&stop).unwrap();
        assert_eq!(json["type"], "night_halt");
        assert_eq!(json["leg"], "return");
        assert!(json.get("detour_km").is_none());
    }

    #[test]
    fn selected_flag_defaults_to_true() {
        let json = r#"{
            "id": "x", "name": "x", "type": "food",
            "location": {"name": "x", "display_name": "x", "lat": 0.0, "lng": 0.0},
            "duration": 30, "leg": "onward"
        }"#;
        let stop: Stop = serde_json::from_str(json).unwrap();
        assert!(stop.is_selected);
        assert_eq!(stop.progress, 0.0);
    }
}
