//! Typed view over the JSON the language model returns for stop ideas.
//!
//! The payload is parsed in two passes: the envelope first, then every entry
//! on its own, so one malformed stop only drops that stop.

use serde::{Deserialize, Serialize};

use crate::models::{RoutePoint, StopType};

const DEFAULT_STOP_MINUTES: u32 = 30;
const MAX_STOP_MINUTES: u32 = 8 * 60;

#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error("suggestion payload contains no JSON object")]
    NoJson,
    #[error("suggestion payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A stop idea that passed schema validation but not yet geographic validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateStop {
    pub name: String,
    pub stop_type: StopType,
    /// Distance from the leg's origin, as estimated by the model.
    pub approx_km: f64,
    pub duration_minutes: u32,
    pub description: Option<String>,
    pub coordinates: Option<RoutePoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionBatch {
    pub candidates: Vec<CandidateStop>,
    pub night_halt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default, alias = "suggestions", alias = "places")]
    stops: Vec<serde_json::Value>,
    #[serde(default, alias = "nightHalt", alias = "night_halt_city")]
    night_halt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    name: String,
    #[serde(alias = "type", alias = "category")]
    kind: String,
    #[serde(alias = "approxKm", alias = "km_from_start", alias = "distanceFromStartKm")]
    approx_km: f64,
    #[serde(default, alias = "durationMinutes", alias = "duration")]
    duration_minutes: Option<f64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default, alias = "lon")]
    lng: Option<f64>,
}

pub fn parse_suggestions(content: &str) -> Result<SuggestionBatch, SuggestionError> {
    let json = extract_json_object(content).ok_or(SuggestionError::NoJson)?;
    let envelope: RawEnvelope = serde_json::from_str(json)?;

    let total = envelope.stops.len();
    let candidates: Vec<CandidateStop> = envelope
        .stops
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match validate_entry(value) {
            Ok(candidate) => Some(candidate),
            Err(reason) => {
                tracing::warn!("Dropping suggestion #{idx}: {reason}");
                None
            }
        })
        .collect();

    tracing::debug!("Parsed {}/{} stop suggestions", candidates.len(), total);

    let night_halt = envelope
        .night_halt
        .map(|city| city.trim().to_string())
        .filter(|city| !city.is_empty());

    Ok(SuggestionBatch {
        candidates,
        night_halt,
    })
}

fn validate_entry(value: serde_json::Value) -> Result<CandidateStop, String> {
    let raw: RawSuggestion = serde_json::from_value(value).map_err(|err| err.to_string())?;

    let name = raw.name.trim();
    if name.is_empty() {
        return Err("empty name".into());
    }
    let stop_type =
        stop_type_from_label(&raw.kind).ok_or_else(|| format!("unknown category {:?}", raw.kind))?;
    if !raw.approx_km.is_finite() || raw.approx_km < 0.0 {
        return Err(format!("invalid distance {}", raw.approx_km));
    }

    let duration_minutes = match raw.duration_minutes {
        Some(minutes) if minutes.is_finite() && minutes >= 0.0 => {
            (minutes.round() as u32).min(MAX_STOP_MINUTES)
        }
        _ => DEFAULT_STOP_MINUTES,
    };

    let coordinates = match (raw.lat, raw.lng) {
        (Some(lat), Some(lng))
            if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) =>
        {
            Some(RoutePoint::new(lat, lng))
        }
        _ => None,
    };

    Ok(CandidateStop {
        name: name.to_string(),
        stop_type,
        approx_km: raw.approx_km,
        duration_minutes,
        description: raw
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()),
        coordinates,
    })
}

/// Endpoint types are never accepted from the model.
pub fn stop_type_from_label(label: &str) -> Option<StopType> {
    let label = label.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    let stop_type = match label.as_str() {
        "restaurant" => StopType::Restaurant,
        "food" | "dhaba" | "cafe" | "eatery" => StopType::Food,
        "viewpoint" | "scenic" | "nature" | "lake" | "waterfall" => StopType::Viewpoint,
        "heritage" | "temple" | "fort" | "monument" | "museum" => StopType::Heritage,
        "fuel" | "petrol" | "petrol_pump" | "ev_charging" => StopType::Fuel,
        "rest" | "rest_stop" | "break" => StopType::Rest,
        "night_halt" | "overnight" | "hotel" => StopType::NightHalt,
        _ => return None,
    };
    Some(stop_type)
}

/// Models often wrap JSON in prose or markdown fences.
fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_payload() {
        let content = r#"{
            "stops": [
                {"name": "Srirangapatna", "type": "heritage", "approx_km": 125, "duration_minutes": 60},
                {"name": "Kamat Lokaruchi", "type": "restaurant", "approxKm": 55.5, "durationMinutes": 45,
                 "lat": 12.65, "lng": 77.21}
            ],
            "nightHalt": "Mysuru"
        }"#;

        let batch = parse_suggestions(content).unwrap();
        assert_eq!(batch.candidates.len(), 2);
        assert_eq!(batch.candidates[0].stop_type, StopType::Heritage);
        assert_eq!(batch.candidates[0].coordinates, None);
        assert_eq!(batch.candidates[1].approx_km, 55.5);
        assert_eq!(
            batch.candidates[1].coordinates,
            Some(RoutePoint::new(12.65, 77.21))
        );
        assert_eq!(batch.night_halt.as_deref(), Some("Mysuru"));
    }

    #[test]
    fn strips_markdown_fences() {
        let content = "Here you go:\n```json\n{\"stops\": [{\"name\": \"Nandi Hills\", \"category\": \"viewpoint\", \"approx_km\": 60}]}\n```";
        let batch = parse_suggestions(content).unwrap();
        assert_eq!(batch.candidates.len(), 1);
        assert_eq!(batch.candidates[0].duration_minutes, DEFAULT_STOP_MINUTES);
    }

    #[test]
    fn malformed_entries_are_dropped_individually() {
        let content = r#"{"stops": [
            {"name": "Good Stop", "type": "food", "approx_km": 10},
            {"name": "No Distance", "type": "food"},
            {"name": "   ", "type": "food", "approx_km": 20},
            {"name": "Weird", "type": "spaceport", "approx_km": 30},
            {"name": "Backwards", "type": "rest", "approx_km": -4},
            {"name": "Sneaky Start", "type": "start", "approx_km": 0},
            "not even an object"
        ]}"#;

        let batch = parse_suggestions(content).unwrap();
        let names: Vec<_> = batch.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Good Stop"]);
    }

    #[test]
    fn out_of_range_coordinates_are_ignored() {
        let content = r#"{"stops": [{"name": "X", "type": "fuel", "approx_km": 1, "lat": 123.0, "lng": 77.0}]}"#;
        let batch = parse_suggestions(content).unwrap();
        assert_eq!(batch.candidates[0].coordinates, None);
    }

    #[test]
    fn duration_is_clamped() {
        let content = r#"{"stops": [{"name": "Long", "type": "rest", "approx_km": 1, "duration_minutes": 9999}]}"#;
        let batch = parse_suggestions(content).unwrap();
        assert_eq!(batch.candidates[0].duration_minutes, MAX_STOP_MINUTES);
    }

    #[test]
    fn blank_night_halt_is_none() {
        let batch = parse_suggestions(r#"{"stops": [], "night_halt": "  "}"#).unwrap();
        assert!(batch.candidates.is_empty());
        assert_eq!(batch.night_halt, None);
    }

    #[test]
    fn rejects_payload_without_json() {
        assert!(matches!(
            parse_suggestions("Sorry, I cannot help with that."),
            Err(SuggestionError::NoJson)
        ));
        assert!(matches!(
            parse_suggestions("{ stops: oops }"),
            Err(SuggestionError::Malformed(_))
        ));
    }

    #[test]
    fn label_synonyms() {
        assert_eq!(stop_type_from_label("Night Halt"), Some(StopType::NightHalt));
        assert_eq!(stop_type_from_label("petrol-pump"), Some(StopType::Fuel));
        assert_eq!(stop_type_from_label("end"), None);
    }
}
