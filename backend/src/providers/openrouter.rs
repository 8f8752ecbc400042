use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ensure_success, ProviderError, StopSuggester, SuggestionQuery};
use crate::models::Leg;
use crate::suggestions::{parse_suggestions, SuggestionBatch};

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";

const MAX_SUGGESTIONS: usize = 12;

const SYSTEM_PROMPT: &str = "You are Sarathi, a road-trip planner for chauffeur-driven car rentals in India. \
Suggest stops that sit directly on the driving route. Reply with a single JSON object and nothing else.";

/// Stop suggestions from an LLM behind the OpenRouter chat completions API.
pub struct OpenRouterSuggester {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenRouterSuggester {
    pub fn new(client: reqwest::Client, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, OPENROUTER_BASE_URL)
    }

    pub fn with_base_url(
        client: reqwest::Client,
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StopSuggester for OpenRouterSuggester {
    async fn suggest_stops(
        &self,
        query: &SuggestionQuery,
    ) -> Result<SuggestionBatch, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("openrouter"))?;

        let body = json!({
            "model": self.model,
            "temperature": 0.3,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(query) },
            ],
        });

        tracing::debug!(
            "Requesting {} leg suggestions {} -> {} from {}",
            query.leg.as_str(),
            query.source,
            query.destination,
            self.model
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        let completion: ChatCompletion = ensure_success("openrouter", response).await?.json().await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Decode {
                provider: "openrouter",
                message: "completion has no message content".into(),
            })?;

        let mut batch = parse_suggestions(&content)?;
        batch.candidates.truncate(MAX_SUGGESTIONS);
        Ok(batch)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

pub fn build_prompt(query: &SuggestionQuery) -> String {
    let direction = match query.leg {
        Leg::Onward => "on the way",
        Leg::Return => "on the drive back",
    };
    let overnight = if query.distance_km > 500 {
        "The drive is long: also name one city suitable for a night halt in \"night_halt\"."
    } else {
        "Set \"night_halt\" to null."
    };

    format!(
        "Plan stops {direction} from {source} to {destination} by road ({distance} km).\n\
         Suggest up to {MAX_SUGGESTIONS} real places directly on or within a few km of the highway: \
         restaurants, food, viewpoints, heritage sites, fuel and rest stops.\n\
         {overnight}\n\
         Respond as JSON: {{\"stops\": [{{\"name\": string, \"type\": one of \
         restaurant|food|viewpoint|heritage|fuel|rest|night_halt, \"approx_km\": km from {source}, \
         \"duration_minutes\": number, \"description\": string, \"lat\": number, \"lng\": number}}], \
         \"night_halt\": string or null}}",
        source = query.source,
        destination = query.destination,
        distance = query.distance_km,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TripType;

    fn query(leg: Leg, distance_km: u32) -> SuggestionQuery {
        SuggestionQuery {
            source: "Bengaluru".into(),
            destination: "Mysuru".into(),
            distance_km,
            leg,
            trip_type: TripType::RoundTrip,
        }
    }

    #[test]
    fn prompt_mentions_leg_and_places() {
        let prompt = build_prompt(&query(Leg::Return, 145));
        assert!(prompt.contains("on the drive back from Bengaluru to Mysuru"));
        assert!(prompt.contains("145 km"));
        assert!(prompt.contains("\"night_halt\": string or null"));
        assert!(prompt.contains("Set \"night_halt\" to null."));
    }

    #[test]
    fn long_drives_ask_for_night_halt() {
        let prompt = build_prompt(&query(Leg::Onward, 900));
        assert!(prompt.contains("night halt"));
        assert!(!prompt.contains("to null"));
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let client = reqwest::Client::new();
        let suggester = OpenRouterSuggester::new(client, Some("  ".into()), DEFAULT_MODEL);
        let err = suggester
            .suggest_stops(&query(Leg::Onward, 145))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured("openrouter")));
    }
}
