//! Generative model client
//!
//! `TextGenerator` is the seam the trip planner talks to; `GeminiClient`
//! implements it against the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::config::GeminiConfig;
use crate::{Result, TravelPlannerError};

/// Literal the model is told to finish with; also its stop sequence.
pub const END_OF_PLAN: &str = "END_OF_PLAN";

const USER_AGENT: &str = concat!("travel-planner/", env!("CARGO_PKG_VERSION"));

/// Sampling parameters sent with every completion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_p: 0.9,
            top_k: 40,
            stop_sequences: vec![END_OF_PLAN.to_string()],
        }
    }
}

/// Token accounting as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates_token_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_token_count: Option<u32>,
}

/// Text produced by one completion call
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run a single completion for `prompt`
    async fn generate(&self, prompt: &str, settings: &GenerationSettings) -> Result<Generation>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: &'a GenerationSettings,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<TokenUsage>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_generation(self) -> Result<Generation> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(TravelPlannerError::external_model(format!(
                "Gemini returned no output: {reason}"
            )));
        };

        if let Some(reason) = candidate.finish_reason.as_deref() {
            debug!("Gemini finish reason: {}", reason);
        }

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        Ok(Generation {
            text,
            usage: self.usage_metadata,
        })
    }
}

/// Gemini REST client
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                TravelPlannerError::config(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip_all, fields(prompt_chars = prompt.len()))]
    async fn generate(&self, prompt: &str, settings: &GenerationSettings) -> Result<Generation> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TravelPlannerError::external_model("GEMINI_API_KEY is not configured"))?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: settings,
        };

        debug!("Calling Gemini model {}", self.model);
        let start_time = Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                TravelPlannerError::external_model(format!("Request to Gemini failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API error ({}): {}", status, body);
            return Err(TravelPlannerError::external_model(format!(
                "Gemini API error ({status})"
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            TravelPlannerError::external_model(format!("Failed to parse Gemini response: {e}"))
        })?;

        let elapsed = start_time.elapsed();
        if elapsed.as_secs() > 20 {
            warn!("Slow Gemini response: {:.3}s", elapsed.as_secs_f64());
        }

        let generation = parsed.into_generation()?;
        info!(
            "Gemini returned {} chars in {:.3}s",
            generation.text.len(),
            elapsed.as_secs_f64()
        );
        Ok(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_settings() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.temperature, 0.9);
        assert_eq!(settings.top_p, 0.9);
        assert_eq!(settings.top_k, 40);
        assert_eq!(settings.stop_sequences, vec!["END_OF_PLAN".to_string()]);
    }

    #[test]
    fn test_request_wire_format() {
        let settings = GenerationSettings::default();
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "plan me a trip" }],
            }],
            generation_config: &settings,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "plan me a trip");
        assert_eq!(value["generationConfig"]["topK"], 40);
        assert_eq!(value["generationConfig"]["stopSequences"][0], "END_OF_PLAN");
        assert_eq!(value["generationConfig"]["topP"], 0.9);
    }

    #[test]
    fn test_response_parsing_joins_parts_and_keeps_usage() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": " 1}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 80, "totalTokenCount": 200}
        }))
        .unwrap();

        let generation = response.into_generation().unwrap();
        assert_eq!(generation.text, "{\"a\": 1}");
        let usage = generation.usage.unwrap();
        assert_eq!(usage.prompt_token_count, Some(120));
        assert_eq!(usage.total_token_count, Some(200));
    }

    #[test]
    fn test_blocked_prompt_is_model_error() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();

        let err = response.into_generation().unwrap_err();
        assert!(matches!(err, TravelPlannerError::ExternalModel { .. }));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_usage_serializes_in_provider_casing() {
        let usage = TokenUsage {
            prompt_token_count: Some(10),
            candidates_token_count: Some(5),
            total_token_count: Some(15),
        };
        let value = serde_json::to_value(&usage).unwrap();
        assert_eq!(
            value,
            json!({"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15})
        );
    }

    #[test]
    fn test_endpoint_uses_model_name() {
        let config = GeminiConfig {
            base_url: "https://example.test/v1beta/".to_string(),
            ..GeminiConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = GeminiClient::new(&GeminiConfig::default()).unwrap();
        let err = client
            .generate("hello", &GenerationSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TravelPlannerError::ExternalModel { .. }));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
