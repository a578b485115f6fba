//! Trip planning
//!
//! Orchestrates one plan request: attraction lookup, prompt construction,
//! a single model call, then cleanup and parsing of the model's answer.
//! Nothing is retried or cached.

pub mod prompt;
pub mod response;

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::attractions::{AttractionCatalog, AttractionRecord};
use crate::gemini::{GenerationSettings, TextGenerator, TokenUsage};
use crate::models::TripRequest;
use crate::{Result, TravelPlannerError};

pub use prompt::build_prompt;
pub use response::{clean_model_output, parse_plan, review_plan};

/// Result of a successful plan request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedTrip {
    /// The model's plan, exactly as parsed
    pub plan: Value,
    pub attractions: Vec<AttractionRecord>,
    pub tokens: Option<TokenUsage>,
}

pub struct TripPlanner {
    catalog: Arc<AttractionCatalog>,
    generator: Arc<dyn TextGenerator>,
    settings: GenerationSettings,
}

impl TripPlanner {
    pub fn new(catalog: Arc<AttractionCatalog>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            catalog,
            generator,
            settings: GenerationSettings::default(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &AttractionCatalog {
        &self.catalog
    }

    #[instrument(skip(self, request), fields(destination = %request.destination))]
    pub async fn plan_trip(&self, request: &TripRequest) -> Result<PlannedTrip> {
        let attractions = self.catalog.lookup(&request.destination).to_vec();
        info!("Found {} local attractions", attractions.len());

        let prompt = build_prompt(request, &attractions);
        debug!("Built prompt of {} chars", prompt.len());

        let generation = self.generator.generate(&prompt, &self.settings).await?;

        let plan = parse_plan(&generation.text).inspect_err(|e| {
            if let TravelPlannerError::InvalidModelOutput { raw, reason } = e {
                warn!("JSON Parse Error: {}\nRaw Output: {}", reason, raw);
            }
        })?;

        for issue in review_plan(&plan, request) {
            warn!("Plan review: {}", issue);
        }

        if let Some(usage) = &generation.usage {
            info!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "Token usage"
            );
        }

        Ok(PlannedTrip {
            plan,
            attractions,
            tokens: generation.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::Generation;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a canned answer and records what it was asked
    struct ScriptedGenerator {
        answer: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
        settings: Mutex<Vec<GenerationSettings>>,
    }

    impl ScriptedGenerator {
        fn answering(text: &str) -> Self {
            Self {
                answer: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
                settings: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                answer: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
                settings: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            prompt: &str,
            settings: &GenerationSettings,
        ) -> Result<Generation> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.settings.lock().unwrap().push(settings.clone());
            match &self.answer {
                Ok(text) => Ok(Generation {
                    text: text.clone(),
                    usage: Some(TokenUsage {
                        prompt_token_count: Some(300),
                        candidates_token_count: Some(200),
                        total_token_count: Some(500),
                    }),
                }),
                Err(message) => Err(TravelPlannerError::external_model(message.clone())),
            }
        }
    }

    fn catalog() -> Arc<AttractionCatalog> {
        Arc::new(
            AttractionCatalog::from_json_str(
                r#"[{"city": "Chennai", "attractions": [
                    {"name": "Marina Beach", "type": "beach", "description": "Urban beach"}
                ]}]"#,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_plan_includes_attractions_and_usage() {
        let generator = Arc::new(ScriptedGenerator::answering(
            "```json\n{\"destination\": \"Chennai\", \"days\": 1}\n```\nEND_OF_PLAN",
        ));
        let planner = TripPlanner::new(catalog(), generator.clone());

        let trip = planner
            .plan_trip(&TripRequest::new("chennai", 1, 200))
            .await
            .unwrap();

        assert_eq!(trip.plan["destination"], "Chennai");
        assert_eq!(trip.attractions.len(), 1);
        assert_eq!(trip.attractions[0].name, "Marina Beach");
        assert_eq!(trip.tokens.unwrap().total_token_count, Some(500));

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- Marina Beach (beach): Urban beach"));
        assert_eq!(generator.settings.lock().unwrap()[0], GenerationSettings::default());
    }

    #[tokio::test]
    async fn test_unknown_city_still_plans() {
        let generator = Arc::new(ScriptedGenerator::answering("{\"destination\": \"Oslo\"}"));
        let planner = TripPlanner::new(catalog(), generator);

        let trip = planner
            .plan_trip(&TripRequest::new("Oslo", 2, 900))
            .await
            .unwrap();
        assert!(trip.attractions.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_is_reported() {
        let generator = Arc::new(ScriptedGenerator::answering("Here you go: day 1 beach"));
        let planner = TripPlanner::new(catalog(), generator);

        let err = planner
            .plan_trip(&TripRequest::new("Chennai", 1, 200))
            .await
            .unwrap_err();
        match err {
            TravelPlannerError::InvalidModelOutput { raw, .. } => {
                assert_eq!(raw, "Here you go: day 1 beach");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_model_failure_is_propagated() {
        let generator = Arc::new(ScriptedGenerator::failing("connection reset"));
        let planner = TripPlanner::new(catalog(), generator.clone());

        let err = planner
            .plan_trip(&TripRequest::new("Chennai", 1, 200))
            .await
            .unwrap_err();
        assert!(matches!(err, TravelPlannerError::ExternalModel { .. }));
        assert_eq!(generator.prompts.lock().unwrap().len(), 1);
    }
}
