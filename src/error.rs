//! Error types and handling for the travel planner service

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for the travel planner
#[derive(Error, Debug)]
pub enum TravelPlannerError {
    /// A required request input is absent or empty
    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },

    /// The weather provider call failed
    #[error("Weather provider error: {message}")]
    ExternalProvider { message: String },

    /// The generative model call failed
    #[error("Model provider error: {message}")]
    ExternalModel { message: String },

    /// The model answered with text that is not valid JSON
    #[error("Model returned invalid JSON: {reason}")]
    InvalidModelOutput { raw: String, reason: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The attraction dataset could not be read or parsed
    #[error("Dataset error: {message}")]
    Dataset { message: String },
}

impl TravelPlannerError {
    pub fn missing_parameter<S: Into<String>>(name: S) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    pub fn external_provider<S: Into<String>>(message: S) -> Self {
        Self::ExternalProvider {
            message: message.into(),
        }
    }

    pub fn external_model<S: Into<String>>(message: S) -> Self {
        Self::ExternalModel {
            message: message.into(),
        }
    }

    pub fn invalid_model_output<R: Into<String>, S: Into<String>>(raw: R, reason: S) -> Self {
        Self::InvalidModelOutput {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn dataset<S: Into<String>>(message: S) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// Stable snake_case identifier exposed to API clients
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            TravelPlannerError::MissingParameter { .. } => "missing_parameter",
            TravelPlannerError::ExternalProvider { .. } => "external_provider_error",
            TravelPlannerError::ExternalModel { .. } => "external_model_error",
            TravelPlannerError::InvalidModelOutput { .. } => "invalid_model_output",
            TravelPlannerError::Config { .. } => "config_error",
            TravelPlannerError::Dataset { .. } => "dataset_error",
        }
    }

    /// HTTP status the error maps to when it reaches a client
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            TravelPlannerError::MissingParameter { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelPlannerError::MissingParameter { name } if name == "city" => {
                "City is required".to_string()
            }
            TravelPlannerError::MissingParameter { name } => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => {
                        format!("{}{} is required", first.to_uppercase(), chars.as_str())
                    }
                    None => "Missing required parameter".to_string(),
                }
            }
            TravelPlannerError::ExternalProvider { .. } => {
                "Failed to fetch weather data".to_string()
            }
            TravelPlannerError::ExternalModel { .. } => "Failed to fetch plan.".to_string(),
            TravelPlannerError::InvalidModelOutput { .. } => {
                "AI returned invalid JSON".to_string()
            }
            TravelPlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TravelPlannerError::Dataset { .. } => "Attraction data is unavailable.".to_string(),
        }
    }
}
